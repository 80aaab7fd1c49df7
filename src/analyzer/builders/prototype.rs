use crate::ast::{Location, Namespace, SignatureDecl, TypeDecl, TypeKind};
use crate::error::Diagnostic;
use crate::types::{CallSignature, Definition, PrototypeDefinition, QualifiedTypeName, TypeReference};

use super::super::deferred::FieldSetId;
use super::super::resolver::ResolutionContext;
use super::super::semantic_analyzer::SemanticAnalyzer;

impl SemanticAnalyzer<'_> {
    pub(in crate::analyzer) fn build_prototypes(&mut self) {
        let prototypes = self.declarations_of(TypeKind::Prototype);
        log::debug!("building {} prototypes", prototypes.len());

        for ctx in prototypes {
            let TypeDecl::Prototype(decl) = ctx.decl else {
                unreachable!("{} is not a prototype", ctx.qname);
            };

            let signature = self.build_signature(
                &FieldSetId::Type(ctx.qname.clone()),
                &decl.location,
                &decl.signature,
                ctx.namespace(),
            );

            self.built.insert(
                ctx.qname.clone(),
                Definition::Prototype(PrototypeDefinition {
                    name: ctx.qname.clone(),
                    signature,
                }),
            );
        }
    }

    /// フィールド、戻り値型、送出型からなる呼び出しシグネチャを構築する
    pub(in crate::analyzer) fn build_signature(
        &mut self,
        owner: &FieldSetId,
        location: &Location,
        decl: &SignatureDecl,
        namespace: &Namespace,
    ) -> CallSignature {
        let fields = self.build_field_set(owner, location, &decl.fields, Vec::new(), namespace);

        let returns = decl.returns.as_ref().and_then(|returns| {
            let resolution = ResolutionContext::new(returns.location().clone());
            self.resolving(resolution, |this, rc| this.resolve_type(returns, namespace, rc))
        });

        let mut throws = Vec::new();
        for thrown in &decl.throws {
            let resolution = ResolutionContext::new(thrown.location().clone());
            let Some(ty) = self.resolving(resolution, |this, rc| this.resolve_type(thrown, namespace, rc))
            else {
                continue;
            };
            if self.check_thrown(owner, &ty, thrown.location()) {
                throws.push((ty, thrown.location().clone()));
            }
        }
        self.check_ambiguity(&format!("thrown types of {}", owner), &throws);

        CallSignature {
            fields,
            returns,
            throws: throws.into_iter().map(|(ty, _)| ty).collect(),
        }
    }

    /// 送出型は構造体（ポインタ経由も可）でなければならない
    fn check_thrown(&mut self, owner: &FieldSetId, ty: &TypeReference, location: &Location) -> bool {
        let message = match ty {
            TypeReference::Atomic { name, .. } => self.not_a_struct(owner, ty, name),
            TypeReference::Pointer(inner) => match inner.as_ref() {
                TypeReference::Atomic { name, .. } => self.not_a_struct(owner, ty, name),
                _ => Some(format!(
                    "thrown type {} of {} must be a struct behind at most one pointer",
                    ty, owner
                )),
            },
            TypeReference::Nullable(_) | TypeReference::List { .. } => Some(format!(
                "thrown type {} of {} must not be nullable or a list",
                ty, owner
            )),
        };

        match message {
            Some(message) => {
                self.errors.report(Diagnostic::new(location.clone(), message));
                false
            }
            None => true,
        }
    }

    fn not_a_struct(
        &self,
        owner: &FieldSetId,
        ty: &TypeReference,
        name: &QualifiedTypeName,
    ) -> Option<String> {
        (self.kind_of(name) != Some(TypeKind::Struct))
            .then(|| format!("thrown type {} of {} is not a struct", ty, owner))
    }
}
