use indexmap::IndexMap;
use std::collections::HashSet;

use crate::ast::{NameRef, Namespace, TypeDecl, TypeKind};
use crate::error::Diagnostic;
use crate::types::{Definition, Operation, QualifiedTypeName, ServiceDefinition};

use super::super::deferred::{DeferredTask, FieldSetId};
use super::super::ordering::general_order;
use super::super::semantic_analyzer::{BuildContext, SemanticAnalyzer};

/// セキュリティ宣言のプロトタイプが持つべき唯一のフィールド
const AUTHENTICATION_FIELD: &str = "authentication";

impl<'a> SemanticAnalyzer<'a> {
    pub(in crate::analyzer) fn build_services(&mut self) {
        let services = self.declarations_of(TypeKind::Service);
        log::debug!("building {} services", services.len());

        let pending = services
            .into_iter()
            .map(|ctx| {
                let supertype = match ctx.decl {
                    TypeDecl::Service(decl) => decl.supertype.as_ref(),
                    _ => unreachable!("{} is not a service", ctx.qname),
                };
                self.pending_by_supertype(ctx, supertype)
            })
            .collect();
        let (ordered, cyclic) = general_order(pending);
        self.report_circular(&cyclic);

        for ctx in &ordered {
            self.build_service(ctx);
        }
    }

    fn build_service(&mut self, ctx: &BuildContext<'a>) {
        let TypeDecl::Service(decl) = ctx.decl else {
            unreachable!("{} is not a service", ctx.qname);
        };
        let namespace = ctx.namespace();

        let supertype = decl.supertype.as_ref().and_then(|name| {
            self.resolve_kind(name, namespace, TypeKind::Service, |q| {
                format!("supertype {} of {} is not a service", q, ctx.qname)
            })
        });

        let mut operations = match &supertype {
            Some(parent) => self.inherit_operations(&ctx.qname, parent),
            None => IndexMap::new(),
        };

        let inherited: HashSet<String> = operations.keys().cloned().collect();
        for op in &decl.operations {
            let name = &op.name.name;
            if operations.contains_key(name) {
                let message = if inherited.contains(name) {
                    format!("operation {} of {} redeclares an inherited operation", name, ctx.qname)
                } else {
                    format!("duplicate operation name {} in {}", name, ctx.qname)
                };
                self.errors
                    .report(Diagnostic::new(op.name.location.clone(), message));
                continue;
            }

            let signature = self.build_signature(
                &FieldSetId::Operation(ctx.qname.clone(), name.clone()),
                &op.location,
                &op.signature,
                namespace,
            );
            operations.insert(
                name.clone(),
                Operation {
                    name: name.clone(),
                    signature,
                },
            );
        }

        let security = decl
            .security
            .as_ref()
            .and_then(|name| self.resolve_security(&ctx.qname, name, namespace));

        log::trace!("service {} has {} operations", ctx.qname, operations.len());
        self.built.insert(
            ctx.qname.clone(),
            Definition::Service(ServiceDefinition {
                name: ctx.qname.clone(),
                supertype,
                operations,
                security,
            }),
        );
    }

    /// 上位サービスの操作を写し、既定値は評価後に引き継ぐ
    fn inherit_operations(
        &mut self,
        service: &QualifiedTypeName,
        parent: &QualifiedTypeName,
    ) -> IndexMap<String, Operation> {
        let operations = match self.definition(parent) {
            Some(Definition::Service(def)) => def.operations.clone(),
            _ => return IndexMap::new(),
        };

        for (name, operation) in &operations {
            for field in operation.signature.fields.keys() {
                self.deferred.push(DeferredTask::InheritDefault {
                    owner: FieldSetId::Operation(service.clone(), name.clone()),
                    field: field.clone(),
                    source: FieldSetId::Operation(parent.clone(), name.clone()),
                });
            }
        }
        operations
    }

    /// セキュリティ宣言は `authentication` だけを持つ既定値なしのプロトタイプを指す
    fn resolve_security(
        &mut self,
        service: &QualifiedTypeName,
        name: &NameRef,
        namespace: &Namespace,
    ) -> Option<QualifiedTypeName> {
        let prototype = self.resolve_kind(name, namespace, TypeKind::Prototype, |q| {
            format!("security declaration {} of {} is not a prototype", q, service)
        })?;

        // 既定値はまだ評価されていないので、宣言されていればその構文を見る
        let well_formed = match self.declarations.get(&prototype).map(|ctx| ctx.decl) {
            Some(TypeDecl::Prototype(decl)) => match decl.signature.fields.as_slice() {
                [field] => field.name.name == AUTHENTICATION_FIELD && field.default.is_none(),
                _ => false,
            },
            _ => match self.definition(&prototype) {
                Some(Definition::Prototype(def)) => {
                    def.signature.fields.len() == 1
                        && def
                            .signature
                            .fields
                            .get(AUTHENTICATION_FIELD)
                            .map_or(false, |field| field.default.is_none())
                }
                _ => false,
            },
        };

        if !well_formed {
            self.errors.report(Diagnostic::new(
                name.location.clone(),
                format!(
                    "security prototype {} of {} must have exactly one field named {} without a default",
                    prototype, service, AUTHENTICATION_FIELD
                ),
            ));
            return None;
        }
        Some(prototype)
    }
}
