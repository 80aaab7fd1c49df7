use crate::ast::{TypeDecl, TypeKind};
use crate::error::Diagnostic;
use crate::types::{Definition, QualifiedTypeName, StructDefinition, TypeReference};

use super::super::ambiguity::ShapeKey;
use super::super::deferred::FieldSetId;
use super::super::fields::Contributor;
use super::super::ordering::general_order;
use super::super::resolver::ResolutionContext;
use super::super::semantic_analyzer::{BuildContext, SemanticAnalyzer};

impl<'a> SemanticAnalyzer<'a> {
    pub(in crate::analyzer) fn build_structs(&mut self) {
        let structs = self.declarations_of(TypeKind::Struct);
        log::debug!("building {} structs", structs.len());

        let pending = structs
            .into_iter()
            .map(|ctx| {
                let supertype = match ctx.decl {
                    TypeDecl::Struct(decl) => decl.supertype.as_ref(),
                    _ => unreachable!("{} is not a struct", ctx.qname),
                };
                self.pending_by_supertype(ctx, supertype)
            })
            .collect();
        let (ordered, cyclic) = general_order(pending);
        self.report_circular(&cyclic);

        for ctx in &ordered {
            self.build_struct(ctx);
        }
    }

    fn build_struct(&mut self, ctx: &BuildContext<'a>) {
        let TypeDecl::Struct(decl) = ctx.decl else {
            unreachable!("{} is not a struct", ctx.qname);
        };
        let namespace = ctx.namespace();

        let supertype = decl.supertype.as_ref().and_then(|name| {
            self.resolve_kind(name, namespace, TypeKind::Struct, |q| {
                format!("supertype {} of {} is not a struct", q, ctx.qname)
            })
        });
        let mixins = self.resolve_mixins(&decl.mixins, namespace);

        // 上位型のフィールドは直接宣言でない供給元として受け継ぐ
        let inherited = supertype
            .iter()
            .map(|q| Contributor::Supertype(q.clone()))
            .chain(mixins.iter().map(|q| Contributor::Mixin(q.clone())))
            .filter_map(|contributor| self.inherit_from(contributor))
            .collect();

        let fields = self.build_field_set(
            &FieldSetId::Type(ctx.qname.clone()),
            &decl.location,
            &decl.fields,
            inherited,
            namespace,
        );

        let constructors = self.build_constructors(ctx);

        log::trace!(
            "struct {} has {} fields and {} constructors",
            ctx.qname,
            fields.len(),
            constructors.len()
        );
        self.built.insert(
            ctx.qname.clone(),
            Definition::Struct(StructDefinition {
                name: ctx.qname.clone(),
                supertype,
                mixins,
                fields,
                constructors,
            }),
        );
    }

    /// 単一引数のコンストラクタ。自身の型と生のシンボルマップ型は引数にできない
    fn build_constructors(&mut self, ctx: &BuildContext<'a>) -> Vec<TypeReference> {
        let TypeDecl::Struct(decl) = ctx.decl else {
            unreachable!("{} is not a struct", ctx.qname);
        };
        let self_key = ShapeKey::Atomic(ctx.qname.clone());
        let map_key = ShapeKey::Atomic(QualifiedTypeName::core("Map"));

        let mut accepted = Vec::new();
        for constructor in &decl.constructors {
            let resolution = ResolutionContext::new(constructor.location.clone());
            let Some(param) = self.resolving(resolution, |this, rc| {
                this.resolve_type(&constructor.param, ctx.namespace(), rc)
            }) else {
                continue;
            };

            let key = ShapeKey::from(&param);
            let problem = if key == self_key {
                Some(format!("constructor of {} cannot take {} itself", ctx.qname, ctx.qname))
            } else if key == map_key {
                Some(format!(
                    "constructor of {} cannot take the raw symbol map {}",
                    ctx.qname, param
                ))
            } else if accepted.iter().any(|(existing, _)| *existing == param) {
                Some(format!("duplicate constructor {} in {}", param, ctx.qname))
            } else {
                None
            };

            match problem {
                Some(message) => {
                    self.errors
                        .report(Diagnostic::new(constructor.location.clone(), message));
                }
                None => accepted.push((param, constructor.location.clone())),
            }
        }

        self.check_ambiguity(&format!("constructors of {}", ctx.qname), &accepted);
        accepted.into_iter().map(|(param, _)| param).collect()
    }
}
