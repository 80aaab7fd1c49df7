use crate::ast::{TypeDecl, TypeKind};
use crate::error::Diagnostic;
use crate::types::{Definition, SchemaDefinition};

use super::super::deferred::FieldSetId;
use super::super::fields::Contributor;
use super::super::ordering::{mixin_order, Pending};
use super::super::semantic_analyzer::{BuildContext, SemanticAnalyzer};

impl<'a> SemanticAnalyzer<'a> {
    /// スキーマはミックスイン先が先に構築されるよう順序付ける
    pub(in crate::analyzer) fn build_schemas(&mut self) {
        let schemas = self.declarations_of(TypeKind::Schema);
        log::debug!("building {} schemas", schemas.len());

        let pending = schemas
            .into_iter()
            .map(|ctx| {
                let requires = match ctx.decl {
                    TypeDecl::Schema(decl) => decl
                        .mixins
                        .iter()
                        .filter_map(|mixin| self.peek_name(mixin, ctx.namespace()))
                        .collect(),
                    _ => unreachable!("{} is not a schema", ctx.qname),
                };
                Pending::new(ctx.qname.clone(), requires, ctx)
            })
            .collect();
        let (ordered, cyclic) = mixin_order(pending);

        if let Some(first) = cyclic.first() {
            let mut names: Vec<String> = cyclic.iter().map(|ctx| ctx.qname.to_string()).collect();
            names.sort();
            self.errors.report(Diagnostic::new(
                first.decl.location().clone(),
                format!("circular mixin dependency among {}", names.join(", ")),
            ));
        }

        for ctx in &ordered {
            self.build_schema(ctx);
        }
    }

    fn build_schema(&mut self, ctx: &BuildContext<'a>) {
        let TypeDecl::Schema(decl) = ctx.decl else {
            unreachable!("{} is not a schema", ctx.qname);
        };

        let mixins = self.resolve_mixins(&decl.mixins, ctx.namespace());
        let inherited = mixins
            .iter()
            .filter_map(|mixin| self.inherit_from(Contributor::Mixin(mixin.clone())))
            .collect();

        let fields = self.build_field_set(
            &FieldSetId::Type(ctx.qname.clone()),
            &decl.location,
            &decl.fields,
            inherited,
            ctx.namespace(),
        );

        log::trace!("schema {} has {} fields", ctx.qname, fields.len());
        self.built.insert(
            ctx.qname.clone(),
            Definition::Schema(SchemaDefinition {
                name: ctx.qname.clone(),
                mixins,
                fields,
            }),
        );
    }
}
