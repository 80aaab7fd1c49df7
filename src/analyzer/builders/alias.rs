use crate::ast::{TypeDecl, TypeKind};
use crate::types::{AliasDefinition, Definition};

use super::super::ordering::{general_order, Pending};
use super::super::resolver::ResolutionContext;
use super::super::semantic_analyzer::{BuildContext, SemanticAnalyzer};

impl<'a> SemanticAnalyzer<'a> {
    pub(in crate::analyzer) fn build_aliases(&mut self) {
        let aliases = self.declarations_of(TypeKind::Alias);
        log::debug!("building {} aliases", aliases.len());

        let pending = aliases
            .into_iter()
            .map(|ctx| {
                let requires = match ctx.decl {
                    TypeDecl::Alias(decl) => self
                        .lookup_name(decl.target.base_name(), ctx.namespace())
                        .into_iter()
                        .collect(),
                    _ => unreachable!("{} is not an alias", ctx.qname),
                };
                Pending::new(ctx.qname.clone(), requires, ctx)
            })
            .collect();
        let (ordered, cyclic) = general_order(pending);

        // 循環に関わる別名も構築を試みる。連鎖の診断は解決時に報告される
        for ctx in ordered.iter().chain(cyclic.iter()) {
            self.build_alias(ctx);
        }
    }

    fn build_alias(&mut self, ctx: &BuildContext<'a>) {
        let TypeDecl::Alias(decl) = ctx.decl else {
            unreachable!("{} is not an alias", ctx.qname);
        };

        let resolution = ResolutionContext::seeded(decl.location.clone(), ctx.qname.clone());
        let target = self.resolving(resolution, |this, rc| {
            this.resolve_type(&decl.target, ctx.namespace(), rc)
        });

        if let Some(target) = target {
            log::trace!("alias {} = {}", ctx.qname, target);
            self.built.insert(
                ctx.qname.clone(),
                Definition::AliasedType(AliasDefinition {
                    name: ctx.qname.clone(),
                    target,
                }),
            );
        }
    }
}
