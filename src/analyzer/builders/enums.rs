use std::collections::HashMap;

use crate::ast::{Location, TypeDecl, TypeKind};
use crate::error::Diagnostic;
use crate::types::{Definition, EnumDefinition};

use super::super::semantic_analyzer::SemanticAnalyzer;

impl SemanticAnalyzer<'_> {
    pub(in crate::analyzer) fn build_enums(&mut self) {
        let enums = self.declarations_of(TypeKind::Enum);
        log::debug!("building {} enums", enums.len());

        for ctx in enums {
            let TypeDecl::Enum(decl) = ctx.decl else {
                unreachable!("{} is not an enum", ctx.qname);
            };

            // 重複した値は報告し、残りで構築する
            let mut seen: HashMap<&str, &Location> = HashMap::new();
            let mut values = Vec::new();
            for value in &decl.values {
                if let Some(first) = seen.get(value.name.as_str()) {
                    self.errors.report(Diagnostic::new(
                        value.location.clone(),
                        format!(
                            "duplicate enum value {} in {} (first declared at {})",
                            value.name, ctx.qname, first
                        ),
                    ));
                    continue;
                }
                seen.insert(&value.name, &value.location);
                values.push(value.name.clone());
            }

            self.built.insert(
                ctx.qname.clone(),
                Definition::Enum(EnumDefinition {
                    name: ctx.qname.clone(),
                    values,
                }),
            );
        }
    }
}
