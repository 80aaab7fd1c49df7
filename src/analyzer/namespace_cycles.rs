//! 名前空間の循環検出
//!
//! 全ての定義が揃った後で、同じバッチ内の2つの名前空間をまたぐ参照を辺として
//! 記録し、出て行く辺か入って来る辺を持たない名前空間を繰り返し取り除きます。
//! 残った名前空間はまとめて1つの循環として報告します。

use std::collections::{BTreeSet, HashMap};

use crate::ast::Namespace;
use crate::error::Diagnostic;
use crate::types::{CallSignature, Definition, QualifiedTypeName, TypeReference};

use super::semantic_analyzer::SemanticAnalyzer;

impl SemanticAnalyzer<'_> {
    pub(super) fn check_namespace_cycles(&mut self) {
        let mut edges: HashMap<&Namespace, BTreeSet<&Namespace>> = HashMap::new();
        for definition in self.built.values() {
            let from = &definition.name().namespace;
            for referenced in referenced_types(definition) {
                let to = &referenced.namespace;
                if to != from && self.namespaces.contains_key(to) {
                    edges.entry(from).or_default().insert(to);
                }
            }
        }

        log::debug!(
            "checking namespace cycles: {} namespaces, {} with outgoing edges",
            self.namespaces.len(),
            edges.len()
        );

        let mut remaining: BTreeSet<&Namespace> = self.namespaces.keys().collect();
        loop {
            let detached: Vec<&Namespace> = remaining
                .iter()
                .copied()
                .filter(|ns| {
                    let is_sink = edges
                        .get(ns)
                        .map_or(true, |targets| targets.iter().all(|t| !remaining.contains(t)));
                    let is_source = !remaining
                        .iter()
                        .any(|from| edges.get(from).is_some_and(|targets| targets.contains(ns)));
                    is_sink || is_source
                })
                .collect();
            if detached.is_empty() {
                break;
            }
            for ns in detached {
                remaining.remove(ns);
            }
        }

        let mut involved: Vec<(String, &Namespace)> =
            remaining.into_iter().map(|ns| (ns.to_string(), ns)).collect();
        involved.sort();
        let Some((_, first)) = involved.first() else {
            return;
        };

        let location = self.namespaces[*first].clone();
        let names = involved
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.errors.report(Diagnostic::new(
            location,
            format!("circular namespace dependency among {}", names),
        ));
    }
}

/// 定義が構造的に参照する全ての型名
fn referenced_types(definition: &Definition) -> Vec<&QualifiedTypeName> {
    let mut names = Vec::new();
    match definition {
        Definition::Primitive(_) | Definition::Enum(_) => {}
        Definition::AliasedType(def) => collect_reference(&def.target, &mut names),
        Definition::Struct(def) => {
            names.extend(def.supertype.iter());
            names.extend(def.mixins.iter());
            for field in def.fields.values() {
                collect_reference(&field.ty, &mut names);
            }
            for constructor in &def.constructors {
                collect_reference(constructor, &mut names);
            }
        }
        Definition::Schema(def) => {
            names.extend(def.mixins.iter());
            for field in def.fields.values() {
                collect_reference(&field.ty, &mut names);
            }
        }
        Definition::Prototype(def) => collect_signature(&def.signature, &mut names),
        Definition::Service(def) => {
            names.extend(def.supertype.iter());
            names.extend(def.security.iter());
            for operation in def.operations.values() {
                collect_signature(&operation.signature, &mut names);
            }
        }
    }
    names
}

fn collect_signature<'d>(signature: &'d CallSignature, names: &mut Vec<&'d QualifiedTypeName>) {
    for field in signature.fields.values() {
        collect_reference(&field.ty, names);
    }
    if let Some(returns) = &signature.returns {
        collect_reference(returns, names);
    }
    for thrown in &signature.throws {
        collect_reference(thrown, names);
    }
}

fn collect_reference<'d>(reference: &'d TypeReference, names: &mut Vec<&'d QualifiedTypeName>) {
    names.push(reference.base_name());
}
