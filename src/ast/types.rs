//! Type-reference completion.
//!
//! The parser side owns the quantifiers (`?`, `*`, lists); the analyzer only
//! supplies a callback that turns a base name plus restriction syntax into a
//! resolved reference.

use super::{NameRef, RestrictionSyntax, TypeExpr};
use crate::types::TypeReference;

/// Namespace-aware resolution of a base name, supplied by the analyzer.
///
/// `nested` is true when the base sits inside a list, nullable or pointer.
pub trait ResolveBase {
    fn resolve_base(
        &mut self,
        name: &NameRef,
        restriction: Option<&RestrictionSyntax>,
        nested: bool,
    ) -> Option<TypeReference>;
}

impl<F> ResolveBase for F
where
    F: FnMut(&NameRef, Option<&RestrictionSyntax>, bool) -> Option<TypeReference>,
{
    fn resolve_base(
        &mut self,
        name: &NameRef,
        restriction: Option<&RestrictionSyntax>,
        nested: bool,
    ) -> Option<TypeReference> {
        self(name, restriction, nested)
    }
}

impl TypeExpr {
    /// Resolve the base through `resolver`, then rebuild the quantifiers around it
    pub fn complete<R: ResolveBase + ?Sized>(&self, resolver: &mut R) -> Option<TypeReference> {
        self.complete_at(resolver, false)
    }

    fn complete_at<R: ResolveBase + ?Sized>(
        &self,
        resolver: &mut R,
        nested: bool,
    ) -> Option<TypeReference> {
        match self {
            TypeExpr::Named { name, restriction } => {
                resolver.resolve_base(name, restriction.as_ref(), nested)
            }
            TypeExpr::Nullable(inner) => inner
                .complete_at(resolver, true)
                .map(|r| TypeReference::Nullable(Box::new(r))),
            TypeExpr::Pointer(inner) => inner
                .complete_at(resolver, true)
                .map(|r| TypeReference::Pointer(Box::new(r))),
            TypeExpr::List {
                element,
                allow_empty,
            } => element
                .complete_at(resolver, true)
                .map(|r| TypeReference::List {
                    element: Box::new(r),
                    allow_empty: *allow_empty,
                }),
        }
    }
}
