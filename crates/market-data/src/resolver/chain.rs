//! Override chain - composite resolver that tries resolvers in order.

use crate::models::ResolutionResult;

use super::query::SymbolQuery;
use super::traits::Resolver;

/// Borrowing chain over the override resolvers of one batch.
///
/// The resolution order is the order resolvers were added; the chain stops
/// at the first hit.
pub struct OverrideChain<'a> {
    resolvers: Vec<&'a dyn Resolver>,
}

impl<'a> OverrideChain<'a> {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Add a resolver after the ones already in the chain.
    pub fn with(mut self, resolver: &'a dyn Resolver) -> Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn resolve(&self, query: &SymbolQuery) -> Option<ResolutionResult> {
        self.resolvers.iter().find_map(|resolver| {
            let result = resolver.resolve(query)?;
            tracing::debug!(
                "Override hit for '{}' via {}: {}",
                query.raw,
                resolver.name(),
                result.canonical_id
            );
            Some(result)
        })
    }
}

impl Default for OverrideChain<'_> {
    fn default() -> Self {
        Self::new()
    }
}
