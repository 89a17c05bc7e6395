//! Resolution traits for the override pass.

use crate::models::ResolutionResult;

use super::query::SymbolQuery;

/// Individual resolver in the override chain.
///
/// Resolvers are tried in order until one returns a result.
/// Returning `None` means this resolver has no entry for the symbol,
/// and the chain should try the next resolver.
pub trait Resolver: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Attempt to resolve the symbol without consulting the catalog.
    fn resolve(&self, query: &SymbolQuery) -> Option<ResolutionResult>;
}
