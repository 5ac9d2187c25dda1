//! Web search trait.

use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::SearchHit;

/// Evidence search provider.
///
/// One search per claim; no link following.
///
/// # Implementations
///
/// - `GoogleSearcher` - Google Custom Search JSON API
/// - `MockSearcher` - For testing
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Return up to `limit` candidate documents in the provider's relevance order.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}
