//! Document extraction trait.

use async_trait::async_trait;

use crate::error::DocumentError;

/// Turns a URL into a textual summary of the page.
///
/// Implementations need not bound their own run time; the evidence collector
/// runs every call in an isolated task under a hard timeout.
#[async_trait]
pub trait DocumentExtractor: Send + Sync + 'static {
    async fn extract(&self, url: &str) -> Result<String, DocumentError>;

    fn name(&self) -> &str;
}
