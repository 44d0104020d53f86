//! Upstream fetch contract.

use async_trait::async_trait;

use crate::category::Category;
use crate::error::FetchError;
use crate::window::WindowValue;
use crate::Number;

/// Source of number batches for a category.
///
/// Implementations enforce their own timeout and report it as
/// [`FetchError::Timeout`]. They must not touch window state.
#[async_trait]
pub trait Fetcher<T: WindowValue = Number>: Send + Sync {
    async fn fetch(&self, category: Category) -> Result<Vec<T>, FetchError>;
}
