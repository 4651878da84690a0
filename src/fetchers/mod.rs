use async_trait::async_trait;

use crate::error::DishError;

mod request;

pub use request::RequestFetcher;

/// Retrieves the raw markup of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, DishError>;
}
