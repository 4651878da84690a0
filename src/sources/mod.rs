use async_trait::async_trait;

use crate::fetchers::PageFetcher;
use crate::model::RecipeSummary;

mod allrecipes;

pub use allrecipes::AllRecipes;

/// A recipe site that can be searched by ingredient.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Name reported in the `source` field of every result.
    fn name(&self) -> &str;

    /// Search the site for `ingredient`.
    ///
    /// Failures are logged and reported as an empty list.
    async fn search(&self, fetcher: &dyn PageFetcher, ingredient: &str) -> Vec<RecipeSummary>;
}
