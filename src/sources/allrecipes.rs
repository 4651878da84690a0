use async_trait::async_trait;
use log::{debug, warn};
use url::Url;

use super::RecipeSource;
use crate::error::DishError;
use crate::extractors::CandidateExtractor;
use crate::fetchers::PageFetcher;
use crate::model::RecipeSummary;

pub struct AllRecipes {
    base_url: String,
    extractor: CandidateExtractor,
}

impl AllRecipes {
    pub const NAME: &'static str = "AllRecipes";

    pub fn new(base_url: &str) -> Result<Self, DishError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            extractor: CandidateExtractor::new(base_url, Self::NAME)?,
        })
    }

    /// `{base}/search?q={ingredient}` with the ingredient query-encoded.
    pub fn search_url(&self, ingredient: &str) -> Result<String, DishError> {
        let mut url = Url::parse(&format!("{}/search", self.base_url))
            .map_err(|e| DishError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.query_pairs_mut().append_pair("q", ingredient);
        Ok(url.into())
    }
}

#[async_trait]
impl RecipeSource for AllRecipes {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn search(&self, fetcher: &dyn PageFetcher, ingredient: &str) -> Vec<RecipeSummary> {
        let url = match self.search_url(ingredient) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot build search URL for '{}': {}", ingredient, e);
                return Vec::new();
            }
        };

        let markup = match fetcher.fetch(&url).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!("Error fetching recipes from {}: {}", url, e);
                return Vec::new();
            }
        };

        debug!("Parsing search results for '{}'", ingredient);
        self.extractor.extract(&markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_ingredient() {
        let source = AllRecipes::new("https://www.allrecipes.com/").unwrap();
        assert_eq!(
            source.search_url("sweet potato & kale").unwrap(),
            "https://www.allrecipes.com/search?q=sweet+potato+%26+kale"
        );
    }

    #[test]
    fn test_name() {
        let source = AllRecipes::new("https://www.allrecipes.com").unwrap();
        assert_eq!(source.name(), "AllRecipes");
    }
}
