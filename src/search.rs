use log::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;

use crate::fetchers::PageFetcher;
use crate::model::RecipeSummary;
use crate::sources::RecipeSource;

/// How results from different sources are deduplicated.
///
/// Each source already removes repeats within its own page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrossSourceDedup {
    /// Keep the first result for each URL, in source order.
    #[default]
    ByUrl,
    /// Concatenate source results as they are.
    Disabled,
}

/// Fans a query out to every configured source.
pub struct SearchOrchestrator {
    sources: Vec<Box<dyn RecipeSource>>,
    dedup: CrossSourceDedup,
}

impl SearchOrchestrator {
    pub fn new(sources: Vec<Box<dyn RecipeSource>>, dedup: CrossSourceDedup) -> Self {
        Self { sources, dedup }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Search every source for `ingredient` and return at most `max_results`
    /// recipes, in source order.
    pub async fn search(
        &self,
        fetcher: &dyn PageFetcher,
        ingredient: &str,
        max_results: usize,
    ) -> Vec<RecipeSummary> {
        let mut all_recipes = Vec::new();

        for source in &self.sources {
            let found = source.search(fetcher, ingredient).await;
            debug!("{} returned {} recipes", source.name(), found.len());
            all_recipes.extend(found);
        }

        if self.dedup == CrossSourceDedup::ByUrl {
            let mut seen = HashSet::new();
            all_recipes.retain(|recipe| seen.insert(recipe.url.clone()));
        }

        all_recipes.truncate(max_results);
        info!(
            "Search for '{}' produced {} recipes",
            ingredient,
            all_recipes.len()
        );
        all_recipes
    }
}
