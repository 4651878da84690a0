use log::{error, info};
use serde::Serialize;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::DishError;
use crate::extractors::DetailExtractor;
use crate::fetchers::{PageFetcher, RequestFetcher};
use crate::history::HistoryStore;
use crate::model::{HistoryEntry, RecipeDetails, RecipeInput, RecipeSummary};
use crate::search::SearchOrchestrator;
use crate::sources::{AllRecipes, RecipeSource};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub recipes: Vec<RecipeSummary>,
    pub count: usize,
    pub search_term: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub recipes: Vec<HistoryEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Entry point for request handlers: search, recipe details and the
/// cooking history.
///
/// Search and detail lookups never fail because a site is unreachable;
/// they come back empty instead. Errors are either
/// [`DishError::Validation`] for bad input or internal faults.
pub struct DishItOut {
    fetcher: Arc<dyn PageFetcher>,
    orchestrator: SearchOrchestrator,
    details: DetailExtractor,
    history: Arc<HistoryStore>,
    default_max_results: usize,
}

impl DishItOut {
    /// Wire up the real fetcher, the AllRecipes source and the history file
    /// named in `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, DishError> {
        let fetcher = Arc::new(RequestFetcher::new(&config.fetch)?);
        let sources: Vec<Box<dyn RecipeSource>> =
            vec![Box::new(AllRecipes::new(&config.sources.allrecipes_base_url)?)];

        Ok(Self {
            fetcher,
            orchestrator: SearchOrchestrator::new(sources, config.search.cross_source_dedup),
            details: DetailExtractor,
            history: Arc::new(HistoryStore::from_config(&config.history)),
            default_max_results: config.search.max_results,
        })
    }

    /// Assemble from already-built parts.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        orchestrator: SearchOrchestrator,
        history: Arc<HistoryStore>,
        default_max_results: usize,
    ) -> Self {
        Self {
            fetcher,
            orchestrator,
            details: DetailExtractor,
            history,
            default_max_results,
        }
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy",
            message: "Recipe API is running",
        }
    }

    /// Search by the first of `ingredients`; the others are not used yet.
    pub async fn search(
        &self,
        ingredients: &[String],
        max_results: Option<usize>,
    ) -> Result<SearchResponse, DishError> {
        let primary = ingredients
            .first()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .ok_or_else(|| DishError::Validation("No ingredients provided".to_string()))?;

        let max_results = max_results.unwrap_or(self.default_max_results);
        let recipes = self
            .orchestrator
            .search(self.fetcher.as_ref(), primary, max_results)
            .await;

        Ok(SearchResponse {
            count: recipes.len(),
            recipes,
            search_term: primary.to_string(),
        })
    }

    /// Details for the recipe at `url`; an empty [`RecipeDetails`] when the
    /// page could not be scraped.
    pub async fn recipe_details(&self, url: &str) -> Result<RecipeDetails, DishError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DishError::Validation("Recipe URL is required".to_string()));
        }

        match self.details.fetch_details(self.fetcher.as_ref(), url).await {
            Some(details) => Ok(details),
            None => {
                info!("No details for {}, returning empty recipe", url);
                Ok(RecipeDetails::default())
            }
        }
    }

    pub async fn history(&self) -> Result<HistoryResponse, DishError> {
        let recipes = self.history.read().await.inspect_err(log_internal)?;
        Ok(HistoryResponse {
            count: recipes.len(),
            recipes,
        })
    }

    pub async fn add_to_history(&self, recipe: RecipeInput) -> Result<SuccessResponse, DishError> {
        if recipe.name.trim().is_empty() {
            return Err(DishError::Validation("Recipe name is required".to_string()));
        }

        let entry = self.history.add(recipe).await.inspect_err(log_internal)?;
        Ok(SuccessResponse {
            success: true,
            message: None,
            recipe: Some(entry),
        })
    }

    pub async fn clear_history(&self) -> Result<SuccessResponse, DishError> {
        self.history.clear().await.inspect_err(log_internal)?;
        Ok(SuccessResponse {
            success: true,
            message: Some("History cleared".to_string()),
            recipe: None,
        })
    }
}

fn log_internal(e: &DishError) {
    if !e.is_client_error() {
        error!("History operation failed: {}", e);
    }
}
