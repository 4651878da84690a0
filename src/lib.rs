pub mod api;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod history;
pub mod model;
pub mod search;
pub mod sources;

pub use api::{DishItOut, HistoryResponse, SearchResponse, SuccessResponse};
pub use config::AppConfig;
pub use error::DishError;
pub use history::HistoryStore;
pub use model::{EstimateProvenance, HistoryEntry, RecipeDetails, RecipeInput, RecipeSummary};
pub use search::{CrossSourceDedup, SearchOrchestrator};
