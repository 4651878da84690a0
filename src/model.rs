use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Where the `time` and `dishes` numbers of a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EstimateProvenance {
    /// Placeholder numbers generated locally; not read from the site.
    #[default]
    Synthesized,
    /// Numbers read from the recipe page.
    Scraped,
}

/// A recipe found by searching a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub url: String,
    /// Minutes to cook. See `estimate_provenance` before trusting it.
    pub time: u32,
    /// Number of servings. See `estimate_provenance` before trusting it.
    pub dishes: u32,
    pub source: String,
    pub is_history: bool,
    #[serde(default)]
    pub estimate_provenance: EstimateProvenance,
}

/// Structured fields scraped from a single recipe page.
///
/// `Default` is the empty response handed out when a page could not be
/// fetched or parsed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    pub ingredients: Vec<String>,
    pub tools: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub servings: Option<String>,
}

/// A recipe as submitted for the cooking history. Only `name` is required.
///
/// `isHistory`, `lastCooked` and `cookCount` are accepted so that a
/// previously returned entry can be posted back, but the store owns those
/// fields and ignores whatever the caller sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub time: Option<u32>,
    #[serde(default)]
    pub dishes: Option<u32>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub estimate_provenance: Option<EstimateProvenance>,
    #[serde(default, skip_serializing)]
    pub is_history: Option<bool>,
    #[serde(default, skip_serializing)]
    pub last_cooked: Option<String>,
    #[serde(default, skip_serializing)]
    pub cook_count: Option<u32>,
    /// Any other fields, e.g. ingredients parsed after the first cook.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<RecipeSummary> for RecipeInput {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: Some(summary.id),
            name: summary.name,
            url: Some(summary.url),
            time: Some(summary.time),
            dishes: Some(summary.dishes),
            source: Some(summary.source),
            estimate_provenance: Some(summary.estimate_provenance),
            ..Default::default()
        }
    }
}

/// A recipe the user has cooked, as kept in the history document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub time: Option<u32>,
    #[serde(default)]
    pub dishes: Option<u32>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub estimate_provenance: Option<EstimateProvenance>,
    #[serde(default = "default_is_history")]
    pub is_history: bool,
    /// Written as RFC 3339; timestamps without an offset are read as UTC.
    #[serde(deserialize_with = "deserialize_last_cooked")]
    pub last_cooked: DateTime<Utc>,
    #[serde(default = "default_cook_count")]
    pub cook_count: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_is_history() -> bool {
    true
}

fn default_cook_count() -> u32 {
    1
}

fn deserialize_last_cooked<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(timestamp) = raw.parse::<DateTime<Utc>>() {
        return Ok(timestamp);
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid lastCooked '{raw}': {e}")))
}

impl HistoryEntry {
    /// Build a fresh entry for a first cook.
    pub fn first_cook(id: String, input: RecipeInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            url: input.url,
            time: input.time,
            dishes: input.dishes,
            source: input.source,
            estimate_provenance: input.estimate_provenance,
            is_history: true,
            last_cooked: now,
            cook_count: 1,
            extra: input.extra,
        }
    }

    /// Record another cook of the same recipe.
    ///
    /// Every field present on `input` replaces the stored one; cook
    /// statistics are never taken from the input.
    pub fn record_cook(&mut self, input: RecipeInput, now: DateTime<Utc>) {
        self.last_cooked = now;
        self.cook_count = self.cook_count.max(1).saturating_add(1);
        self.is_history = true;

        if let Some(id) = input.id {
            self.id = id;
        }
        if !input.name.trim().is_empty() {
            self.name = input.name;
        }
        if input.url.is_some() {
            self.url = input.url;
        }
        if input.time.is_some() {
            self.time = input.time;
        }
        if input.dishes.is_some() {
            self.dishes = input.dishes;
        }
        if input.source.is_some() {
            self.source = input.source;
        }
        if input.estimate_provenance.is_some() {
            self.estimate_provenance = input.estimate_provenance;
        }
        self.extra.extend(input.extra);
    }
}
