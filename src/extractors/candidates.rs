use log::{debug, info};
use rand::Rng;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

use super::{
    char_len, first_non_empty, flatten_text, recipe_id, select_all, title_case, Strategy,
    RECIPE_PATH_MARKER,
};
use crate::error::DishError;
use crate::model::{EstimateProvenance, RecipeSummary};

/// Accepted summaries per page.
pub const MAX_CANDIDATES: usize = 15;
/// Raw anchors inspected per page; duplicates make up part of them.
pub const MAX_RAW_CANDIDATES: usize = 20;

const CARD_LIST_ID_PREFIX: &str = "mntl-card-list-items";

/// Everything the extractor needs from one anchor on a search page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateAnchor {
    pub href: Option<String>,
    pub title: Option<String>,
    pub alt_title: Option<String>,
    pub text: String,
}

impl CandidateAnchor {
    fn from_element(anchor: ElementRef) -> Self {
        let span_text = |css: &str| {
            select_all(anchor, css)
                .into_iter()
                .next()
                .map(flatten_text)
                .filter(|text| !text.is_empty())
        };

        Self {
            href: anchor.value().attr("href").map(str::to_string),
            title: span_text("span.card__title"),
            alt_title: span_text("span.card__title-text"),
            text: flatten_text(anchor),
        }
    }

    fn resolve_name(&self, id: &str) -> String {
        let name = self
            .title
            .clone()
            .or_else(|| self.alt_title.clone())
            .unwrap_or_else(|| self.text.clone());

        if char_len(&name) < 3 {
            title_case(&id.replace('-', " "))
        } else {
            name
        }
    }
}

fn collect_anchors<'a>(anchors: impl Iterator<Item = ElementRef<'a>>) -> Vec<CandidateAnchor> {
    anchors.map(CandidateAnchor::from_element).collect()
}

fn card_list_anchors(document: &Html) -> Vec<CandidateAnchor> {
    collect_anchors(
        select_all(document.root_element(), "a[id]")
            .into_iter()
            .filter(|a| {
                a.value()
                    .attr("id")
                    .is_some_and(|id| id.starts_with(CARD_LIST_ID_PREFIX))
            }),
    )
}

fn recipe_path_anchors(document: &Html) -> Vec<CandidateAnchor> {
    collect_anchors(
        select_all(document.root_element(), "a[href]")
            .into_iter()
            .filter(|a| {
                a.value()
                    .attr("href")
                    .is_some_and(|href| href.contains(RECIPE_PATH_MARKER))
            }),
    )
}

fn recipe_path_selector(document: &Html) -> Vec<CandidateAnchor> {
    collect_anchors(select_all(document.root_element(), "a[href*='/recipe/']").into_iter())
}

const STRATEGIES: [Strategy<CandidateAnchor>; 3] = [
    Strategy {
        name: "card list ids",
        run: card_list_anchors,
    },
    Strategy {
        name: "recipe path anchors",
        run: recipe_path_anchors,
    },
    Strategy {
        name: "recipe path selector",
        run: recipe_path_selector,
    },
];

/// Turns a search-results page into recipe summaries.
pub struct CandidateExtractor {
    base_url: Url,
    source: String,
}

impl CandidateExtractor {
    pub fn new(base_url: &str, source: impl Into<String>) -> Result<Self, DishError> {
        let base_url =
            Url::parse(base_url).map_err(|e| DishError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            base_url,
            source: source.into(),
        })
    }

    pub fn extract(&self, markup: &str) -> Vec<RecipeSummary> {
        self.extract_with_rng(markup, &mut rand::rng())
    }

    /// Like [`extract`](Self::extract) with a caller-supplied source of the
    /// synthesized `time`/`dishes` numbers.
    pub fn extract_with_rng<R: Rng>(&self, markup: &str, rng: &mut R) -> Vec<RecipeSummary> {
        let anchors = {
            let document = Html::parse_document(markup);
            first_non_empty(&STRATEGIES, &document)
        };
        info!("Found {} potential recipe cards", anchors.len());

        self.summarize_all(&anchors, rng)
    }

    /// Convert anchors in order, skipping bad or repeated ones.
    pub fn summarize_all<R: Rng>(
        &self,
        anchors: &[CandidateAnchor],
        rng: &mut R,
    ) -> Vec<RecipeSummary> {
        let mut seen = HashSet::new();
        let mut recipes = Vec::new();

        for anchor in anchors.iter().take(MAX_RAW_CANDIDATES) {
            match self.summarize(anchor, &mut seen, rng) {
                Ok(Some(recipe)) => {
                    recipes.push(recipe);
                    if recipes.len() >= MAX_CANDIDATES {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => debug!("Skipping recipe card: {}", e),
            }
        }

        info!("Successfully parsed {} recipes", recipes.len());
        recipes
    }

    fn summarize<R: Rng>(
        &self,
        anchor: &CandidateAnchor,
        seen: &mut HashSet<String>,
        rng: &mut R,
    ) -> Result<Option<RecipeSummary>, DishError> {
        let href = match anchor.href.as_deref() {
            Some(href) if href.contains(RECIPE_PATH_MARKER) => href,
            _ => return Ok(None),
        };

        let id = recipe_id(href);
        if !seen.insert(id.clone()) {
            return Ok(None);
        }

        let name = anchor.resolve_name(&id);
        if char_len(&name) <= 3 {
            return Ok(None);
        }

        let url = self
            .base_url
            .join(href)
            .map_err(|e| DishError::InvalidUrl(format!("{href}: {e}")))?;

        Ok(Some(RecipeSummary {
            id,
            name,
            url: url.to_string(),
            time: rng.random_range(15..=60),
            dishes: rng.random_range(2..=6),
            source: self.source.clone(),
            is_history: false,
            estimate_provenance: EstimateProvenance::Synthesized,
        }))
    }
}
