use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};

mod candidates;
mod details;

pub use candidates::{CandidateAnchor, CandidateExtractor, MAX_CANDIDATES, MAX_RAW_CANDIDATES};
pub use details::{
    DetailExtractor, KITCHEN_TOOLS, MAX_INGREDIENTS, MAX_INSTRUCTIONS, MAX_TOOLS,
};

/// Marker every recipe page path contains.
pub const RECIPE_PATH_MARKER: &str = "/recipe/";

/// One way of pulling items out of a page.
///
/// Strategies are tried in order and the first one that finds anything
/// wins; see [`first_non_empty`].
pub struct Strategy<T> {
    pub name: &'static str,
    pub run: fn(&Html) -> Vec<T>,
}

/// Run `strategies` in order and return the items of the first one that
/// yields a non-empty result.
pub fn first_non_empty<T>(strategies: &[Strategy<T>], document: &Html) -> Vec<T> {
    for strategy in strategies {
        let items = (strategy.run)(document);
        if !items.is_empty() {
            debug!("Strategy '{}' found {} items", strategy.name, items.len());
            return items;
        }
    }
    Vec::new()
}

/// Select every element matching `css` below `root`.
///
/// An invalid selector is logged and treated as matching nothing.
pub(crate) fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => root.select(&selector).collect(),
        Err(e) => {
            warn!("Invalid selector '{}': {:?}", css, e);
            Vec::new()
        }
    }
}

/// Text of an element with all whitespace runs collapsed to single spaces.
pub(crate) fn flatten_text(element: ElementRef) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Stable id for a recipe URL.
///
/// Uses the path segment before the trailing slash
/// (`/recipe/123/chicken-soup/` gives `chicken-soup`), or a hash of the
/// whole URL when there is no such segment.
pub fn recipe_id(url: &str) -> String {
    let segments: Vec<&str> = url.split('/').collect();
    if segments.len() >= 2 {
        let segment = segments[segments.len() - 2];
        if !segment.is_empty() {
            return segment.to_string();
        }
    }
    stable_hash(url)
}

/// Short hex digest, identical across runs and platforms.
pub fn stable_hash(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

/// "cutting board" -> "Cutting Board"
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
