use log::{debug, info, warn};
use scraper::Html;

use super::{char_len, first_non_empty, flatten_text, select_all, title_case, Strategy};
use crate::fetchers::PageFetcher;
use crate::model::RecipeDetails;

pub const MAX_INGREDIENTS: usize = 20;
pub const MAX_TOOLS: usize = 10;
pub const MAX_INSTRUCTIONS: usize = 30;

/// Tools looked for anywhere in the page text.
///
/// This is a presence test: a tool named in a comment or an ad counts just
/// the same as one used in the method.
pub const KITCHEN_TOOLS: [&str; 22] = [
    "pan",
    "pot",
    "bowl",
    "spatula",
    "spoon",
    "knife",
    "cutting board",
    "whisk",
    "mixer",
    "oven",
    "stove",
    "blender",
    "food processor",
    "baking sheet",
    "measuring cup",
    "measuring spoon",
    "colander",
    "strainer",
    "grater",
    "peeler",
    "tongs",
    "ladle",
];

const INSTRUCTION_SELECTOR: &str = "li.mntl-sc-block-group--LI, ol li, .recipe-directions li";

/// Flattened text of every match for `css`, keeping items longer than `min_len`.
fn texts_longer_than(document: &Html, css: &str, min_len: usize) -> Vec<String> {
    select_all(document.root_element(), css)
        .into_iter()
        .map(flatten_text)
        .filter(|text| char_len(text) > min_len)
        .collect()
}

fn structured_ingredients(document: &Html) -> Vec<String> {
    texts_longer_than(document, "li.mntl-structured-ingredients__list-item", 1)
}

fn ingredient_name_attribute(document: &Html) -> Vec<String> {
    texts_longer_than(document, "[data-ingredient-name='true']", 1)
}

fn ingredient_class(document: &Html) -> Vec<String> {
    select_all(document.root_element(), "li[class], p[class]")
        .into_iter()
        .filter(|el| {
            el.value()
                .attr("class")
                .is_some_and(|class| class.to_lowercase().contains("ingredient"))
        })
        .map(flatten_text)
        .filter(|text| char_len(text) > 2)
        .collect()
}

const INGREDIENT_STRATEGIES: [Strategy<String>; 3] = [
    Strategy {
        name: "structured ingredients",
        run: structured_ingredients,
    },
    Strategy {
        name: "ingredient name attribute",
        run: ingredient_name_attribute,
    },
    Strategy {
        name: "ingredient class",
        run: ingredient_class,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeBucket {
    Prep,
    Cook,
    Total,
}

impl TimeBucket {
    fn classify(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.contains("prep") {
            Some(TimeBucket::Prep)
        } else if lower.contains("cook") {
            Some(TimeBucket::Cook)
        } else if lower.contains("total") {
            Some(TimeBucket::Total)
        } else {
            None
        }
    }
}

/// Turns a single recipe page into [`RecipeDetails`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailExtractor;

impl DetailExtractor {
    /// Fetch `url` and extract its details.
    ///
    /// Returns `None` when the page could not be fetched, which is not the
    /// same as a page that was fetched but had nothing recognisable on it.
    pub async fn fetch_details(
        &self,
        fetcher: &dyn PageFetcher,
        url: &str,
    ) -> Option<RecipeDetails> {
        let markup = match fetcher.fetch(url).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!("Error scraping recipe details from {}: {}", url, e);
                return None;
            }
        };

        info!("Scraping details from: {}", url);
        Some(self.parse(&markup))
    }

    pub fn parse(&self, markup: &str) -> RecipeDetails {
        let document = Html::parse_document(markup);

        let mut details = RecipeDetails {
            ingredients: self.ingredients(&document),
            tools: self.tools(&document),
            instructions: self.instructions(&document),
            ..Default::default()
        };
        self.fill_times(&document, &mut details);

        info!(
            "Extracted {} ingredients, {} tools, {} steps",
            details.ingredients.len(),
            details.tools.len(),
            details.instructions.len()
        );
        details
    }

    fn ingredients(&self, document: &Html) -> Vec<String> {
        let mut ingredients = first_non_empty(&INGREDIENT_STRATEGIES, document);
        ingredients.truncate(MAX_INGREDIENTS);
        ingredients
    }

    fn tools(&self, document: &Html) -> Vec<String> {
        let page_text = document
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        KITCHEN_TOOLS
            .iter()
            .filter(|tool| page_text.contains(*tool))
            .map(|tool| title_case(tool))
            .take(MAX_TOOLS)
            .collect()
    }

    fn instructions(&self, document: &Html) -> Vec<String> {
        let mut instructions = texts_longer_than(document, INSTRUCTION_SELECTOR, 10);
        instructions.truncate(MAX_INSTRUCTIONS);
        instructions
    }

    fn fill_times(&self, document: &Html, details: &mut RecipeDetails) {
        let candidates = select_all(document.root_element(), "div[class], span[class]")
            .into_iter()
            .filter(|el| {
                el.value()
                    .attr("class")
                    .is_some_and(|class| class.to_lowercase().contains("time"))
            });

        for element in candidates {
            let text = flatten_text(element);
            let slot = match TimeBucket::classify(&text) {
                Some(TimeBucket::Prep) => &mut details.prep_time,
                Some(TimeBucket::Cook) => &mut details.cook_time,
                Some(TimeBucket::Total) => &mut details.total_time,
                None => continue,
            };

            if slot.is_none() {
                debug!("Found time element: {}", text);
                *slot = Some(text);
            }
        }
    }
}
