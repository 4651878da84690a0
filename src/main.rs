use clap::{Parser, Subcommand};
use log::error;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use dish_it_out::{AppConfig, DishError, DishItOut, RecipeInput};

#[derive(Debug, Parser)]
#[command(
    name = "dish-it-out",
    version,
    about = "Find recipes by ingredient and keep track of what you cooked"
)]
struct Cli {
    /// History file (overrides configuration)
    #[arg(long, value_name = "FILE", global = true)]
    history_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search recipes by ingredient (only the first one is used)
    Search {
        #[arg(value_name = "INGREDIENT", required = true)]
        ingredients: Vec<String>,
        #[arg(long, value_name = "N")]
        max_results: Option<usize>,
    },
    /// Scrape ingredients, tools and steps from a recipe page
    Details {
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Show or change the cooking history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Check that the service is usable
    Health,
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    /// List cooked recipes, most recent first
    List,
    /// Record that a recipe was cooked
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    /// Remove the whole history
    Clear,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), DishError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), DishError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.history_file {
        config.history.path = path;
    }
    let app = DishItOut::from_config(&config)?;

    match cli.command {
        Command::Search {
            ingredients,
            max_results,
        } => print_json(&app.search(&ingredients, max_results).await?),
        Command::Details { url } => print_json(&app.recipe_details(&url).await?),
        Command::History { action } => match action {
            HistoryAction::List => print_json(&app.history().await?),
            HistoryAction::Add {
                name,
                url,
                source,
                id,
            } => {
                let recipe = RecipeInput {
                    id,
                    name,
                    url,
                    source,
                    ..Default::default()
                };
                print_json(&app.add_to_history(recipe).await?)
            }
            HistoryAction::Clear => print_json(&app.clear_history().await?),
        },
        Command::Health => print_json(&app.health()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_client_error() => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
