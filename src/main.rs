use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pantry::config::{LogFormat, PantryConfig};
use pantry::feasibility::{
    calculate_recipe_for_pax, feasibility_for_recipe, max_users_for_recipe, shopping_list,
};
use pantry::normalize::normalize_name;
use pantry::recipe::Recipe;
use pantry::report::{format_calculation, format_feasibility, format_shopping_list, pantry_summary};
use pantry::store::{load_pantry, load_recipes, save_pantry, JsonFileStore};

#[derive(Parser, Debug)]
#[command(name = "pantry")]
#[command(about = "Pantry stock and recipe feasibility", long_about = None)]
struct Cli {
    /// Directory holding pantry.json and recipes.json (overrides PANTRY_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Feasibility of every stored recipe
    Check {
        /// Servings to check (default: PANTRY_DEFAULT_PAX)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        pax: Option<u32>,
    },
    /// Nutrition and cost breakdown, or what to buy
    Plan {
        /// Recipe id or name
        recipe: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        pax: Option<u32>,
    },
    /// Deduct a recipe from the pantry
    Cook {
        /// Recipe id or name
        recipe: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        pax: Option<u32>,
    },
    /// Reverse the last change to an ingredient
    Undo {
        ingredient_id: String,
    },
    /// Pantry stock grouped by unit kind
    Summary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = PantryConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    info!(data_dir = %config.data_dir.display(), "Starting pantry");

    let mut store = JsonFileStore::open(&config.data_dir)?;
    let mut pantry = load_pantry(&store, config.history_limit)?;
    let recipes = load_recipes(&store)?;

    match cli.command {
        Command::Check { pax } => {
            let pax = pax.unwrap_or(config.default_pax);
            let index = pantry.index();
            for recipe in &recipes {
                let feasibility = feasibility_for_recipe(recipe, pax, &index);
                println!("{}", format_feasibility(recipe, pax, &feasibility));
            }
        }
        Command::Plan { recipe, pax } => {
            let recipe = find_recipe(&recipes, &recipe)?;
            let pax = pax.unwrap_or(config.default_pax);
            let index = pantry.index();
            if feasibility_for_recipe(recipe, pax, &index).can_make() {
                let calculation = calculate_recipe_for_pax(recipe, pax, &index)?;
                print!("{}", format_calculation(recipe, &calculation));
            } else {
                println!(
                    "{} serves at most {} with the current pantry",
                    recipe.name,
                    max_users_for_recipe(recipe, &index)
                );
                print!("{}", format_shopping_list(&shopping_list(recipe, pax, &index)));
            }
        }
        Command::Cook { recipe, pax } => {
            let recipe = find_recipe(&recipes, &recipe)?;
            let pax = pax.unwrap_or(config.default_pax);
            let feasibility = feasibility_for_recipe(recipe, pax, &pantry.index());
            if !feasibility.can_make() {
                bail!("{}", format_feasibility(recipe, pax, &feasibility));
            }

            let changes = pantry.consume_recipe(recipe, pax);
            save_pantry(&mut store, &pantry)?;
            for change in &changes {
                println!("• {}: {} left", change.ingredient_id, change.remaining);
            }
        }
        Command::Undo { ingredient_id } => {
            let entry = pantry
                .undo(&ingredient_id, Some("undone from the command line"))
                .with_context(|| format!("Nothing to undo for '{ingredient_id}'"))?;
            println!("{}", entry.ingredient);
            save_pantry(&mut store, &pantry)?;
        }
        Command::Summary => print!("{}", pantry_summary(&pantry)),
    }

    Ok(())
}

/// Match a recipe by id, then by normalized name
fn find_recipe<'a>(recipes: &'a [Recipe], query: &str) -> Result<&'a Recipe> {
    let key = normalize_name(query);
    recipes
        .iter()
        .find(|recipe| recipe.id == query)
        .or_else(|| recipes.iter().find(|recipe| normalize_name(&recipe.name) == key))
        .with_context(|| format!("No recipe matches '{query}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["pantry", "plan", "bowl", "4"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Plan {
                recipe: "bowl".to_string(),
                pax: Some(4)
            }
        );

        let cli = Cli::try_parse_from(["pantry", "check", "--data-dir", "/tmp/p"]).unwrap();
        assert_eq!(cli.command, Command::Check { pax: None });
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/p")));
    }

    #[test]
    fn test_zero_pax_rejected() {
        assert!(Cli::try_parse_from(["pantry", "check", "0"]).is_err());
        assert!(Cli::try_parse_from(["pantry", "cook", "bowl", "0"]).is_err());
        assert!(Cli::try_parse_from(["pantry", "cook", "bowl", "two"]).is_err());
    }

    #[test]
    fn test_missing_recipe_argument_rejected() {
        assert!(Cli::try_parse_from(["pantry", "plan"]).is_err());
        assert!(Cli::try_parse_from(["pantry", "undo"]).is_err());
    }

    #[test]
    fn test_find_recipe_by_id_or_name() -> Result<()> {
        let recipes = vec![Recipe::new("bowl-1", "Grilled Chicken Bowl", 2)?];
        assert_eq!(find_recipe(&recipes, "bowl-1")?.id, "bowl-1");
        assert_eq!(find_recipe(&recipes, "grilled chicken bowls")?.id, "bowl-1");
        assert!(find_recipe(&recipes, "soup").is_err());
        Ok(())
    }
}
