use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::debug;
use serde::Deserialize;
use tokio::io::AsyncReadExt;

use recipe_engine::{
    aggregate, format_quantity, group_with, load_config, parse, scale, AggregationRequest,
    GroupBy, LookupSourceFactory, Normalizer,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a JSON recipe draft (from FILE or stdin) into a canonical recipe
    Normalize {
        /// Path to the draft; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Parse one ingredient line
    Parse {
        line: String,
        /// Scale the parsed quantity by this factor
        #[arg(short, long, default_value_t = 1.0)]
        factor: f64,
    },
    /// Build a grouped shopping list from a plan file
    Shop {
        /// JSON plan: {"recipes": [{"recipe": ..., "target_servings": 4, "menu_section": "..."}]}
        plan: PathBuf,
        /// category, supplier or recipe
        #[arg(short, long, default_value = "category")]
        group_by: GroupBy,
    },
}

#[derive(Deserialize, Debug)]
struct ShoppingPlan {
    #[serde(default)]
    recipes: Vec<PlanItem>,
}

#[derive(Deserialize, Debug)]
struct PlanItem {
    recipe: serde_json::Value,
    #[serde(default)]
    target_servings: Option<f64>,
    #[serde(default)]
    menu_section: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config()?;
    let normalizer = Normalizer::new(config.limits.clone());

    match cli.command {
        Command::Normalize { file } => {
            let input = read_input(file.as_ref()).await?;
            let draft: serde_json::Value = serde_json::from_str(&input)?;
            let recipe = normalizer.normalize_producer_json(&draft)?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        Command::Parse { line, factor } => {
            let parsed = parse(&line);
            let scaled = scale(parsed.quantity, factor);
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "parsed": parsed,
                    "scaled": scaled,
                }))?
            );
            debug!("Display: {} {} {}", scaled.display, parsed.unit, parsed.name);
        }
        Command::Shop { plan, group_by } => {
            let input = read_input(Some(&plan)).await?;
            let plan: ShoppingPlan = serde_json::from_str(&input)?;

            let mut requests = Vec::with_capacity(plan.recipes.len());
            for item in plan.recipes {
                let recipe = normalizer.normalize_producer_json(&item.recipe)?;
                requests.push(AggregationRequest {
                    target_servings: item.target_servings.unwrap_or(f64::from(recipe.serves)),
                    recipe,
                    menu_section: item.menu_section,
                });
            }
            let entries = aggregate(&requests);

            let source = LookupSourceFactory::from_config(&config.lookup)?;
            debug!("Loading lookup table from {} source", source.source_name());
            let lookup = source.load().await?;

            let groups = group_with(&entries, group_by, &lookup, &config.shopping);
            let output: serde_json::Map<String, serde_json::Value> = groups
                .into_iter()
                .map(|(name, members)| {
                    let members = members
                        .into_iter()
                        .map(|entry| {
                            serde_json::json!({
                                "name": entry.name,
                                "quantity": entry.quantity,
                                "display": format_quantity(entry.quantity),
                                "unit": entry.unit,
                                "category": entry.category,
                                "supplier": entry.supplier,
                                "recipes": entry.recipes,
                            })
                        })
                        .collect();
                    (name, serde_json::Value::Array(members))
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

async fn read_input(path: Option<&PathBuf>) -> Result<String, std::io::Error> {
    match path {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            Ok(input)
        }
    }
}
