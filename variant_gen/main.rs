use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use prairie_random::Seed;
use tracing::info;
use tracing_subscriber::EnvFilter;
use variant_gen::{generate_variant, Recipe};

#[derive(Parser, Debug)]
#[command(name = "variant_gen")]
#[command(about = "Generate a reproducible question variant from a TOML recipe", long_about = None)]
struct Args {
    /// Recipe file describing the parameters to sample
    #[arg(value_name = "RECIPE")]
    recipe: PathBuf,

    /// Base-36 seed (a clock-derived seed is used when omitted)
    #[arg(short, long)]
    seed: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let recipe = Recipe::from_file(&args.recipe)?;

    let seed = match &args.seed {
        Some(text) => Seed::from_base36(text).with_context(|| format!("Invalid seed '{text}'"))?,
        None => Seed::from_clock(),
    };
    info!(%seed, recipe = %args.recipe.display(), "generating variant");

    let variant = generate_variant(&recipe, seed)?;
    let output = if args.pretty {
        serde_json::to_string_pretty(&variant)?
    } else {
        serde_json::to_string(&variant)?
    };
    println!("{output}");

    Ok(())
}
