use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use character_assigner::display::{format_comparison, format_conflict_analysis};
use character_assigner::export::{write_assignments, write_report};
use character_assigner::{
    load_item_catalog, load_preferences, AssignerConfig, CharacterAssigner, CsvFormat, Strategy,
};

/// Assigns characters to people from their ranked preferences.
#[derive(Parser, Debug)]
#[command(name = "character-assigner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML file with analysis, expansion and scoring settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the expansion random source (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show item popularity, conflicts and people at risk
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assign one item per person and optionally save the result
    Assign {
        #[command(flatten)]
        input: InputArgs,

        /// optimal, balanced, priority-fair, greedy-urgency or hybrid.
        /// Without it, every strategy is compared and the best one is used.
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Use the raw preferences instead of expanding short lists first
        #[arg(long)]
        no_expand: bool,

        /// Write the assignments to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a text report to this file
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Compare all strategies on the raw preferences
    Evaluate {
        #[command(flatten)]
        input: InputArgs,

        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Preference CSV file
    file: PathBuf,

    /// wide (one row per person) or long (one row per person/item pair)
    #[arg(short, long, default_value = "wide")]
    format: CsvFormat,

    /// Single-byte CSV delimiter
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// One-column CSV listing every available item
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw.as_bytes() {
        [byte] => Ok(*byte),
        _ if raw == "\\t" => Ok(b'\t'),
        _ => Err(format!("delimiter must be a single ASCII character, got {raw:?}")),
    }
}

fn load_config(cli: &Cli) -> Result<AssignerConfig> {
    let mut config = match &cli.config {
        Some(path) => AssignerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AssignerConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn load_assigner(config: AssignerConfig, input: &InputArgs) -> Result<CharacterAssigner> {
    let (preferences, mut items) = load_preferences(&input.file, input.format, input.delimiter)
        .with_context(|| format!("failed to load preferences from {}", input.file.display()))?;

    if let Some(catalog) = &input.catalog {
        let mut catalog_items = load_item_catalog(catalog)
            .with_context(|| format!("failed to load item catalog {}", catalog.display()))?;
        catalog_items.append(&mut items);
        items = catalog_items;
    }

    let mut assigner = CharacterAssigner::new(config);
    assigner.load(preferences, items);
    Ok(assigner)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Analyze { input, json } => {
            let mut assigner = load_assigner(config, input)?;
            let analysis = assigner.analysis()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(analysis)?);
            } else {
                println!("{}", format_conflict_analysis(analysis));
            }
        }
        Commands::Assign {
            input,
            strategy,
            no_expand,
            output,
            report,
        } => {
            let mut assigner = load_assigner(config, input)?;
            println!("{}", format_conflict_analysis(assigner.analysis()?));

            let strategy = match strategy {
                Some(strategy) => *strategy,
                None => {
                    println!("🔍 Comparing strategies to find the best one...\n");
                    let comparison = assigner.compare_strategies()?;
                    println!("{}\n", format_comparison(&comparison));
                    comparison.best()
                }
            };

            let outcome = assigner.assign_with_strategy(strategy, !*no_expand)?;
            if outcome.optimal_fallback {
                warn!("optimal solver unavailable, result comes from {}", outcome.used);
            }
            if outcome.assignment.is_empty() {
                bail!("no assignments were produced");
            }

            println!(
                "✨ Assignments using {} strategy (selected: {}):",
                outcome.requested.name().to_uppercase(),
                outcome.used.name().to_uppercase()
            );
            println!("{}", assigner.detailed_results(&outcome.assignment)?);

            if let Some(path) = output {
                write_assignments(path, &outcome.assignment, input.delimiter)?;
                println!("\nAssignments saved to {}", path.display());
            }
            if let Some(path) = report {
                let text = assigner.text_report(&outcome.assignment, outcome.used.name())?;
                write_report(path, &text)?;
                println!("Report saved to {}", path.display());
            }
        }
        Commands::Evaluate { input, json } => {
            let assigner = load_assigner(config, input)?;
            let comparison = assigner.compare_strategies()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                println!("{}", format_comparison(&comparison));
            }
        }
    }

    Ok(())
}
