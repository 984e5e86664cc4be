//! City Builder - Save Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use city_tools::inspect::{self, SaveSelector};
use city_tools::validate;

#[derive(Parser)]
#[command(name = "city-tools")]
#[command(about = "Save directory tools for City Builder")]
struct Cli {
    /// Save directory
    #[arg(short, long, global = true, env = "CITY_SAVES_DIR", default_value = "saves")]
    saves_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saves, oldest first
    List {
        /// Only saves of this city
        #[arg(long)]
        city: Option<String>,
    },

    /// Print a save
    Show {
        /// Newest save of this city
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        city: Option<String>,

        /// A specific save file
        #[arg(long)]
        file: Option<String>,

        /// Print the full record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that every save file is readable and well named
    Validate,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { city } => match inspect::list_saves(&cli.saves_dir, city.as_deref()) {
            Ok(entries) => print!("{}", inspect::format_entries(&entries)),
            Err(e) => {
                tracing::error!("Listing failed: {e}");
                std::process::exit(1);
            }
        },
        Commands::Show { city, file, json } => {
            let selector = match (city, file) {
                (Some(city), _) => SaveSelector::LatestOf(city),
                (None, Some(file)) => SaveSelector::File(file),
                (None, None) => {
                    tracing::error!("Pass --city or --file");
                    std::process::exit(2);
                }
            };
            match inspect::load_save(&cli.saves_dir, &selector) {
                Ok(record) if json => match serde_json::to_string_pretty(&record) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        tracing::error!("Encoding failed: {e}");
                        std::process::exit(1);
                    }
                },
                Ok(record) => println!("{}", inspect::summarize(&record)),
                Err(e) => {
                    tracing::error!("Loading failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Validate => {
            tracing::info!("Validating saves in: {}", cli.saves_dir.display());
            match validate::validate_save_directory(&cli.saves_dir) {
                Ok(report) => {
                    println!("{}", validate::format_report(&report));
                    if report.is_clean() {
                        tracing::info!("Validation passed");
                    } else {
                        tracing::error!("Validation failed");
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
