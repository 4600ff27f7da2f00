use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;

use ytv_datetime::{config::Config, convert_to_datetimes, errors, listing, DateTimeRange};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// UTC offset of the listing times, e.g. +09:00. Overrides YTV_UTC_OFFSET.
    #[arg(long, global = true, allow_hyphen_values = true)]
    offset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Convert one date and time range, e.g. `convert "1/1（水）" "23:00～25:00"`
    Convert {
        ydate: String,
        ytime: String,
        /// Print a JSON object instead of tab-separated timestamps
        #[arg(long)]
        json: bool,
    },
    /// Convert JSON Lines records with `ydate` and `ytime` fields
    Batch {
        /// Read from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn run() -> errors::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let config = Config::from_env()?.with_offset_override(cli.offset.as_deref())?;

    match &cli.command {
        Commands::Convert { ydate, ytime, json } => {
            let range = DateTimeRange::from(convert_to_datetimes(ydate, ytime, config.offset)?);
            if *json {
                println!("{}", serde_json::to_string(&range)?);
            } else {
                println!("{}\t{}", range.start.to_rfc3339(), range.end.to_rfc3339());
            }
        }
        Commands::Batch { input } => {
            let stdout = io::stdout().lock();
            let summary = match input {
                Some(path) => {
                    log::info!("Converting listings from {}", path.display());
                    listing::convert_listings(
                        BufReader::new(File::open(path)?),
                        stdout,
                        config.offset,
                    )?
                }
                None => listing::convert_listings(io::stdin().lock(), stdout, config.offset)?,
            };
            log::info!(
                "Converted {} listings, skipped {}",
                summary.converted,
                summary.skipped
            );
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("{}", e);
        ::std::process::exit(1);
    }
}
