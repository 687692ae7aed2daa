//! Paper Wrangler - Entry Point
//!
//! One subcommand per pipeline.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, error::ErrorKind};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paper_wrangler::{
    Config, ToolError, WranglerClient,
    artifacts::ArtifactFiles,
    config::paths,
    formatters::results_path,
    models::OutputFormat,
    tools::{self, OllamaCountryModel, countries, reviewers, scrape},
};

#[derive(Parser, Debug)]
#[command(name = "paper-wrangler")]
#[command(about = "Conference paper data-wrangling utilities")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a BibTeX file to CSV (title, authors, url, abstract)
    Bib {
        /// Input BibTeX file
        input: PathBuf,
        /// Output file name, placed under <results-dir>/bib/
        output: String,
        /// Root directory for generated files
        #[arg(long, default_value = paths::RESULTS_DIR)]
        results_dir: PathBuf,
    },

    /// Convert a conference year's bibliography and flag artifact badges
    BibArtifacts {
        /// Conference year, e.g. 2023
        year: String,
        /// Output file name, placed under <results-dir>/bib/
        output: String,
        /// Directory holding one sub-directory per year
        #[arg(long, default_value = paths::DATA_DIR)]
        data_dir: PathBuf,
        /// Venue name used in the bibliography file names
        #[arg(long, default_value = "ICSE")]
        venue: String,
        /// Root directory for generated files
        #[arg(long, default_value = paths::RESULTS_DIR)]
        results_dir: PathBuf,
    },

    /// Split papers marked ai=true evenly across reviewers
    Assign {
        /// Input CSV (converted bibliography with an `ai` column)
        input: PathBuf,
        /// Output CSV
        output: PathBuf,
        /// Comma-separated reviewer initials, e.g. DW,AA,JP,FS
        reviewers: String,
    },

    /// Fetch per-author affiliations from Crossref
    Affiliations {
        /// Input CSV with a `url` column of doi.org links
        input: PathBuf,
        /// Output CSV
        output: PathBuf,
        /// Crossref API base URL
        #[arg(long)]
        crossref_url: Option<String>,
        /// Contact address for the Crossref polite pool
        #[arg(long)]
        mailto: Option<String>,
    },

    /// Infer the country of each affiliation with a local model
    Countries {
        /// Input affiliation CSV
        input: PathBuf,
        /// Output CSV (default: <input>_with_countries.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Model name
        #[arg(long)]
        model: Option<String>,
        /// Ollama server address
        #[arg(long)]
        ollama_url: Option<String>,
        /// Also recompute rows whose country is the `Error` sentinel
        #[arg(long)]
        retry_errors: bool,
    },

    /// Scrape paper titles and authors from a conference program page
    Scrape {
        /// Program page URL
        url: String,
        /// Conference year, used in the output file name
        year: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
        /// Root directory for generated files
        #[arg(long, default_value = paths::RESULTS_DIR)]
        results_dir: PathBuf,
    },
}

/// Parse arguments; usage errors print to stdout and exit with status 1.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                println!("{}", err.render());
                std::process::exit(1);
            }
        },
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn bib_output(results_dir: &Path, output: &str) -> PathBuf {
    results_path(results_dir, paths::BIB_SUBDIR, output)
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Bib { input, output, results_dir } => {
            let output = bib_output(&results_dir, &output);
            let papers = tools::convert_bibliography(&input, &output)?;
            println!("Successfully parsed {} papers from {}", papers.len(), input.display());
            println!("Results saved to {}", output.display());
        }

        Command::BibArtifacts { year, output, data_dir, venue, results_dir } => {
            let files = ArtifactFiles::for_year(&data_dir, &year, &venue);
            let output = bib_output(&results_dir, &output);
            let report = tools::convert_with_artifacts(&files, &output)?;
            println!("Successfully parsed {} papers from {year} {venue}", report.papers);
            println!("Artifact statistics:");
            println!("  Available: {} papers", report.available);
            println!("  Reusable: {} papers", report.reusable);
            println!("  Functional: {} papers", report.functional);
            println!("  With any badge: {} papers", report.badged);
            println!("Results saved to {}", output.display());
        }

        Command::Assign { input, output, reviewers: initials } => {
            let reviewers = reviewers::parse_reviewers(&initials)?;
            let summary = tools::assign_reviewers(&input, &output, &reviewers)?;
            if !summary.written {
                println!("No papers with ai=True found.");
                return Ok(());
            }
            println!("Assigned {} papers to {} reviewers.", summary.selected, reviewers.len());
            println!("Output written to: {}", output.display());
            for (reviewer, load) in &summary.loads {
                println!("{reviewer}: {load} papers");
            }
        }

        Command::Affiliations { input, output, crossref_url, mailto } => {
            let mut config = Config::from_env()?;
            if let Some(url) = crossref_url {
                config.crossref_api_url = url.trim_end_matches('/').to_string();
            }
            if mailto.is_some() {
                config.mailto = mailto;
            }
            if !config.has_mailto() {
                tracing::warn!("No Crossref mailto configured, requests go to the public pool");
            }

            let client = WranglerClient::new(&config)?;
            let summary = tools::fetch_affiliations(&client, &input, &output).await?;
            println!("Done! Saved {} author entries to {}", summary.rows, output.display());
        }

        Command::Countries { input, output, model, ollama_url, retry_errors } => {
            let mut config = Config::from_env()?;
            if let Some(url) = ollama_url {
                config = config.with_ollama_url(&url);
            }
            if let Some(model) = model {
                config.model = model;
            }

            let output = output.unwrap_or_else(|| countries::default_output_path(&input));
            let client = WranglerClient::new(&config)?;
            let model = OllamaCountryModel::new(client, config.model.clone());
            tracing::info!(model = %model.model(), "Extracting countries");

            let summary = tools::extract_countries(&model, &input, &output, retry_errors).await?;
            println!("Results saved to {}", output.display());
            println!();
            println!("Country distribution:");
            for (country, count) in &summary.top_countries {
                println!("{country:<40} {count}");
            }
        }

        Command::Scrape { url, year, format, results_dir } => {
            let config = Config::from_env()?;
            let client = WranglerClient::new(&config)?;
            let entries = tools::scrape_table(&client, &url).await?;
            let path = scrape::output_path(&results_dir, &year, format);
            if scrape::save_entries(&entries, &path, format)? {
                println!("Saved {} papers to {}", entries.len(), path.display());
            }
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = parse_cli();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), command = ?cli.command, "Starting");

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err
                .downcast_ref::<ToolError>()
                .map_or_else(|| format!("{err:#}"), ToolError::to_user_message);
            println!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}
