use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod analyzer;
mod efficiency;
mod error;
mod loader;
mod models;
mod plots;
mod report;
mod segment;
mod stats;

use loader::ColumnNames;
use models::{DEFAULT_SCORE_COLUMN, DEFAULT_TIME_COLUMN};

#[derive(Parser)]
#[command(name = "exam-insight")]
#[command(about = "Statistics and student segmentation for exam attempt CSVs", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a CSV of exam attempts
    Analyze {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, env = "EXAM_TIME_COLUMN", default_value = DEFAULT_TIME_COLUMN)]
        time_column: String,
        #[arg(long, env = "EXAM_SCORE_COLUMN", default_value = DEFAULT_SCORE_COLUMN)]
        score_column: String,
        /// Also write a markdown report
        #[arg(long)]
        out: Option<PathBuf>,
        /// Directory for the Vega-Lite plot files
        #[arg(long)]
        plots_dir: Option<PathBuf>,
        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score per minute for a single attempt
    Efficiency {
        #[arg(long, allow_negative_numbers = true)]
        score: f64,
        #[arg(long, allow_negative_numbers = true)]
        time: f64,
        #[arg(long, default_value_t = efficiency::DEFAULT_PRECISION)]
        precision: usize,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            csv,
            time_column,
            score_column,
            out,
            plots_dir,
            json,
        } => {
            let request = analyzer::AnalysisRequest {
                csv_path: csv.clone(),
                columns: ColumnNames {
                    time: time_column,
                    score: score_column,
                },
            };
            let response = analyzer::handle_request(&request);
            if response.is_error() {
                eprintln!("{}", response.message);
                std::process::exit(1);
            }
            let analysis = response
                .analysis
                .context("successful response carried no analysis")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print!("{}", report::render_text(&analysis));
            }

            if let Some(out) = out {
                let body =
                    report::build_report(&analysis, &csv.display().to_string(), chrono::Utc::now());
                std::fs::write(&out, body)
                    .with_context(|| format!("failed to write report {}", out.display()))?;
                eprintln!("Report written to {}.", out.display());
            }

            if let Some(dir) = plots_dir {
                for path in plots::write_plots(&analysis, &dir)? {
                    eprintln!("Plot written to {}.", path.display());
                }
            }
        }
        Commands::Efficiency {
            score,
            time,
            precision,
        } => {
            println!("{}", efficiency::calculate(score, time, precision));
        }
    }

    Ok(())
}
