use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use insee_deces::acquisition::ensure_years;
use insee_deces::utils::io::paths::available_years;
use insee_deces::utils::logging::console::{
    print_age_buckets, print_dataset_summary, print_monthly_counts, print_top_countries,
};
use insee_deces::{HttpFetcher, Pipeline, PipelineConfig, write_parquet};

#[derive(Debug, Parser)]
#[command(name = "insee-deces", version, about)]
struct Cli {
    /// Year to work on
    #[arg(short, long, global = true, default_value_t = 2021)]
    year: i32,

    /// Directory holding the extracted archives
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show progress bars
    #[arg(long, global = true)]
    progress: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download and extract the archive of every year in a range
    Fetch {
        /// Last year of the range, defaults to --year
        #[arg(long)]
        to: Option<i32>,
    },
    /// Print counts by sex, month, age group and country of birth
    Summary {
        /// Number of countries of birth to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Write the cleaned records of the year to a Parquet file
    Export {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the years present in the data directory
    Years,
}

fn load_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir.clone_from(dir);
    }
    if cli.progress {
        config.show_progress = true;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let start = Instant::now();

    match cli.command.unwrap_or(Command::Summary { top: 10 }) {
        Command::Fetch { to } => {
            let last = to.unwrap_or(cli.year);
            let fetcher = HttpFetcher::new(config.http_timeout())?;
            let outcomes = ensure_years(&config, &fetcher, cli.year..=last)?;
            for outcome in &outcomes {
                match outcome.dir() {
                    Some(dir) => info!("{}: {}", outcome.period(), dir.display()),
                    None => log::warn!("{}: unavailable", outcome.period()),
                }
            }
        }
        Command::Summary { top } => {
            let pipeline = Pipeline::new(config)?;
            let dataset = pipeline.select_year(cli.year)?;
            print_dataset_summary(&dataset);
            println!();
            print_monthly_counts(&dataset);
            println!();
            print_age_buckets(&dataset);
            println!();
            print_top_countries(&dataset, top);
        }
        Command::Export { output } => {
            let pipeline = Pipeline::new(config)?;
            let dataset = pipeline.select_year(cli.year)?;
            let batch = dataset.to_record_batch()?;
            write_parquet(&output, &[batch])
                .with_context(|| format!("writing {}", output.display()))?;
            info!("Wrote {} records to {}", dataset.len(), output.display());
        }
        Command::Years => {
            for year in available_years(&config.data_dir)? {
                println!("{year}");
            }
        }
    }

    info!("Done in {:?}", start.elapsed());
    Ok(())
}
