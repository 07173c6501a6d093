use std::path::PathBuf;

use anyhow::Result;
use bofa_scraper::config::{default_config_path, ResolvedConfig};
use bofa_scraper::duration::format_duration;
use bofa_scraper::{browser, export};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str =
    "info,chromiumoxide=warn,chromiumoxide::conn=off,chromiumoxide::handler=off";

#[derive(Parser)]
#[command(name = "bofa-scraper")]
#[command(about = "Download Bank of America transaction history as CSV")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and write one CSV file per account
    Scrape {
        /// Online id used to sign in
        username: String,

        /// Directory for the CSV files (defaults to output_dir from the config)
        #[arg(short, long)]
        outdir: Option<PathBuf>,
    },
    /// Merge CSV files into one, written to stdout
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show current configuration
    Config,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json);

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = ResolvedConfig::load_or_default(&config_path)?;

    match cli.command {
        Command::Scrape { username, outdir } => {
            let outdir = outdir.unwrap_or_else(|| config.output_dir.clone());
            let summary = browser::scrape(&config, &username, &outdir).await?;

            println!("Saved {} file(s):", summary.saved.len());
            for path in &summary.saved {
                println!("  {}", path.display());
            }
            for name in &summary.skipped {
                println!("Skipped unsupported account: {name}");
            }
            for (name, reason) in &summary.failed {
                println!("Incomplete: {name}: {reason}");
            }
        }
        Command::Merge { files } => {
            let stdout = std::io::stdout();
            export::merge_csv(&files, stdout.lock())?;
        }
        Command::Config => {
            println!("Config file: {}", config_path.display());
            println!("Login URL: {}", config.login_url);
            println!("Timeout: {}", format_duration(config.timeout));
            println!("Headless: {}", config.headless);
            match &config.chrome_path {
                Some(path) => println!("Chrome: {}", path.display()),
                None => println!("Chrome: (search PATH)"),
            }
            println!("Output directory: {}", config.output_dir.display());
            println!("Account selector: {}", config.account_selector);
        }
    }

    Ok(())
}
