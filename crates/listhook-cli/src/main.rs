use std::process;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use listhook::types::Entry;
use listhook::{Config, ConfigError, ListingScraper, WebhookNotifier};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "listhook")]
#[command(
    about = "Scrapes a day's listing pages and posts each entry's image to a webhook",
    long_about = None
)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long,
        env = "DISCORD_WEBHOOK_URL",
        hide_env_values = true,
        help = "Webhook that receives one embed per entry"
    )]
    webhook_url: Option<String>,

    #[arg(
        long,
        env = "LISTHOOK_BASE_URL",
        default_value = listhook::BASE_URL,
        help = "Listing site root; the dated path is appended to it"
    )]
    base_url: String,

    #[arg(
        long,
        default_value_t = 7,
        help = "How many days before today the scraped listing is dated"
    )]
    lookback_days: u32,

    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Treat this date as today instead of the local date",
        value_parser = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string()),
    )]
    date: Option<NaiveDate>,

    #[arg(long, help = "Print the extracted entries instead of posting them")]
    dry_run: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        help = "Output format for --dry-run"
    )]
    format: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn print_entries(entries: &[Entry], format: &OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(entries) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Error serializing to JSON: {}", e);
                process::exit(1);
            }
        },
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No entries to display.");
            }
            for (i, entry) in entries.iter().enumerate() {
                println!("{:>3}. {}", i + 1, entry);
            }
        }
    }
}

fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    Config {
        webhook_url: cli.webhook_url.clone(),
        base_url: cli.base_url.clone(),
        lookback_days: cli.lookback_days,
        ..Config::default()
    }
    .validate()
}

#[tokio::main]
async fn main() {
    // A missing .env is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let config = build_config(&cli).unwrap_or_else(|e| {
        log::error!("Invalid configuration: {e}");
        process::exit(1);
    });

    let notifier = if cli.dry_run {
        None
    } else {
        Some(WebhookNotifier::new(&config).unwrap_or_else(|e| {
            log::error!("Error creating webhook notifier: {}", e);
            process::exit(1);
        }))
    };

    let scraper = ListingScraper::new(&config).unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    let entries = match cli.date {
        Some(today) => scraper.run_for(today).await,
        None => scraper.run().await,
    };

    let Some(notifier) = notifier else {
        print_entries(&entries, &cli.format);
        return;
    };

    if entries.is_empty() {
        log::info!("No entries found to send across all pages.");
        return;
    }

    let stats = notifier.run(&entries).await;
    print!("{}", stats);
}
