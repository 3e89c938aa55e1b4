//! Translator Gateway CLI - Command line front end for the translation gateway.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;
use translator_gateway_core::{
    AUTO_DETECT, AppConfig, DEFAULT_TARGET_LANG, Database, DeleteOutcome, NewTranslationRecord,
    Outcome, TranslationGateway, TranslationPayload, TranslationRecord,
};

#[derive(Parser, Debug)]
#[command(name = "translator-gateway")]
#[command(author, version, about = "Translate text through a cloud translation API", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, global = true, env = "TRANSLATOR_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// History store directory
    #[arg(long, global = true, env = "HISTORY_PATH")]
    history: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate one text (reads stdin when TEXT is omitted)
    Translate {
        text: Option<String>,

        /// Target language code
        #[arg(short = 't', long, default_value = DEFAULT_TARGET_LANG)]
        target: String,

        /// Source language code
        #[arg(short = 's', long, default_value = AUTO_DETECT)]
        source: String,

        #[command(flatten)]
        record: RecordArgs,
    },

    /// Translate several texts in one request
    Batch {
        /// Texts to translate
        texts: Vec<String>,

        /// Read texts from a file, one per line
        #[arg(short, long, conflicts_with = "texts")]
        file: Option<PathBuf>,

        /// Target language code
        #[arg(short = 't', long, default_value = DEFAULT_TARGET_LANG)]
        target: String,

        /// Source language code
        #[arg(short = 's', long, default_value = AUTO_DETECT)]
        source: String,

        #[command(flatten)]
        record: RecordArgs,
    },

    /// Detect the language of a text (reads stdin when TEXT is omitted)
    Detect { text: Option<String> },

    /// List supported languages
    Languages {
        /// Language for the display names (defaults to the configured one)
        #[arg(short, long)]
        display: Option<String>,

        /// Store the listing in the language catalog
        #[arg(long)]
        sync: bool,
    },

    /// Inspect or prune the translation history
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(clap::Args, Debug)]
struct RecordArgs {
    /// Append successful translations to the history
    #[arg(long)]
    record: bool,

    /// Owner for recorded translations
    #[arg(long, env = "REMOTE_USER")]
    user: Option<String>,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List translations, most recent first
    List {
        /// Owner to list (anonymous translations when omitted)
        #[arg(long, env = "REMOTE_USER")]
        user: Option<String>,

        /// 1-based page number
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Delete one of your translations
    Delete {
        id: u64,

        /// Owner of the translation
        #[arg(long, env = "REMOTE_USER")]
        user: String,
    },
}

#[derive(Serialize)]
struct HistoryOutput<'a> {
    page: usize,
    total_pages: usize,
    total: usize,
    records: &'a [TranslationRecord],
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    if let Some(path) = &args.history {
        config.history.path = Some(path.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn open_database(config: &AppConfig) -> Result<Database> {
    let path = config.history.resolved_path();
    Database::open(&path)
        .with_context(|| format!("Failed to open history store at {}", path.display()))
}

fn gateway(config: &AppConfig) -> Result<TranslationGateway> {
    TranslationGateway::from_config(config).context("Failed to initialize translation gateway")
}

/// The given text, or everything on stdin.
fn text_or_stdin(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}

fn record_all<'a>(
    config: &AppConfig,
    record: &RecordArgs,
    payloads: impl Iterator<Item = &'a TranslationPayload>,
) -> Result<()> {
    if !record.record {
        return Ok(());
    }

    let history = open_database(config)?.history()?;
    let mut recorded = 0;
    for payload in payloads {
        match history.append(NewTranslationRecord::from_payload(record.user.clone(), payload)) {
            Ok(_) => recorded += 1,
            Err(e) => warn!("Failed to record translation: {}", e),
        }
    }
    info!("Recorded {} translation(s)", recorded);
    Ok(())
}

const fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;

    match args.command {
        Command::Translate {
            text,
            target,
            source,
            record,
        } => {
            let text = text_or_stdin(text)?;
            let outcome = gateway(&config)?
                .translate(&text, &target, Some(source.as_str()))
                .await;

            record_all(&config, &record, outcome.success().into_iter())?;
            print_json(&outcome)?;
            Ok(exit_code(outcome.is_success()))
        }

        Command::Batch {
            texts,
            file,
            target,
            source,
            record,
        } => {
            let texts = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?
                    .lines()
                    .map(ToString::to_string)
                    .collect(),
                None => texts,
            };

            let results = gateway(&config)?
                .translate_batch(&texts, &target, Some(source.as_str()))
                .await;

            record_all(&config, &record, results.iter().filter_map(Outcome::success))?;
            print_json(&results)?;
            Ok(exit_code(results.iter().all(Outcome::is_success)))
        }

        Command::Detect { text } => {
            let text = text_or_stdin(text)?;
            let outcome = gateway(&config)?.detect_language(&text).await;
            print_json(&outcome)?;
            Ok(exit_code(outcome.is_success()))
        }

        Command::Languages { display, sync } => {
            let display = display.unwrap_or_else(|| config.display_language.to_string());
            let languages = gateway(&config)?.list_supported_languages(&display).await;

            if languages.is_empty() {
                warn!("The provider returned no languages");
            } else if sync {
                let added = open_database(&config)?.catalog()?.sync(&languages)?;
                info!("Language catalog: {} new of {}", added, languages.len());
            }

            print_json(&languages)?;
            Ok(exit_code(!languages.is_empty()))
        }

        Command::History(HistoryCommand::List { user, page }) => {
            let history = open_database(&config)?.history()?;
            let page = history.page(user.as_deref(), page, config.history.per_page)?;

            print_json(&HistoryOutput {
                page: page.page,
                total_pages: page.total_pages,
                total: page.total,
                records: &page.records,
            })?;
            Ok(ExitCode::SUCCESS)
        }

        Command::History(HistoryCommand::Delete { id, user }) => {
            let history = open_database(&config)?.history()?;
            match history.delete(id, &user)? {
                DeleteOutcome::Deleted => {
                    info!("Deleted translation {}", id);
                    Ok(ExitCode::SUCCESS)
                }
                DeleteOutcome::NotFound => {
                    anyhow::bail!("Translation not found.")
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    run(args).await
}
