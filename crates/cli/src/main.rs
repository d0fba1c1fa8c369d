use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use fieldhint_engine::{SuggestionStore, store_from_config};
use fieldhint_types::FieldType;
use fieldhint_util::{FieldhintConfig, config_file_path, expand_tilde, redact_sensitive};
use tracing::{debug, info};

const LOG_PATH_ENV: &str = "FIELDHINT_LOG_PATH";
const LOG_FILE_NAME: &str = "fieldhint.log";

#[derive(Debug, Parser)]
#[command(name = "fieldhint", version, about = "Suggestion-backed form inputs")]
struct Cli {
    /// Use the local JSON store instead of the suggestion service.
    #[arg(long, global = true)]
    offline: bool,

    /// Configuration file (defaults to the platform config directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive shipment form (default).
    Tui,
    /// Print suggestions matching QUERY as JSON.
    Search {
        #[arg(long = "field-type", value_name = "T")]
        field_type: String,
        query: String,
    },
    /// Record VALUE as a suggestion for the field type.
    Save {
        #[arg(long = "field-type", value_name = "T")]
        field_type: String,
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);
    init_tracing(matches!(command, Command::Tui));

    let mut config = match cli.config.as_deref() {
        Some(path) => FieldhintConfig::load_from(&expand_tilde(path))?,
        None => FieldhintConfig::load()?,
    };
    if cli.offline {
        config.store.offline = true;
    }
    let store = store_from_config(&config)?;

    match command {
        Command::Tui => {
            let label = store_label(&config);
            fieldhint_tui::run(config.widgets, store, label).await
        }
        Command::Search { field_type, query } => {
            let rows = store.search(&FieldType::new(field_type), &query).await?;
            debug!(count = rows.len(), "search finished");
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        }
        Command::Save { field_type, value } => {
            let value = value.trim();
            if value.is_empty() {
                bail!("nothing to save: value is blank");
            }
            let field_type = FieldType::new(field_type);
            store
                .save(&field_type, value)
                .await
                .with_context(|| format!("failed to save suggestion for '{field_type}'"))?;
            info!(field_type = %field_type, "suggestion saved");
            Ok(())
        }
    }
}

/// `RUST_LOG` filter (default `info`). The form owns the terminal, so its logs
/// go to a file; the one-shot commands log to stderr.
fn init_tracing(to_file: bool) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if !to_file {
        let _ = builder.with_writer(std::io::stderr).try_init();
        return;
    }
    match open_log_file(log_path()) {
        Ok(file) => {
            let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
        }
        Err(_) => {
            let _ = builder.with_writer(std::io::sink).try_init();
        }
    }
}

fn log_path() -> PathBuf {
    config_file_path(LOG_PATH_ENV, LOG_FILE_NAME)
}

fn open_log_file(path: PathBuf) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn store_label(config: &FieldhintConfig) -> String {
    if config.store.offline {
        match &config.store.path {
            Some(path) => format!("offline ({})", path.display()),
            None => "offline".to_string(),
        }
    } else if config.api.is_disabled() {
        "disabled".to_string()
    } else {
        redact_sensitive(&config.api.base_url)
    }
}
