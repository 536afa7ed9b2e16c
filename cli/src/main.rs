use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

use canvas::codec::{CodecError, from_json_str, to_json};
use clap::{Args, Parser, Subcommand};
use designer::config::{ConfigError, DesignerConfig};
use designer::error::ErrorCode;
use designer::services::http::HttpBackend;
use designer::services::{DrawingFolders, ServiceError, SpreadsheetMetadata};
use designer::session::{DesignSession, LoadOutcome, Services, SessionError};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Service(#[from] ServiceError),
    #[error("{0}")]
    Codec(#[from] CodecError),
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("could not read {path}: {source}")]
    ReadInput { path: String, source: io::Error },
    #[error("no saved layout for output {0:?}")]
    NothingSaved(String),
}

impl CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Codec(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::InvalidJson(_) => "E_PAYLOAD_JSON",
            Self::ReadInput { .. } => "E_READ_INPUT",
            Self::NothingSaved(_) => "E_NOTHING_SAVED",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "slide-cli", about = "Slide layout payload and service CLI")]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long, env = "SLIDE_API_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a payload tolerantly and print the normalized form.
    Normalize {
        #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
    },
    /// List the sheets and columns of a workspace spreadsheet.
    Sheets {
        #[arg(long)]
        workspace: String,
    },
    /// List the drawing folders of a workspace.
    Folders {
        #[arg(long)]
        workspace: String,
    },
    Settings(SettingsCommand),
    /// Generate a presentation from the layout saved for an output.
    Generate {
        #[arg(long)]
        output_id: String,
    },
}

#[derive(Args, Debug)]
struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum SettingsSubcommand {
    /// Normalize a payload and store it under an output id.
    Save {
        #[arg(long)]
        output_id: String,
        #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
    },
    /// Print the normalized payload stored under an output id.
    Load {
        #[arg(long)]
        output_id: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            eprintln!("ignoring .env: {error}");
        }
    }
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        tracing::error!(code = error.error_code(), error = %error, "command failed");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { base_url, command } = cli;
    match command {
        Command::Normalize { input } => print_json(&normalize(&read_input(&input)?)?),
        Command::Sheets { workspace } => {
            let (_, backend) = connect(base_url.as_deref())?;
            let sheets = backend.sheets(&workspace).await?;
            print_json(&serde_json::to_value(sheets)?)
        }
        Command::Folders { workspace } => {
            let (_, backend) = connect(base_url.as_deref())?;
            let folders = backend.folders(&workspace).await?;
            print_json(&serde_json::to_value(folders)?)
        }
        Command::Settings(settings) => run_settings(base_url.as_deref(), settings).await,
        Command::Generate { output_id } => {
            let mut session = open_session(base_url.as_deref(), &output_id)?;
            load_saved(&mut session).await?;
            let artifact = session.generate().await?;
            print_json(&serde_json::to_value(artifact)?)
        }
    }
}

async fn run_settings(base_url: Option<&str>, settings: SettingsCommand) -> Result<(), CliError> {
    match settings.command {
        SettingsSubcommand::Save { output_id, input } => {
            let doc = from_json_str(&read_input(&input)?)?;
            let mut session = open_session(base_url, &output_id)?;
            session.engine_mut().load_document(doc);
            session.save().await?;
            print_json(&to_json(session.document())?)
        }
        SettingsSubcommand::Load { output_id } => {
            let mut session = open_session(base_url, &output_id)?;
            load_saved(&mut session).await?;
            print_json(&to_json(session.document())?)
        }
    }
}

fn connect(base_url: Option<&str>) -> Result<(DesignerConfig, Arc<HttpBackend>), CliError> {
    let config = resolve_config(DesignerConfig::from_env()?, base_url)?;
    let backend = HttpBackend::new(&config)?;
    Ok((config, Arc::new(backend)))
}

/// A session for one output. Output-scoped commands never touch workspace
/// metadata, so the workspace id stays empty.
fn open_session(base_url: Option<&str>, output_id: &str) -> Result<DesignSession, CliError> {
    let (config, backend) = connect(base_url)?;
    Ok(DesignSession::new(String::new(), output_id, Services::http(backend), config.canvas))
}

async fn load_saved(session: &mut DesignSession) -> Result<(), CliError> {
    match session.load().await? {
        LoadOutcome::Loaded(_) => Ok(()),
        LoadOutcome::NothingSaved => Err(CliError::NothingSaved(session.output_id().to_owned())),
    }
}

/// Apply a `--base-url` override on top of environment config.
fn resolve_config(config: DesignerConfig, base_url: Option<&str>) -> Result<DesignerConfig, ConfigError> {
    match base_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => config.with_base_url(url),
        None => Ok(config),
    }
}

/// Decode payload text and re-encode it in canonical form.
fn normalize(raw: &str) -> Result<Value, CliError> {
    Ok(to_json(&from_json_str(raw)?)?)
}

fn read_input(path: &str) -> Result<String, CliError> {
    let read_error = |source| CliError::ReadInput { path: path.to_owned(), source };
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(read_error)?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(read_error)
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
