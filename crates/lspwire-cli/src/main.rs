//! lspwire CLI - Command-line tooling for LSP messages.
//!
//! Commands:
//! - `inspect` - Decode one JSON-RPC message and show what it is
//! - `methods` - List the protocol method registry

#![forbid(unsafe_code)]

mod logger;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;
use serde_json::Value;

use lspwire::logging::targets;
use lspwire::{
    Direction, DispatchConfig, Dispatcher, Incoming, IncomingError, LspError, LspResult,
    MethodKind, MethodRegistry, RequestId,
};

/// lspwire - Decode and inspect Language Server Protocol messages.
#[derive(Parser)]
#[command(name = "lspwire")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Dispatch configuration file (TOML).
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a single JSON-RPC message.
    ///
    /// Decodes the message strictly, then prints its shape, method, and
    /// typed payload, or the decode error and the reply a peer would get.
    Inspect {
        /// File holding the message (default: stdin).
        file: Option<PathBuf>,

        /// Output format (text, json, yaml).
        #[arg(long, short = 'f', default_value = "text")]
        format: InspectFormat,
    },

    /// List protocol methods.
    ///
    /// Prints every method in the registry with its direction.
    Methods {
        /// Only show methods of this direction (request, notification).
        #[arg(long, short = 'd')]
        direction: Option<DirectionFilter>,

        /// Output format (table, json, yaml).
        #[arg(long, short = 'f', default_value = "table")]
        format: ListFormat,
    },
}

/// Output format for the inspect command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum InspectFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for InspectFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            _ => Err(format!("Unknown format: {s}. Expected: text, json, yaml")),
        }
    }
}

/// Output format for the methods command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum ListFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl std::str::FromStr for ListFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            _ => Err(format!("Unknown format: {s}. Expected: table, json, yaml")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DirectionFilter(Direction);

impl std::str::FromStr for DirectionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "request" | "requests" => Ok(Self(Direction::Request)),
            "notification" | "notifications" => Ok(Self(Direction::Notification)),
            _ => Err(format!(
                "Unknown direction: {s}. Expected: request, notification"
            )),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let mut logging = config.logging.clone();
    logging.level = match cli.verbose {
        0 => logging.level,
        1 => logging.level.max(LevelFilter::Debug),
        _ => LevelFilter::Trace,
    };
    logger::StderrLogger::try_init(&logging);

    let result = match cli.command {
        Commands::Inspect { file, format } => cmd_inspect(&config, file.as_deref(), format),
        Commands::Methods { direction, format } => {
            cmd_methods(direction.map(|d| d.0), format).map(|()| true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

/// Load dispatch configuration from a TOML file, or from the environment.
fn load_config(path: Option<&Path>) -> LspResult<DispatchConfig> {
    let Some(path) = path else {
        return Ok(DispatchConfig::from_env());
    };
    let content = std::fs::read_to_string(path).map_err(|e| {
        LspError::internal_error(format!("Failed to read config {}: {e}", path.display()))
    })?;
    let config: DispatchConfig = toml::from_str(&content).map_err(|e| {
        LspError::internal_error(format!("Failed to parse config {}: {e}", path.display()))
    })?;
    log::debug!(target: targets::LSPWIRE, "loaded config from {}", path.display());
    Ok(config)
}

// ============================================================================
// inspect
// ============================================================================

/// What `inspect` found out about one message.
#[derive(Debug, Serialize)]
struct InspectReport {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<RequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorReport {
    code: i32,
    name: &'static str,
    message: String,
}

impl InspectReport {
    fn empty(valid: bool) -> Self {
        Self {
            valid,
            shape: None,
            method: None,
            kind: None,
            direction: None,
            id: None,
            payload: None,
            error: None,
            reply: None,
            note: None,
        }
    }

    fn with_kind(mut self, kind: MethodKind) -> Self {
        self.method = Some(kind.as_str().to_string());
        self.kind = Some(format!("{kind:?}"));
        self.direction = kind.direction();
        self
    }

    fn from_incoming(incoming: &Incoming) -> LspResult<Self> {
        let report = match incoming {
            Incoming::Request { id, params } => {
                let mut report = Self::empty(true).with_kind(params.kind());
                report.shape = Some("request".to_string());
                report.id = Some(id.clone());
                report.payload = Some(serde_json::to_value(params)?);
                report
            }
            Incoming::Notification { params } => {
                let mut report = Self::empty(true).with_kind(params.kind());
                report.shape = Some("notification".to_string());
                report.payload = Some(serde_json::to_value(params)?);
                report
            }
            Incoming::Response(response) => {
                let mut report = Self::empty(true);
                report.shape = Some("response".to_string());
                report.id = response.id.clone();
                report.payload = Some(serde_json::to_value(response)?);
                report.note = Some(
                    "response results are typed only against a pending request".to_string(),
                );
                report
            }
            Incoming::Ignored { method } => {
                let mut report = Self::empty(true);
                report.shape = Some("notification".to_string());
                report.method = Some(method.clone());
                report.kind = Some(format!("{:?}", MethodKind::Unknown));
                report.note = Some("unknown notification, ignored".to_string());
                report
            }
        };
        Ok(report)
    }

    fn from_error(err: &IncomingError) -> LspResult<Self> {
        let mut report = Self::empty(false);
        report.shape = err.shape.map(|s| s.as_str().to_string());
        report.id = err.reply_to.clone();
        let code = err.code();
        report.error = Some(ErrorReport {
            code: code.code(),
            name: code.name(),
            message: err.error.to_string(),
        });
        report.reply = err.to_response().map(serde_json::to_value).transpose()?;
        Ok(report)
    }

    fn render_text(&self) -> LspResult<String> {
        let mut out = String::new();
        let status = if self.valid { "valid" } else { "invalid" };
        out.push_str(&format!("status:    {status}\n"));
        let rows = [
            ("shape", self.shape.clone()),
            ("method", self.method.clone()),
            ("kind", self.kind.clone()),
            ("direction", self.direction.map(|d| d.to_string())),
            ("id", self.id.as_ref().map(ToString::to_string)),
            ("note", self.note.clone()),
        ];
        for (label, value) in rows {
            if let Some(value) = value {
                out.push_str(&format!("{:<10} {value}\n", format!("{label}:")));
            }
        }
        if let Some(error) = &self.error {
            out.push_str(&format!(
                "error:     [{}] {} {}\n",
                error.code, error.name, error.message
            ));
        }
        if let Some(payload) = &self.payload {
            out.push_str("payload:\n");
            out.push_str(&serde_json::to_string_pretty(payload)?);
            out.push('\n');
        }
        if let Some(reply) = &self.reply {
            out.push_str("reply:\n");
            out.push_str(&serde_json::to_string(reply)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Inspect command: decode one message and report on it.
///
/// Returns whether the message was valid.
fn cmd_inspect(config: &DispatchConfig, file: Option<&Path>, format: InspectFormat) -> LspResult<bool> {
    let bytes = read_input(file)?;
    let dispatcher = Dispatcher::new(config.clone());

    let report = match dispatcher.decode(&bytes) {
        Ok(incoming) => InspectReport::from_incoming(&incoming)?,
        Err(err) => InspectReport::from_error(&err)?,
    };

    match format {
        InspectFormat::Text => print!("{}", report.render_text()?),
        InspectFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        InspectFormat::Yaml => println!(
            "{}",
            serde_yaml::to_string(&report)
                .map_err(|e| LspError::internal_error(format!("Failed to render YAML: {e}")))?
        ),
    }

    Ok(report.valid)
}

fn read_input(file: Option<&Path>) -> LspResult<Vec<u8>> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read(path).map_err(|e| {
            LspError::internal_error(format!("Failed to read {}: {e}", path.display()))
        }),
        _ => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|e| LspError::internal_error(format!("Failed to read stdin: {e}")))?;
            Ok(bytes)
        }
    }
}

// ============================================================================
// methods
// ============================================================================

#[derive(Debug, Serialize)]
struct MethodRow {
    method: &'static str,
    direction: Direction,
    kind: String,
}

/// Methods command: list the registry.
fn cmd_methods(direction: Option<Direction>, format: ListFormat) -> LspResult<()> {
    let rows: Vec<MethodRow> = MethodRegistry::global()
        .entries()
        .iter()
        .filter(|entry| direction.is_none_or(|d| entry.direction == d))
        .map(|entry| MethodRow {
            method: entry.name,
            direction: entry.direction,
            kind: format!("{:?}", entry.kind),
        })
        .collect();

    match format {
        ListFormat::Table => {
            let width = rows.iter().map(|r| r.method.len()).max().unwrap_or(6);
            println!("{:<width$}  {:<12}  KIND", "METHOD", "DIRECTION");
            for row in &rows {
                println!(
                    "{:<width$}  {:<12}  {}",
                    row.method,
                    row.direction.as_str(),
                    row.kind
                );
            }
            println!();
            println!("{} methods", rows.len());
        }
        ListFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        ListFormat::Yaml => {
            println!(
                "{}",
                serde_yaml::to_string(&rows).map_err(|e| LspError::internal_error(format!(
                    "Failed to render YAML: {e}"
                )))?
            );
        }
    }

    Ok(())
}
