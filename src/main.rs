mod commands;
mod tui;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use redbeard_browser_core::config::{BrowserConfig, browser_home_dir, load_config};
use redbeard_browser_core::{AdminClient, BrowserError, parse_fragment};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "redbeard-browser")]
#[command(about = "Terminal key browser for the redbeard Redis admin panel", long_about = None)]
struct Cli {
    /// Admin server root URL (overrides config.toml and REDBEARD_BROWSER_SERVER)
    #[arg(long, global = true)]
    server: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive key browser (default)
    Browse {
        /// Key to select on startup, as in a `#key` bookmark
        #[arg(long)]
        key: Option<String>,
    },
    /// Print the server's key list
    Keys {
        /// Only print keys containing this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
        /// Output as JSON (`{"keys": [...]}`), without colors
        #[arg(long)]
        json: bool,
    },
    /// Print one key's detail view
    Show {
        key: String,
        /// Print the server markup verbatim instead of rendered text
        #[arg(long)]
        raw: bool,
    },
    /// Manage config.toml
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the resolved configuration (file + environment + flags)
    Show,
    /// Print the config file path
    Path,
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    /// Reading or writing config.toml failed
    Config(String),
    /// The admin server could not be reached or answered unexpectedly
    Server(String),
    /// Generic fallback for other failures
    Other(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Config error: {}", msg),
            CliError::Server(msg) => write!(f, "Server error: {}", msg),
            CliError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(e: anyhow::Error) -> Self {
        CliError::Other(e.to_string())
    }
}

impl From<BrowserError> for CliError {
    fn from(e: BrowserError) -> Self {
        match e {
            BrowserError::InvalidBaseUrl { .. } => CliError::Config(e.to_string()),
            _ => CliError::Server(e.to_string()),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = real_main().await {
        eprintln!("{}", err.to_string().red());
        std::process::exit(1);
    }
}

async fn real_main() -> CliResult<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(&cli);

    let cfg = resolve_config(cli.server.as_deref()).await?;

    match cli.command.unwrap_or(Command::Browse { key: None }) {
        Command::Config { cmd } => commands::config::handle(cmd, &cfg).await,
        Command::Keys { filter, json } => {
            let client = connect(&cfg)?;
            commands::keys::list_keys(&client, filter.as_deref(), json).await
        }
        Command::Show { key, raw } => {
            let client = connect(&cfg)?;
            commands::keys::show_key(&client, &key, raw).await
        }
        Command::Browse { key } => {
            let client = connect(&cfg)?;
            let fragment = key.as_deref().and_then(parse_fragment);
            tui::run_browser(client, &cfg, fragment).await?;
            Ok(())
        }
    }
}

async fn resolve_config(server_flag: Option<&str>) -> CliResult<BrowserConfig> {
    let mut cfg = load_config()
        .await
        .map_err(|e| CliError::Config(format!("{e:#}")))?;
    cfg.apply_env_overrides();
    if let Some(server) = server_flag
        && !server.trim().is_empty()
    {
        cfg.server.base_url = server.trim().to_string();
    }
    Ok(cfg)
}

fn connect(cfg: &BrowserConfig) -> CliResult<AdminClient> {
    Ok(AdminClient::new(&cfg.server.base_url, cfg.timeout())?)
}

fn interactive_tui(cli: &Cli) -> bool {
    let tty = atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout);
    match &cli.command {
        None | Some(Command::Browse { .. }) => tty,
        _ => false,
    }
}

fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    // Default to info logs unless the user sets RUST_LOG.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs written to the terminal the TUI owns would tear the screen, so they go to a file.
    if interactive_tui(cli) {
        let log_dir = browser_home_dir().join("logs");
        let _ = std::fs::create_dir_all(&log_dir);

        let file_appender = tracing_appender::rolling::daily(&log_dir, "runtime.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(non_blocking)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_browse_without_subcommand() {
        let cli = Cli::try_parse_from(["redbeard-browser"]).expect("parse");
        assert!(cli.command.is_none());
        assert!(cli.server.is_none());
    }

    #[test]
    fn server_flag_is_global() {
        let cli = Cli::try_parse_from([
            "redbeard-browser",
            "keys",
            "--filter",
            "user:",
            "--server",
            "http://10.0.0.5:5000",
        ])
        .expect("parse");
        assert_eq!(cli.server.as_deref(), Some("http://10.0.0.5:5000"));
        match cli.command {
            Some(Command::Keys { filter, json }) => {
                assert_eq!(filter.as_deref(), Some("user:"));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn browse_accepts_bookmarked_key() {
        let cli =
            Cli::try_parse_from(["redbeard-browser", "browse", "--key", "#mykey"]).expect("parse");
        match cli.command {
            Some(Command::Browse { key }) => {
                let fragment = key.as_deref().and_then(parse_fragment);
                assert_eq!(fragment.map(|k| k.to_string()), Some("mykey".to_string()));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn base_url_errors_map_to_config_errors() {
        let err: CliError = BrowserError::InvalidBaseUrl {
            url: "ftp://x".into(),
            reason: "unsupported scheme 'ftp'".into(),
        }
        .into();
        assert!(matches!(err, CliError::Config(_)));
        let err: CliError = BrowserError::Status {
            url: "http://x/keys".into(),
            status: 500,
        }
        .into();
        assert!(err.to_string().starts_with("Server error:"));
    }
}
