//! docvault - command-line client for the docvault document service.
//!
//! Log in with a one-time password, then upload, search, preview and
//! download documents from the terminal.

mod commands;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docvault_core::auth::{FileTokenStore, KeyringTokenStore, TokenStore};
use docvault_core::config::APP_NAME;
use docvault_core::{ApiClient, Config, SessionManager};

use commands::Context as CommandContext;

/// docvault - document upload and search
#[derive(Parser)]
#[command(name = "docvault", version, about)]
struct Cli {
    /// Backend base URL (overrides API_BASE_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Where the session token is kept
    #[arg(long, value_enum, default_value_t = StoreKind::File, global = true)]
    store: StoreKind,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StoreKind {
    /// OS keychain
    Keyring,
    /// Plain file in the user data directory
    File,
}

#[derive(Subcommand)]
enum Commands {
    /// Request an OTP for a mobile number and log in with it
    Login {
        /// 10-digit mobile number (defaults to the last one used)
        mobile_number: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show whether a session is active and who it belongs to
    Status,

    /// List document tags matching a term
    Tags {
        /// Search term (empty lists all tags)
        #[arg(default_value = "")]
        term: String,
    },

    /// Upload a document with its metadata
    Upload {
        /// File to upload (image or PDF)
        file: PathBuf,

        /// Major head (Personal or Professional)
        #[arg(long)]
        major: String,

        /// Minor head (a name for Personal, a department for Professional)
        #[arg(long)]
        minor: String,

        /// Document date, DD-MM-YYYY (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-text remarks
        #[arg(long, default_value = "")]
        remarks: String,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Search uploaded documents
    Search {
        #[arg(long, default_value = "")]
        major: String,

        #[arg(long, default_value = "")]
        minor: String,

        /// From date, DD-MM-YYYY (defaults to today)
        #[arg(long)]
        from: Option<String>,

        /// To date, DD-MM-YYYY (defaults to today)
        #[arg(long)]
        to: Option<String>,

        /// Comma separated tags
        #[arg(long, default_value = "")]
        tags: String,

        /// Index of the first result
        #[arg(long, default_value_t = 0)]
        start: u32,

        /// Page size
        #[arg(long, default_value_t = docvault_core::models::DEFAULT_PAGE_LENGTH)]
        length: u32,
    },

    /// Tell how a file URL can be previewed
    Preview {
        url: String,
    },

    /// Download a document file
    Download {
        url: String,

        /// Local file name (defaults to the last URL segment)
        #[arg(long)]
        name: Option<String>,

        /// Target directory (defaults to the Downloads folder)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let dir = dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .context("Log file path has no file name")?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    Ok(guard)
}

fn build_store(kind: StoreKind) -> Result<Box<dyn TokenStore>> {
    Ok(match kind {
        StoreKind::Keyring => Box::new(KeyringTokenStore::new()),
        StoreKind::File => Box::new(
            FileTokenStore::in_data_dir(APP_NAME).context("Failed to locate token storage")?,
        ),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_ref())?;

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });
    let base_url = config.resolve_base_url(cli.api_url.as_deref());
    info!(base_url = %base_url, "docvault starting");

    let api = ApiClient::new(base_url).context("Failed to build HTTP client")?;

    let mut session = SessionManager::new(build_store(cli.store)?);
    session.restore();

    let mut ctx = CommandContext {
        api,
        session,
        config,
        json: cli.json,
    };

    match cli.command {
        Commands::Login { mobile_number } => commands::login(&mut ctx, mobile_number).await,
        Commands::Logout => commands::logout(&mut ctx),
        Commands::Status => commands::status(&ctx),
        Commands::Tags { term } => commands::tags(&ctx, &term).await,
        Commands::Upload {
            file,
            major,
            minor,
            date,
            remarks,
            tags,
        } => {
            let args = commands::UploadArgs {
                file,
                major,
                minor,
                date,
                remarks,
                tags,
            };
            commands::upload(&ctx, args).await
        }
        Commands::Search {
            major,
            minor,
            from,
            to,
            tags,
            start,
            length,
        } => {
            let args = commands::SearchArgs {
                major,
                minor,
                from,
                to,
                tags,
                start,
                length,
            };
            commands::search(&ctx, args).await
        }
        Commands::Preview { url } => commands::preview(&ctx, &url),
        Commands::Download { url, name, dir } => {
            commands::download(&ctx, &url, name.as_deref(), dir).await
        }
    }
}
