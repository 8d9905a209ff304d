//! student-verify - command-line front end for student ID verification.
//!
//! # Startup Flow
//!
//! 1. Initialize logging (RUST_LOG, defaults to "info")
//! 2. Load configuration from environment variables, apply CLI overrides
//! 3. Open client storage
//! 4. Run the requested command

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use student_id_verifier::storage::{API_KEYS_KEY, AUTH_TOKEN_KEY};
use student_id_verifier::{
    ApiKeyRecord, ClientStorage, Config, FileStorage, Notification, Presenter, Route,
    UploadedFile, VerificationClient, VerificationFlow,
};

#[derive(Parser)]
#[command(
    name = "student-verify",
    about = "Verify a student ID and get an API key",
    version
)]
struct Cli {
    /// Verification service base URL (overrides $API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Client storage file (overrides $STORAGE_PATH)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the verification screen for the current session
    Show,
    /// Upload a student ID image (JPG or PNG) and issue an API key
    Verify {
        /// Path to the image
        image: PathBuf,
    },
    /// List API keys issued on this machine
    Keys,
    /// Store an auth token obtained from the login service
    Login {
        #[arg(long, env = "AUTH_TOKEN")]
        token: String,
    },
    /// Remove the stored auth token
    Logout,
}

/// Presenter that writes notifications and navigation to the terminal.
struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::Error(msg) => eprintln!("error: {}", msg),
            Notification::Success(msg) => println!("{}", msg),
        }
    }

    fn navigate(&mut self, route: Route) {
        println!("-> {}", route.path());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging to stderr so stdout stays clean for command output.
    // Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration, then let command-line flags win over the environment
    let mut config = Config::from_env().context("load configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(path) = cli.storage {
        config.storage_path = Some(path);
    }
    tracing::debug!("Configuration loaded");

    // Open client storage (created on first write)
    let storage_path = config
        .resolve_storage_path()
        .context("could not determine platform data directory")?;
    let mut storage = FileStorage::open(&storage_path)
        .with_context(|| format!("open client storage {}", storage_path.display()))?;

    match cli.command {
        Commands::Show => {
            let client = VerificationClient::new(&config)?;
            let flow = VerificationFlow::mount(storage, client, TerminalPresenter, &config.key_name);
            print!("{}", flow.view());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Verify { image } => cmd_verify(&config, storage, &image).await,

        Commands::Keys => {
            let keys: Vec<ApiKeyRecord> = storage.get_json_list(API_KEYS_KEY)?;
            if keys.is_empty() {
                println!("No API keys issued yet.");
            }
            for key in keys {
                println!(
                    "{}  {}  {}  {}  requests={}",
                    key.id,
                    key.masked_key(),
                    key.name,
                    key.created.to_rfc3339(),
                    key.requests
                );
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Login { token } => {
            storage.set(AUTH_TOKEN_KEY, token.trim())?;
            println!("Auth token saved to {}", storage.path().display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Logout => {
            storage.remove(AUTH_TOKEN_KEY)?;
            println!("Auth token removed");
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn cmd_verify(
    config: &Config,
    storage: FileStorage,
    image: &std::path::Path,
) -> anyhow::Result<ExitCode> {
    let client = VerificationClient::new(config)?;
    tracing::info!("Verifying against {}", client.endpoint());
    let mut flow = VerificationFlow::mount(storage, client, TerminalPresenter, &config.key_name);

    // Without a token only the auth-required screen is shown
    if !flow.is_logged_in() {
        print!("{}", flow.view());
        return Ok(ExitCode::FAILURE);
    }

    let file = UploadedFile::from_path(image)
        .with_context(|| format!("read {}", image.display()))?;
    // Rejection was already reported through the presenter
    if flow.select_file(file).is_err() {
        return Ok(ExitCode::FAILURE);
    }

    print!("{}", flow.view());

    match flow.submit().await {
        Ok(record) => {
            println!("API key: {}", record.key);
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_are_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "student-verify",
            "verify",
            "card.png",
            "--api-url",
            "http://localhost:9000",
            "--storage",
            "/tmp/store.json",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cli.storage, Some(PathBuf::from("/tmp/store.json")));
        assert!(matches!(cli.command, Commands::Verify { ref image } if image == &PathBuf::from("card.png")));
    }

    #[test]
    fn overrides_are_accepted_before_the_subcommand() {
        let cli = Cli::try_parse_from(["student-verify", "--api-url", "http://x", "keys"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
        assert!(matches!(cli.command, Commands::Keys));
    }
}
