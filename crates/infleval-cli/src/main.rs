mod auth;
mod briefs;
mod influencers;
mod report;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use infleval_client::{ApiClient, ApiError, Credential, CredentialStore, Session};

use crate::briefs::BriefCommands;
use crate::influencers::InfluencerCommands;
use crate::report::ReportCommands;

#[derive(Debug, Parser)]
#[command(name = "infleval")]
#[command(about = "Influencer evaluation dashboard: briefs, influencers, and scored reports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and remember the session credential
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "INFLEVAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "INFLEVAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session credential
    Logout,
    /// Create and list campaign briefs
    Brief {
        #[command(subcommand)]
        command: BriefCommands,
    },
    /// Add and list influencer handles
    Influencers {
        #[command(subcommand)]
        command: InfluencerCommands,
    },
    /// Show or export a brief's evaluation report
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Check that the backend is up
    Health,
}

/// Shared handles every command runs against.
pub(crate) struct App {
    pub(crate) config: infleval_core::AppConfig,
    pub(crate) client: ApiClient,
    pub(crate) store: CredentialStore,
}

impl App {
    fn session(&self) -> &Arc<Session> {
        self.client.session()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` is loaded before parsing so clap's `env` fallbacks see it too.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = infleval_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("infleval: run `infleval --help` for available commands");
        return Ok(());
    };

    let store = CredentialStore::new(config.credentials_path.clone());
    let session = Arc::new(match store.load()? {
        Some(credential) => Session::with_credential(credential),
        None => Session::new(),
    });
    let mut session_events = session.subscribe();

    let client = ApiClient::from_config(Arc::clone(&session), &config)
        .map_err(|e| anyhow::anyhow!("failed to build API client: {e}"))?;
    tracing::debug!(env = %config.env, base_url = %client.base_url(), "client ready");

    let app = App {
        config,
        client,
        store,
    };

    let result = run(&app, command).await;
    forget_invalidated_credential(&app.store, &mut session_events);
    result
}

async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => auth::run_login(app, &email, &password).await,
        Commands::Signup { email, password } => auth::run_signup(app, &email, &password).await,
        Commands::Logout => auth::run_logout(app),
        Commands::Brief { command } => briefs::run(app, command).await,
        Commands::Influencers { command } => influencers::run(app, command).await,
        Commands::Report { command } => report::run(app, command).await,
        Commands::Health => run_health(&app.client).await,
    }
}

async fn run_health(client: &ApiClient) -> anyhow::Result<()> {
    let health = client
        .health()
        .await
        .map_err(|e| api_failure(&e, "Backend unreachable"))?;
    println!(
        "{} {} (version {}, commit {})",
        health.service.as_deref().unwrap_or("backend"),
        if health.ok { "ok" } else { "degraded" },
        health.version.as_deref().unwrap_or("\u{2014}"),
        health.commit.as_deref().unwrap_or("\u{2014}"),
    );
    if let Some(uptime) = health.uptime_seconds {
        println!("uptime: {uptime:.0}s");
    }
    Ok(())
}

/// Removes the stored credential once the session has been invalidated by a
/// `401`, so the next run starts logged out.
fn forget_invalidated_credential(
    store: &CredentialStore,
    events: &mut watch::Receiver<Option<Credential>>,
) {
    if !events.has_changed().unwrap_or(false) || events.borrow_and_update().is_some() {
        return;
    }
    match store.clear() {
        Ok(true) => eprintln!("Session expired. Run `infleval login` to continue."),
        Ok(false) => {}
        Err(err) => tracing::error!(
            path = %store.path().display(),
            error = %err,
            "failed to remove stored credential"
        ),
    }
}

/// Turns an API error into the message a user sees: the backend's `detail`,
/// then its `message`, then `fallback`.
pub(crate) fn api_failure(err: &ApiError, fallback: &str) -> anyhow::Error {
    if matches!(err, ApiError::NotAuthenticated) {
        return anyhow::anyhow!("Not logged in. Run `infleval login` first.");
    }
    tracing::debug!(error = %err, "request failed");
    anyhow::anyhow!("{}", err.user_message(fallback))
}
