//! # Snippetbox Binary
//!
//! The entry point: resolves configuration, wires the SQLite and Argon2
//! plugins into the core services, and serves the router until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sb_api::AppState;
use sb_auth_simple::Argon2Hasher;
use sb_config::{AppConfig, Overrides};
use sb_core::{SnippetService, UserService};
use sb_db_sqlite::SqliteRepo;
use secrecy::ExposeSecret;
use tower_sessions::cookie::SameSite;
use tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How often expired session rows are swept from the store.
const SESSION_SWEEP_INTERVAL: tokio::time::Duration = tokio::time::Duration::from_secs(60);

#[derive(Debug, Parser)]
#[command(name = "snippetbox", version, about = "Paste and share text snippets")]
struct Cli {
    /// HTTP network address, e.g. 127.0.0.1:4000
    #[arg(long)]
    addr: Option<String>,

    /// SQLite data source name, e.g. sqlite://snippetbox.db
    #[arg(long)]
    dsn: Option<String>,

    /// Human-readable debug logging
    #[arg(long)]
    debug: bool,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Self {
            addr: cli.addr,
            dsn: cli.dsn,
            debug: cli.debug.then_some(true),
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());
    let registry = tracing_subscriber::registry().with(filter);

    if debug {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::load(&Cli::parse().into()).context("loading configuration")?;
    init_tracing(cfg.debug);

    if let Err(err) = run(cfg).await {
        tracing::error!(error = ?err, "fatal error");
        return Err(err);
    }
    Ok(())
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // 1. Storage
    let repo = SqliteRepo::connect(cfg.dsn.expose_secret())
        .await
        .context("opening database")?;
    repo.migrate().await.context("applying migrations")?;
    let repo = Arc::new(repo);

    // 2. Sessions, kept in the same database
    let session_store = SqliteStore::new(repo.pool().clone());
    session_store
        .migrate()
        .await
        .context("creating session table")?;
    let sweeper = tokio::spawn(
        session_store
            .clone()
            .continuously_delete_expired(SESSION_SWEEP_INTERVAL),
    );

    let lifetime = i64::try_from(cfg.session_lifetime_hours).context("session lifetime")?;
    // TLS terminates upstream when it is used at all, so the cookie is not
    // marked Secure here.
    let sessions = SessionManagerLayer::new(session_store)
        .with_name("session")
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(lifetime)));

    // 3. Services
    let state = AppState {
        snippets: SnippetService::new(repo.clone()),
        users: UserService::new(repo, Arc::new(Argon2Hasher::new())),
    };

    let addr = cfg.socket_addr()?;
    let app = sb_api::router(state, sessions, cfg.request_timeout());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(%addr, "starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    sweeper.abort();
    tracing::info!("server stopped");
    Ok(())
}
