//! Linkshop Server
//!
//! HTTP backend for the link-in-bio shop: products, categories, social links
//! and the public profile, with admin-gated writes and hosted images.
//!
//! Uses SQLite through sqlx, or an in-memory store when `DEV_MODE` is set.

mod config;
mod error;
mod extractors;
mod handlers;
mod routes;
mod services;
mod storage;

use anyhow::{Context, Result};
use linkshop_core::ports::{MediaHost, Storage};
use linkshop_core::Catalog;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::AppConfig;
use services::{self_ping, CloudinaryHost, PlaceholderHost};
use storage::{Database, MemoryStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Linkshop Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    config.validate()?;
    config.warn_insecure_defaults();
    info!(
        "Config loaded: bind={}, dev_mode={}, static={}",
        config.bind_address,
        config.dev_mode,
        config.static_dir.display()
    );

    let (store, media) = backends(&config).await?;
    let catalog = Catalog::new(store, media);
    info!("Catalog ready on the {} backend", catalog.backend_name());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let pinger = self_ping::spawn(config.ping_url(), config.ping_interval(), shutdown_rx.clone());

    let grace = config.shutdown_grace();
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;

    let state = AppState {
        catalog,
        config: Arc::new(config),
    };
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", addr);

    let mut server_rx = shutdown_rx;
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                while !*server_rx.borrow() {
                    if server_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            joined.context("Server task failed")?.context("Server error")?;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    let _ = shutdown_tx.send(true);
    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => joined.context("Server task failed")?.context("Server error")?,
        Err(_) => {
            warn!("Requests still running after {:?}, exiting anyway", grace);
            server.abort();
        }
    }

    if let Some(pinger) = pinger {
        let _ = pinger.await;
    }

    info!("Server stopped");
    Ok(())
}

/// In-memory store and placeholder images in dev mode, SQLite and
/// Cloudinary otherwise.
async fn backends(config: &AppConfig) -> Result<(Arc<dyn Storage>, Arc<dyn MediaHost>)> {
    if config.dev_mode {
        warn!("DEV_MODE enabled: data is kept in memory and lost on restart");
        return Ok((
            Arc::new(MemoryStore::seeded()),
            Arc::new(PlaceholderHost::default()),
        ));
    }

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not set")?;
    let cloudinary_url = config
        .cloudinary_url
        .as_deref()
        .context("CLOUDINARY_URL is not set")?;

    info!("Connecting to database...");
    let db = Database::connect(database_url)
        .await
        .context("Failed to initialize database")?;
    let media = CloudinaryHost::from_url(cloudinary_url).context("Failed to configure Cloudinary")?;

    Ok((Arc::new(db), Arc::new(media)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
