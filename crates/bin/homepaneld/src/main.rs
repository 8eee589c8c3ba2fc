//! # homepaneld: homepanel resource server
//!
//! Composition root that wires the file-backed store into the axum router
//! and serves it.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialise `tracing`
//! - Construct the [`JsonDirectory`] store over the data directory
//! - Build the axum router, optionally serving the panel assets
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! Wiring only, no domain logic belongs here.

mod config;

use homepanel_adapter_http_axum::router;
use homepanel_adapter_http_axum::state::AppState;
use homepanel_adapter_http_axum::storage::JsonDirectory;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let store = JsonDirectory::new(&config.storage.data_dir);
    let static_dir = config.storage.static_dir.as_deref().filter(|dir| {
        let exists = dir.is_dir();
        if !exists {
            tracing::warn!(path = %dir.display(), "static directory not found, serving documents only");
        }
        exists
    });
    let app = router::build(AppState::new(store), static_dir);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        data_dir = %config.storage.data_dir.display(),
        "homepaneld listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("homepaneld stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::warn!("signal received, starting graceful shutdown");
}
