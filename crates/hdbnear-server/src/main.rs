mod api;
mod middleware;

use std::{net::SocketAddr, sync::Arc};

use hdbnear_search::SearchEngine;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = hdbnear_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.onemap_credentials.is_none() && config.onemap_token.is_none() {
        tracing::warn!(
            "neither ONEMAP_EMAIL/ONEMAP_PASSWORD nor ONEMAP_TOKEN is set; every search will return the fallback center"
        );
    }

    let engine = Arc::new(SearchEngine::from_config(&config)?);
    let app = build_app(AppState { engine }, default_rate_limit_state());

    tracing::info!(bind_addr = %config.bind_addr, env = %config.env, "starting hdbnear server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
