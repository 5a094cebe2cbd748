use std::sync::Arc;

use axum::Server;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use axum_task_user_service::{config::Config, route::create_router, AppState};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,axum=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

// Entry point of the application
#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Both stores start empty; nothing outlives the process
    let app_state = Arc::new(AppState::new(&config));
    let app = create_router(app_state, &config);

    let server = match Server::try_bind(&config.addr) {
        Ok(server) => server,
        Err(err) => {
            tracing::error!(%err, addr = %config.addr, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %config.addr, services = %config.services, "server started");

    if let Err(err) = server
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%err, "server error");
        std::process::exit(1);
    }
}
