use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use products_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = api::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_create_schema {
        api::db::ensure_schema(&db_pool).await.map_err(|e| {
            error!("Failed creating products table: {}", e);
            e
        })?;
    } else {
        info!("Schema bootstrap disabled; expecting the products table to exist");
    }

    // Compose shared app state
    let db_arc = Arc::new(db_pool);
    let app_state = api::AppState::new(db_arc.clone(), cfg.clone());
    let app = api::app_router(app_state);

    // Bind and serve
    let addr = cfg.server_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("products-api listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped; draining database pool");
    if let Some(pool) = Arc::into_inner(db_arc) {
        if let Err(e) = api::db::close_pool(pool).await {
            warn!("Failed to close database pool cleanly: {}", e);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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

    info!("Shutdown signal received");
}
