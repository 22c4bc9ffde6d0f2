use std::future::IntoFuture;
use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use store::{FileStore, KvStore};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load bind address and data file path from configs or env vars, with
/// sensible fallbacks
fn load_settings() -> anyhow::Result<(SocketAddr, String)> {
    let (host, port, data_file) = match configs::load_default() {
        Ok(mut cfg) => {
            cfg.normalize_and_validate()?;
            (cfg.server.host, cfg.server.port, cfg.storage.data_file)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(2712);
            let data_file = env::var("DATA_FILE").unwrap_or_else(|_| "data/data.json".to_string());
            (host, port, data_file)
        }
    };
    Ok((format!("{}:{}", host, port).parse()?, data_file))
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "cannot install SIGTERM handler, falling back to ctrl-c only");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("received interrupt signal"),
            _ = sigterm.recv() => info!("received termination signal"),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("received interrupt signal");
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let (addr, data_file) = load_settings()?;
    common::env::ensure_data_dir(&data_file).await?;

    // The cache must be authoritative before the listener accepts its first
    // connection, so the initial load is awaited here.
    let file_store = Arc::new(FileStore::new(data_file.as_str()));
    let kv = KvStore::open(file_store).await;

    let app: Router = routes::build_router(kv, build_cors());

    info!(%addr, data_file = %data_file, "starting kv server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::select! {
        res = axum::serve(listener, app).into_future() => { res?; }
        _ = shutdown_signal() => {
            // immediate exit: in-flight saves are dropped, mutations not yet
            // persisted at this point are lost
            info!("exiting");
        }
    }
    Ok(())
}
