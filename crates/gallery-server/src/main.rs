use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use gallery_api::session::SessionStore;
use gallery_api::{AppState, AppStateInner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("GALLERY_DB_PATH").unwrap_or_else(|_| "gallery.db".into());
    let host = std::env::var("GALLERY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("GALLERY_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = gallery_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state: the store plus the in-process session table. Sessions do
    // not survive a restart.
    let state: AppState = Arc::new(AppStateInner {
        db,
        sessions: SessionStore::new(),
    });

    let app = gallery_api::app(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gallery server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
