use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use community_service::middleware::JwtAuthMiddleware;
use community_service::state::AppState;
use community_service::store::memory::MemoryStore;
use community_service::store::DocumentStore;
use community_service::{handlers, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("starting community-service");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "configuration loaded: env={}, http_port={}",
        config.app.env, config.app.http_port
    );

    // The managed document store is an external collaborator; the
    // in-process backend ships as the default behind the same trait.
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let state = web::Data::new(AppState::new(store));
    info!("store backend initialized");

    let http_addr = format!("{}:{}", config.app.host, config.app.http_port);
    let jwt_secret = config.auth.jwt_secret.clone();

    info!("listening on http://{}", http_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/health", web::get().to(|| async { "OK" }))
            .service(
                web::scope("/api/v1")
                    .route("/feed", web::get().to(handlers::feed::get_feed))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
                            .route("/posts", web::post().to(handlers::posts::create_post))
                            .route(
                                "/communities",
                                web::post().to(handlers::communities::create_community),
                            )
                            .route(
                                "/communities/{community_id}/membership",
                                web::post().to(handlers::communities::toggle_membership),
                            ),
                    ),
            )
    })
    .bind(&http_addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")
}
