use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::storage::Storage;

pub mod routes;

/// Server state
pub struct AppState {
    pub storage: Arc<Storage>,
}

/// JSON API over the repository
pub fn router(storage: Arc<Storage>) -> Router {
    let state = Arc::new(AppState { storage });

    Router::new()
        .route("/stats", get(routes::get_stats))
        .route("/projects", get(routes::list_projects).post(routes::create_project))
        .route(
            "/projects/{id}",
            get(routes::get_project)
                .patch(routes::update_project)
                .delete(routes::delete_project),
        )
        .route("/items", get(routes::list_items).post(routes::create_item))
        .route(
            "/items/{id}",
            get(routes::get_item)
                .patch(routes::update_item)
                .delete(routes::delete_item),
        )
        .route("/items/{id}/done", post(routes::mark_done))
        .route("/items/{id}/pin", post(routes::pin_item))
        .route("/items/{id}/move", post(routes::move_item))
        .route("/search", get(routes::search))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, storage: Arc<Storage>) -> anyhow::Result<()> {
    let init = Arc::clone(&storage);
    tokio::task::spawn_blocking(move || init.initialize()).await??;

    let app = router(storage);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
