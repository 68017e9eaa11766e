use super::{MAX_UPLOAD_SIZE_BYTES, SharedRemover, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::Level;

pub fn create_app(remover: SharedRemover) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/remove", post(handlers::remove_background))
        // Apply a layer to limit the maximum size of request bodies
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE_BYTES))
        // Add tracing for HTTP requests and responses
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
        .with_state(remover)
}
