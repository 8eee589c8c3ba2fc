//! Axum router assembly.

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use homepanel_app::ports::StateStore;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves `/health` and the `/data` documents. When `static_dir` is given,
/// every other path is looked up in it. Includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level.
pub fn build<S: StateStore + 'static>(state: AppState<S>, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes());
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };
    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
