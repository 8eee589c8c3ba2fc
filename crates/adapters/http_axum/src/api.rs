//! JSON handlers for component state documents.

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use homepanel_app::ports::StateStore;
use homepanel_domain::error::{HomePanelError, NotFoundError};
use homepanel_domain::name::ComponentName;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/data` routes.
pub fn routes<S: StateStore + 'static>() -> Router<AppState<S>> {
    Router::new().route("/data/{file}", get(read_state::<S>).put(write_state::<S>))
}

/// Possible responses from the read endpoint.
pub enum ReadResponse {
    Ok(Json<serde_json::Value>),
}

impl IntoResponse for ReadResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the write endpoint.
pub enum WriteResponse {
    NoContent,
}

impl IntoResponse for WriteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Resolve `{name}.json` into a component name.
fn component_name(file: &str) -> Result<ComponentName, ApiError> {
    let stem = file.strip_suffix(".json").ok_or_else(|| {
        HomePanelError::from(NotFoundError {
            resource: "resource",
            name: file.to_string(),
        })
    })?;
    ComponentName::new(stem).map_err(|err| HomePanelError::from(err).into())
}

/// `GET /data/{name}.json`
pub async fn read_state<S: StateStore + 'static>(
    State(state): State<AppState<S>>,
    Path(file): Path<String>,
) -> Result<ReadResponse, ApiError> {
    let name = component_name(&file)?;
    let document = state.store.fetch(&name).await?;
    Ok(ReadResponse::Ok(Json(document)))
}

/// `PUT /data/{name}.json`
///
/// The body is parsed as JSON regardless of its declared content type and
/// stored as is.
pub async fn write_state<S: StateStore + 'static>(
    State(state): State<AppState<S>>,
    Path(file): Path<String>,
    body: Bytes,
) -> Result<WriteResponse, ApiError> {
    let name = component_name(&file)?;
    let document: serde_json::Value =
        serde_json::from_slice(&body).map_err(ApiError::InvalidJson)?;
    state.store.store(&name, document).await?;
    tracing::info!(name = %name, "state document replaced");
    Ok(WriteResponse::NoContent)
}
