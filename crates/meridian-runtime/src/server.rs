//! HTTP surface of a running clock
//!
//! Every mutation goes through the controller handle, so a request only
//! queues an event; the change shows up in the page after the next tick.

use std::net::{SocketAddr, TcpListener};

use axum::{
    extract::Path,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use meridian_core::{ClockError, ClockResult, DisplaySettings, ZoneId};

use crate::ControllerHandle;

/// Body of `POST /zones`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddZoneRequest {
    pub zone: String,
}

/// Body of zone mutation responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAccepted {
    pub zone: ZoneId,
}

/// A `ClockError` as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub ClockError);

impl From<ClockError> for ApiError {
    fn from(err: ClockError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ClockError::UnknownZone(_) | ClockError::Config(_) => StatusCode::BAD_REQUEST,
            ClockError::Server(_) => StatusCode::SERVICE_UNAVAILABLE,
            ClockError::UnknownNode(_) | ClockError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(err = %self.0, "request failed");
        }
        (status, self.0.to_string()).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn router(handle: ControllerHandle) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/zones", get(zones).post(add_zone))
        .route("/zones/*zone", delete(remove_zone))
        .route("/settings", get(settings).put(put_settings))
        .layer(Extension(handle))
}

/// Serve on an already bound listener until `cancel` fires
pub async fn serve_listener(
    listener: TcpListener,
    handle: ControllerHandle,
    cancel: CancellationToken,
) -> ClockResult<()> {
    listener.set_nonblocking(true)?;
    let server = axum::Server::from_tcp(listener)
        .map_err(|e| ClockError::Server(e.to_string()))?
        .serve(router(handle).into_make_service());
    info!(addr = %server.local_addr(), "page server listening");

    server
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| ClockError::Server(e.to_string()))?;

    info!("page server stopped");
    Ok(())
}

/// Bind `addr` and serve until `cancel` fires
pub async fn serve(addr: SocketAddr, handle: ControllerHandle, cancel: CancellationToken) -> ClockResult<()> {
    let listener = TcpListener::bind(addr)?;
    serve_listener(listener, handle, cancel).await
}

async fn index(Extension(handle): Extension<ControllerHandle>) -> Html<String> {
    Html(handle.page())
}

async fn zones(Extension(handle): Extension<ControllerHandle>) -> Json<Vec<ZoneId>> {
    Json(handle.zones())
}

async fn add_zone(
    Extension(handle): Extension<ControllerHandle>,
    Json(request): Json<AddZoneRequest>,
) -> ApiResult<(StatusCode, Json<ZoneAccepted>)> {
    let zone = handle.add_zone(&request.zone)?;
    Ok((StatusCode::ACCEPTED, Json(ZoneAccepted { zone })))
}

async fn remove_zone(
    Extension(handle): Extension<ControllerHandle>,
    Path(zone): Path<String>,
) -> ApiResult<(StatusCode, Json<ZoneAccepted>)> {
    let zone = handle.remove_zone(zone.trim_start_matches('/'))?;
    Ok((StatusCode::ACCEPTED, Json(ZoneAccepted { zone })))
}

async fn settings(Extension(handle): Extension<ControllerHandle>) -> Json<DisplaySettings> {
    Json(handle.settings())
}

async fn put_settings(
    Extension(handle): Extension<ControllerHandle>,
    Json(settings): Json<DisplaySettings>,
) -> ApiResult<StatusCode> {
    handle.set_display(settings)?;
    Ok(StatusCode::ACCEPTED)
}
