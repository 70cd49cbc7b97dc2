use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::error::AppError;

use super::access::AdminAuthorizer;
use super::report::AuthorReviewerConnection;
use super::repository::ReviewDirectory;
use super::service::{ConnectionService, ConnectionServiceError};

/// Header carrying the signed-in caller's e-mail, set by the front end's session layer.
pub const CALLER_HEADER: &str = "x-user-email";

/// Router builder exposing the administrative connection matrix.
pub fn connection_router<D, Z>(service: Arc<ConnectionService<D, Z>>) -> Router
where
    D: ReviewDirectory + 'static,
    Z: AdminAuthorizer + 'static,
{
    Router::new()
        .route("/api/v1/admin/connections", get(list_handler::<D, Z>))
        .route(
            "/api/v1/admin/connections/:submission_id",
            get(submission_handler::<D, Z>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<D, Z>(
    State(service): State<Arc<ConnectionService<D, Z>>>,
    headers: HeaderMap,
) -> Response
where
    D: ReviewDirectory + 'static,
    Z: AdminAuthorizer + 'static,
{
    render(service.list(caller(&headers)))
}

pub(crate) async fn submission_handler<D, Z>(
    State(service): State<Arc<ConnectionService<D, Z>>>,
    Path(submission_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    D: ReviewDirectory + 'static,
    Z: AdminAuthorizer + 'static,
{
    render(service.for_submission_key(caller(&headers), &submission_id))
}

fn caller(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
}

fn render(result: Result<Vec<AuthorReviewerConnection>, ConnectionServiceError>) -> Response {
    match result {
        Ok(connections) => (StatusCode::OK, axum::Json(connections)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}
