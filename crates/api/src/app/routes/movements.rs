use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockbook_ledger::Direction;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Receipts.
pub fn inward_router() -> Router {
    Router::new().route("/", get(list_inward).post(record_inward))
}

/// Dispatches (outward movements).
pub fn dispatch_router() -> Router {
    Router::new().route("/", get(list_dispatch).post(record_dispatch))
}

pub async fn list_inward(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    list(&services, Direction::Inward).await
}

pub async fn list_dispatch(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    list(&services, Direction::Outward).await
}

pub async fn record_inward(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    record(&services, Direction::Inward, body).await
}

pub async fn record_dispatch(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    record(&services, Direction::Outward, body).await
}

async fn list(services: &AppServices, direction: Direction) -> axum::response::Response {
    match services.ledger.list(direction).await {
        Ok(records) => {
            let views: Vec<dto::MovementView> = records.into_iter().map(Into::into).collect();
            Json(views).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn record(
    services: &AppServices,
    direction: Direction,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let draft = match body.into_draft() {
        Ok(draft) => draft,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.ledger.append(draft, direction).await {
        Ok(Some(id)) => {
            (StatusCode::CREATED, Json(dto::MovementAppended::from(Some(id)))).into_response()
        }
        // Blank product name: accepted, nothing stored.
        Ok(None) => (StatusCode::OK, Json(dto::MovementAppended::from(None))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
