use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_balances))
        .route("/:name", get(get_balance))
}

pub async fn list_balances(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.balances.compute_all().await {
        Ok(balances) => {
            let views: Vec<dto::BalanceView> = balances.into_iter().map(Into::into).collect();
            Json(views).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_balance(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.balances.compute_one(&name).await {
        Ok(balance) => Json(dto::BalanceView::from(balance)).into_response(),
        Err(e) => errors::lookup_error_to_response(e),
    }
}
