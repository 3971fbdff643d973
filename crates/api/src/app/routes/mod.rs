use axum::{routing::get, Router};

pub mod balance;
pub mod movements;
pub mod products;
pub mod system;

/// Router for every inventory endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/products", products::router())
        .nest("/inward", movements::inward_router())
        .nest("/dispatch", movements::dispatch_router())
        .nest("/balance", balance::router())
}
