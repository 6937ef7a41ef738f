use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/medicines",
            get(handlers::medicine::list_medicines).post(handlers::medicine::create_medicine),
        )
        .route("/api/medicines/:id", get(handlers::medicine::get_medicine))
        .route(
            "/api/medicines/:id/stock",
            post(handlers::medicine::adjust_stock),
        )
}
