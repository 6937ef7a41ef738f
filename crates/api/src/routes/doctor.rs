use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/doctors",
            get(handlers::doctor::list_doctors).post(handlers::doctor::create_doctor),
        )
        .route(
            "/api/doctors/:id",
            get(handlers::doctor::get_doctor).delete(handlers::doctor::delete_doctor),
        )
        .route(
            "/api/doctors/:id/working-hours",
            put(handlers::doctor::set_working_hours),
        )
        .route(
            "/api/doctors/:id/available-slots",
            get(handlers::availability::get_available_slots),
        )
}
