use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/psychologist/availability",
            put(handlers::availability::set_availability)
                .post(handlers::availability::set_availability)
                .delete(handlers::availability::clear_availability),
        )
        .route(
            "/api/psychologists/:id/availability",
            get(handlers::availability::get_availability),
        )
}
