use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/api/profile", get(handlers::auth::profile))
        .route(
            "/api/admin/register-psychologist",
            post(handlers::auth::register_psychologist),
        )
}
