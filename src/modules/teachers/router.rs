use axum::{Router, routing::get};

use super::controller::{get_teacher, get_teachers};
use crate::state::AppState;

pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_teachers))
        .route("/{id}", get(get_teacher))
}
