use axum::{Router, routing::get};

use super::controller::{delete_user, get_user};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_user).delete(delete_user))
}
