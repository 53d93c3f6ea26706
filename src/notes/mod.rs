mod handlers;
pub mod mock;
pub mod model;
mod routes;

use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().merge(routes::router(state))
}
