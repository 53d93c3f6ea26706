use axum::extract::FromRef;

use crate::upstream::UpstreamClient;

#[derive(FromRef, Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}
