use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reqwest::Method;
use serde_json::Value;

use crate::{ctx::BaseParams, session::relay_response, state::AppState, Result};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users/me", get(get_me).patch(update_me))
        .with_state(state)
}

async fn get_me(base: BaseParams) -> impl IntoResponse {
    passthrough(Method::GET, None, base).await
}

async fn update_me(base: BaseParams, Json(body): Json<Value>) -> impl IntoResponse {
    passthrough(Method::PATCH, Some(body), base).await
}

async fn passthrough(method: Method, body: Option<Value>, base: BaseParams) -> Result<Response> {
    let cookie_header = base.cookie_header();
    let res = base
        .upstream
        .send(method, "/users/me", &[], cookie_header.as_deref(), body.as_ref())
        .await?
        .ensure_ok()?;

    Ok(relay_response(res.status, &res.set_cookies, res.body))
}
