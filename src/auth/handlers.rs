use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Method;
use serde_json::{json, Value};

use crate::{
    ctx::BaseParams,
    session::{ensure_auth_cookies_cleared, expired_auth_cookies, relay_response, relay_set_cookies},
    Error, Result,
};

/// Login and register are plain passthroughs: upstream status, body
/// and `Set-Cookie` all relay to the browser.
pub async fn authenticate(path: &str, body: Value, base: BaseParams) -> Result<Response> {
    let cookie_header = base.cookie_header();
    let res = base
        .upstream
        .send(Method::POST, path, &[], cookie_header.as_deref(), Some(&body))
        .await?
        .ensure_ok()?;

    Ok(relay_response(res.status, &res.set_cookies, res.body))
}

/// Walks an arbitrary session payload (`user`/`data` nesting, arrays)
/// until it finds an object with a string `email`.
pub fn pick_user_from_payload(payload: &Value) -> Option<Value> {
    match payload {
        Value::Array(items) => items.iter().find_map(pick_user_from_payload),
        Value::Object(map) => {
            if let Some(user) = map.get("user").and_then(pick_user_from_payload) {
                return Some(user);
            }
            if let Some(user) = map.get("data").and_then(pick_user_from_payload) {
                return Some(user);
            }
            if map.get("email").map_or(false, Value::is_string) {
                return Some(payload.clone());
            }
            None
        }
        _ => None,
    }
}

pub async fn session(base: BaseParams) -> Result<Response> {
    // No auth cookies: anonymous, no reason to bother the upstream.
    if !base.has_session() {
        return Ok((StatusCode::OK, Json(Value::Null)).into_response());
    }

    let cookie_header = base.cookie_header();
    let res = base
        .upstream
        .send(Method::GET, "/auth/session", &[], cookie_header.as_deref(), None)
        .await?;

    if res.status == StatusCode::UNAUTHORIZED || res.status == StatusCode::FORBIDDEN {
        return Ok((StatusCode::OK, Json(Value::Null)).into_response());
    }
    let res = res.ensure_ok()?;

    let body = match pick_user_from_payload(&res.body) {
        Some(user) => json!({ "user": user }),
        None => Value::Null,
    };

    Ok(relay_response(StatusCode::OK, &res.set_cookies, body))
}

/// Both auth cookies are cleared on every logout response, whatever
/// the upstream said.
pub async fn logout(base: BaseParams) -> Result<Response> {
    let cookie_header = base.cookie_header();
    let outcome = base
        .upstream
        .send(Method::POST, "/auth/logout", &[], cookie_header.as_deref(), None)
        .await;

    let response = match outcome {
        Ok(res) if res.status.is_success() => {
            let set_cookies = ensure_auth_cookies_cleared(res.set_cookies);
            let body = if res.body.is_null() {
                json!({ "message": "Logged out successfully" })
            } else {
                res.body
            };
            relay_response(res.status, &set_cookies, body)
        }
        // Already logged out upstream: still a successful logout here.
        Ok(res) if res.status == StatusCode::UNAUTHORIZED || res.status == StatusCode::FORBIDDEN => {
            relay_response(
                StatusCode::OK,
                &expired_auth_cookies(),
                json!({ "message": "Already logged out" }),
            )
        }
        Ok(res) => {
            let mut response = Error::Upstream {
                status: res.status.as_u16(),
                body: res.body,
            }
            .into_response();
            relay_set_cookies(response.headers_mut(), &expired_auth_cookies());
            response
        }
        Err(err) => {
            let mut response = err.into_response();
            relay_set_cookies(response.headers_mut(), &expired_auth_cookies());
            response
        }
    };

    Ok(response)
}
