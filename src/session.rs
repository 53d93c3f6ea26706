//! Cookie relay between the browser and the upstream API.
//!
//! The upstream sets `accessToken`/`refreshToken` cookies for its own
//! origin; this module forwards inbound cookies upstream and rewrites
//! upstream `Set-Cookie` headers so they bind to the gateway origin
//! (`Path=/`, no `Domain`).

use axum::{
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::Value;

pub const ACCESS_TOKEN: &str = "accessToken";
pub const REFRESH_TOKEN: &str = "refreshToken";

/// Authentication state is decided from cookie presence alone; the
/// gateway keeps no session store.
pub fn has_session(jar: &CookieJar) -> bool {
    jar.get(ACCESS_TOKEN).is_some() || jar.get(REFRESH_TOKEN).is_some()
}

/// Concatenates all inbound request cookies into a single `Cookie`
/// header value for the upstream call.
pub fn upstream_cookie_header(jar: &CookieJar) -> Option<String> {
    let header = jar
        .iter()
        .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
        .collect::<Vec<_>>()
        .join("; ");

    if header.is_empty() {
        None
    } else {
        Some(header)
    }
}

/// Appends upstream `Set-Cookie` values onto the outgoing response,
/// normalized for the gateway origin. Values that fail to parse are
/// relayed verbatim.
pub fn relay_set_cookies(headers: &mut HeaderMap, set_cookies: &[String]) {
    for raw in set_cookies {
        let normalized = normalize_set_cookie(raw);
        if let Ok(value) = HeaderValue::from_str(&normalized) {
            headers.append(SET_COOKIE, value);
        }
    }
}

/// Forces `Path=/` and strips `Domain`; all other attributes survive.
fn normalize_set_cookie(raw: &str) -> String {
    let Ok(parsed) = Cookie::parse(raw) else {
        return raw.to_owned();
    };

    let mut cookie = Cookie::new(parsed.name().to_owned(), parsed.value().to_owned());
    cookie.set_path("/");
    if parsed.http_only().unwrap_or(false) {
        cookie.set_http_only(true);
    }
    if parsed.secure().unwrap_or(false) {
        cookie.set_secure(true);
    }
    if let Some(same_site) = parsed.same_site() {
        cookie.set_same_site(same_site);
    }
    if let Some(max_age) = parsed.max_age() {
        cookie.set_max_age(max_age);
    }
    if let Some(expires) = parsed.expires() {
        cookie.set_expires(expires);
    }

    cookie.to_string()
}

/// Clearing cookies for both auth cookie names, used when the upstream
/// does not send its own on logout.
pub fn expired_auth_cookies() -> Vec<String> {
    [ACCESS_TOKEN, REFRESH_TOKEN]
        .into_iter()
        .map(|name| {
            let mut cookie = Cookie::build((name, ""))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();
            cookie.make_removal();
            cookie.to_string()
        })
        .collect()
}

/// Extends a set of upstream `Set-Cookie` values so that both auth
/// cookie names end up cleared: names the upstream already covers are
/// relayed as-is, the rest get synthesized clearing cookies.
pub fn ensure_auth_cookies_cleared(mut set_cookies: Vec<String>) -> Vec<String> {
    for expired in expired_auth_cookies() {
        let name = expired.split('=').next().unwrap_or_default().to_owned();
        let covered = set_cookies
            .iter()
            .any(|raw| raw.trim_start().starts_with(&format!("{name}=")));
        if !covered {
            set_cookies.push(expired);
        }
    }
    set_cookies
}

/// JSON response with relayed upstream cookies attached.
pub fn relay_response(status: StatusCode, set_cookies: &[String], body: Value) -> Response {
    let mut response = (status, Json(body)).into_response();
    relay_set_cookies(response.headers_mut(), set_cookies);
    response
}
