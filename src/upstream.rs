use std::time::Duration;

use axum::http::StatusCode;
use reqwest::{
    header::{ACCEPT, COOKIE, SET_COOKIE, USER_AGENT},
    Method,
};
use serde_json::Value;

use crate::{config::config, Error, Result};

/// Thin client over the NoteHub upstream API. Clones share the
/// underlying connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Raw `Set-Cookie` values, in upstream order.
    pub set_cookies: Vec<String>,
    /// Parsed JSON body; `Null` when the upstream body is not JSON.
    pub body: Value,
}

impl UpstreamResponse {
    /// Turns a non-2xx response into [`Error::Upstream`], keeping the
    /// upstream status and body for the relayed error payload.
    pub fn ensure_ok(self) -> Result<UpstreamResponse> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(Error::Upstream {
                status: self.status.as_u16(),
                body: self.body,
            })
        }
    }
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(ACCEPT, "application/json".parse().unwrap());
            headers.insert(USER_AGENT, "notehub-gateway".parse().unwrap());

            reqwest::Client::builder()
                .default_headers(headers)
                .timeout(timeout)
                .build()
                .unwrap()
        };

        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Self { http, base_url }
    }

    pub fn from_config() -> Self {
        let config = config();
        Self::new(
            config.upstream_base_url.clone(),
            Duration::from_secs(config.upstream_timeout_secs),
        )
    }

    /// Single-shot request to the upstream; no retries.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        cookie_header: Option<&str>,
        body: Option<&Value>,
    ) -> Result<UpstreamResponse> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.http.request(method, url);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(cookie_header) = cookie_header {
            request = request.header(COOKIE, cookie_header);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok().map(str::to_owned))
            .collect();

        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        Ok(UpstreamResponse {
            status,
            set_cookies,
            body,
        })
    }
}
