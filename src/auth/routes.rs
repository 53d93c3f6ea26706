use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use crate::{ctx::BaseParams, state::AppState};

use super::handlers;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
        .with_state(state)
}

async fn login(base: BaseParams, Json(body): Json<Value>) -> impl IntoResponse {
    handlers::authenticate("/auth/login", body, base).await
}

async fn register(base: BaseParams, Json(body): Json<Value>) -> impl IntoResponse {
    handlers::authenticate("/auth/register", body, base).await
}

async fn logout(base: BaseParams) -> impl IntoResponse {
    handlers::logout(base).await
}

async fn session(base: BaseParams) -> impl IntoResponse {
    handlers::session(base).await
}

#[cfg(test)]
mod tests {
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::{
        errors::Result,
        tests::{fake_upstream, test_server, unreachable_upstream},
        upstream::UpstreamClient,
    };

    async fn server(upstream: UpstreamClient) -> Result<TestServer> {
        test_server(upstream, super::router).await
    }

    fn set_cookies(response: &axum_test::TestResponse) -> Vec<String> {
        response
            .headers()
            .get_all(axum::http::header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_owned())
            .collect()
    }

    fn assert_both_cookies_cleared(cookies: &[String]) {
        assert!(cookies.iter().any(|c| c.starts_with("accessToken=") && c.contains("Max-Age=0")));
        assert!(cookies.iter().any(|c| c.starts_with("refreshToken=") && c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn login_relays_rewritten_cookies() -> Result<()> {
        let upstream = fake_upstream(Router::new().route(
            "/auth/login",
            post(|| async {
                let mut headers = HeaderMap::new();
                headers.append(
                    axum::http::header::SET_COOKIE,
                    "accessToken=abc; Domain=notehub-api.goit.study; Path=/auth; HttpOnly; SameSite=Lax"
                        .parse()
                        .unwrap(),
                );
                headers.append(
                    axum::http::header::SET_COOKIE,
                    "refreshToken=def; Domain=notehub-api.goit.study; Path=/auth; HttpOnly"
                        .parse()
                        .unwrap(),
                );
                (headers, Json(json!({ "email": "a@b.c", "username": "ann" })))
            }),
        ))
        .await;

        let response = server(upstream)
            .await?
            .post("/auth/login")
            .json(&json!({ "email": "a@b.c", "password": "hunter2" }))
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>()["email"], "a@b.c");

        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 2);
        for cookie in &cookies {
            assert!(cookie.contains("Path=/"));
            assert!(!cookie.contains("/auth"));
            assert!(!cookie.contains("Domain"));
        }
        Ok(())
    }

    #[tokio::test]
    async fn login_propagates_upstream_rejection() -> Result<()> {
        let upstream = fake_upstream(Router::new().route(
            "/auth/login",
            post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Wrong password" }))) }),
        ))
        .await;

        let response = server(upstream)
            .await?
            .post("/auth/login")
            .json(&json!({ "email": "a@b.c", "password": "nope" }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), 401);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "upstream");
        assert_eq!(body["response"]["message"], "Wrong password");
        Ok(())
    }

    #[tokio::test]
    async fn session_without_cookies_is_null() -> Result<()> {
        // Never reaches the upstream, so an unreachable one is fine.
        let response = server(unreachable_upstream()).await?.get("/auth/session").await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>(), Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn session_extracts_nested_user() -> Result<()> {
        let upstream = fake_upstream(Router::new().route(
            "/auth/session",
            get(|| async { Json(json!({ "data": { "user": { "email": "a@b.c", "username": "ann" } } })) }),
        ))
        .await;

        let response = server(upstream)
            .await?
            .get("/auth/session")
            .add_cookie(Cookie::new("accessToken", "token"))
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>()["user"]["email"], "a@b.c");
        Ok(())
    }

    #[tokio::test]
    async fn session_maps_unauthorized_to_null() -> Result<()> {
        let upstream = fake_upstream(Router::new().route(
            "/auth/session",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "message": "expired" }))) }),
        ))
        .await;

        let response = server(upstream)
            .await?
            .get("/auth/session")
            .add_cookie(Cookie::new("accessToken", "stale"))
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>(), Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn logout_synthesizes_clearing_cookies() -> Result<()> {
        let upstream = fake_upstream(Router::new().route(
            "/auth/logout",
            post(|| async { Json(Value::Null) }),
        ))
        .await;

        let response = server(upstream)
            .await?
            .post("/auth/logout")
            .add_cookie(Cookie::new("accessToken", "token"))
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>()["message"], "Logged out successfully");
        assert_both_cookies_cleared(&set_cookies(&response));
        Ok(())
    }

    #[tokio::test]
    async fn logout_relays_upstream_cookies_and_clears_the_rest() -> Result<()> {
        let upstream = fake_upstream(Router::new().route(
            "/auth/logout",
            post(|| async {
                let mut headers = HeaderMap::new();
                headers.append(
                    axum::http::header::SET_COOKIE,
                    "accessToken=; Max-Age=0; Path=/; Domain=notehub-api.goit.study".parse().unwrap(),
                );
                (headers, Json(json!({ "message": "bye" })))
            }),
        ))
        .await;

        let response = server(upstream).await?.post("/auth/logout").await;

        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("accessToken="));
        assert!(!cookies[0].contains("Domain"));
        assert_both_cookies_cleared(&cookies);
        Ok(())
    }

    #[tokio::test]
    async fn logout_when_already_logged_out_succeeds() -> Result<()> {
        let upstream = fake_upstream(Router::new().route(
            "/auth/logout",
            post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "message": "no session" }))) }),
        ))
        .await;

        let response = server(upstream).await?.post("/auth/logout").await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>()["message"], "Already logged out");
        assert_both_cookies_cleared(&set_cookies(&response));
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_cookies_even_when_unreachable() -> Result<()> {
        let response = server(unreachable_upstream())
            .await?
            .post("/auth/logout")
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), 502);
        assert_both_cookies_cleared(&set_cookies(&response));
        Ok(())
    }
}
