use axum::extract::Extension;
use axum_extra::extract::CookieJar;
use axum_macros::FromRequestParts;

use crate::{session, upstream::UpstreamClient};

/// Per-request proxy context: the shared upstream client plus the
/// caller's cookies.
#[derive(Clone, FromRequestParts)]
pub struct BaseParams {
    pub jar: CookieJar,
    #[from_request(via(Extension))]
    pub upstream: UpstreamClient,
}

impl BaseParams {
    /// `Cookie` header value for the upstream call, if the request
    /// carried any cookies.
    pub fn cookie_header(&self) -> Option<String> {
        session::upstream_cookie_header(&self.jar)
    }

    pub fn has_session(&self) -> bool {
        session::has_session(&self.jar)
    }
}
