//! Tower middleware for the tz-scope request timezone.
//!
//! [`TimezoneLayer`] reads a zone name from a request header (`x-timezone`
//! by default), resolves it fail-open — unknown or missing names become UTC —
//! and runs the inner service's future inside a fresh timezone scope. Every
//! [`tz_scope::get_timezone`] call below the middleware, for the whole
//! lifetime of the request, observes that zone and no other request's.
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use tz_scope_tower::TimezoneLayer;
//!
//! async fn starts_at() -> String {
//!     tz_scope::get_timezone().to_string()
//! }
//!
//! let app: Router = Router::new()
//!     .route("/tz", get(starts_at))
//!     .layer(TimezoneLayer::new());
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use chrono_tz::Tz;
use http::{HeaderName, Request};
use tower::{Layer, Service};
use tracing::debug;
use tz_scope::{resolve_timezone, with_timezone};

/// Header the zone name is read from by default.
pub const DEFAULT_TIMEZONE_HEADER: &str = "x-timezone";

/// Zone names longer than this are cut before lookup.
const MAX_ZONE_NAME_LEN: usize = 64;

/// Layer that wraps an inner service in [`TimezoneService`].
#[derive(Debug, Clone)]
pub struct TimezoneLayer {
    header: HeaderName,
}

impl TimezoneLayer {
    /// A layer reading [`DEFAULT_TIMEZONE_HEADER`].
    pub fn new() -> Self {
        Self {
            header: HeaderName::from_static(DEFAULT_TIMEZONE_HEADER),
        }
    }

    /// A layer reading a custom header.
    pub fn with_header(header: HeaderName) -> Self {
        Self { header }
    }
}

impl Default for TimezoneLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for TimezoneLayer {
    type Service = TimezoneService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TimezoneService {
            inner,
            header: self.header.clone(),
        }
    }
}

/// Service that pins the request timezone around its inner service.
#[derive(Debug, Clone)]
pub struct TimezoneService<S> {
    inner: S,
    header: HeaderName,
}

impl<S, B> Service<Request<B>> for TimezoneService<S>
where
    S: Service<Request<B>>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), S::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let tz = zone_from_request(&req, &self.header);
        debug!(timezone = %tz, "pinned request timezone");
        Box::pin(with_timezone(tz, self.inner.call(req)))
    }
}

fn zone_from_request<B>(req: &Request<B>, header: &HeaderName) -> Tz {
    let name = req
        .headers()
        .get(header)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("UTC");
    // values that pass to_str are visible ASCII, so the byte cut is a char cut
    let name = &name[..name.len().min(MAX_ZONE_NAME_LEN)];
    resolve_timezone(name).unwrap_or(Tz::UTC)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_header(value: &str) -> Request<()> {
        Request::builder()
            .header(DEFAULT_TIMEZONE_HEADER, value)
            .body(())
            .unwrap()
    }

    #[test]
    fn test_zone_from_valid_header() {
        let req = request_with_header("Asia/Kolkata");
        let header = HeaderName::from_static(DEFAULT_TIMEZONE_HEADER);
        assert_eq!(zone_from_request(&req, &header), chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn test_missing_header_defaults_to_utc() {
        let req = Request::builder().body(()).unwrap();
        let header = HeaderName::from_static(DEFAULT_TIMEZONE_HEADER);
        assert_eq!(zone_from_request(&req, &header), Tz::UTC);
    }

    #[test]
    fn test_unknown_zone_falls_back_to_utc() {
        let req = request_with_header("Not/AZone");
        let header = HeaderName::from_static(DEFAULT_TIMEZONE_HEADER);
        assert_eq!(zone_from_request(&req, &header), Tz::UTC);
    }

    #[test]
    fn test_oversized_header_is_cut_before_lookup() {
        let oversized = format!("Asia/Kolkata{}", "x".repeat(100));
        let req = request_with_header(&oversized);
        let header = HeaderName::from_static(DEFAULT_TIMEZONE_HEADER);
        // the cut name no longer resolves, so the fail-open default applies
        assert_eq!(zone_from_request(&req, &header), Tz::UTC);
    }

    #[test]
    fn test_custom_header_name() {
        let req = Request::builder()
            .header("x-user-tz", "Europe/London")
            .body(())
            .unwrap();
        let header = HeaderName::from_static("x-user-tz");
        assert_eq!(zone_from_request(&req, &header), chrono_tz::Europe::London);
    }
}
