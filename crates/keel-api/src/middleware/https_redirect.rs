//! # HTTPS Redirection
//!
//! The building blocks do not terminate TLS themselves; a proxy in front
//! does, reporting the original scheme through `x-forwarded-proto`. When
//! enforcement is configured this middleware answers forwarded plain-HTTP
//! requests with a 308 permanent redirect to the HTTPS equivalent.
//!
//! Requests without the forwarded-proto header (direct local traffic) pass
//! through untouched.

use axum::extract::Request;
use axum::http::header::{HeaderValue, HOST, LOCATION};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Header a fronting proxy uses to report the original request scheme.
pub const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// The redirection middleware. Applied outermost, before any other layer.
pub async fn https_redirect(req: Request, next: Next) -> Response {
    let proto = req
        .headers()
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok());

    match proto {
        Some(proto) if !proto.eq_ignore_ascii_case("https") => {
            match https_location(&req) {
                Some(location) => {
                    (StatusCode::PERMANENT_REDIRECT, [(LOCATION, location)]).into_response()
                }
                None => {
                    tracing::warn!("forwarded plain-HTTP request without a Host header");
                    next.run(req).await
                }
            }
        }
        _ => next.run(req).await,
    }
}

/// Build the `https://` location for a forwarded request. The host comes
/// from the `Host` header; without it no redirect target exists.
fn https_location(req: &Request) -> Option<HeaderValue> {
    let host = req
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| req.uri().host())?;

    let path_and_query = req
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str());

    HeaderValue::from_str(&format!("https://{host}{path_and_query}")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/orders", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(https_redirect))
    }

    #[tokio::test]
    async fn forwarded_http_redirects() {
        let request = HttpRequest::builder()
            .uri("/orders?page=2")
            .header(FORWARDED_PROTO, "http")
            .header(HOST, "api.example.com")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "https://api.example.com/orders?page=2"
        );
    }

    #[tokio::test]
    async fn forwarded_https_passes_through() {
        let request = HttpRequest::builder()
            .uri("/orders")
            .header(FORWARDED_PROTO, "https")
            .header(HOST, "api.example.com")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn direct_request_passes_through() {
        let request = HttpRequest::builder().uri("/orders").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
