//! # Bearer-Token Authorization
//!
//! Guards the versioned API surface. When no token is configured the layer
//! passes everything through — a host wiring the building blocks locally
//! gets an open surface until it configures `KEEL_AUTH_TOKEN`.
//!
//! Token comparison is constant-time (`subtle`) so the check leaks nothing
//! about prefix matches.

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Authorization configuration, injected as a request extension during
/// pipeline assembly.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The expected bearer token; `None` disables authorization.
    pub token: Option<String>,
}

/// The authorization middleware.
pub async fn authorize(
    Extension(config): Extension<AuthConfig>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = config.token.as_deref() else {
        return next.run(req).await;
    };

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) => {
            next.run(req).await
        }
        Some(_) => AppError::Unauthorized("invalid bearer token".to_string()).into_response(),
        None => {
            AppError::Unauthorized("missing Authorization: Bearer header".to_string())
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn app(token: Option<&str>) -> Router {
        let config = AuthConfig { token: token.map(str::to_string) };
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn(authorize))
            .layer(Extension(config))
    }

    async fn status(app: Router, auth: Option<&str>) -> StatusCode {
        let mut builder = HttpRequest::builder().uri("/ping");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        response.status()
    }

    #[tokio::test]
    async fn disabled_auth_passes_through() {
        assert_eq!(status(app(None), None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        assert_eq!(status(app(Some("secret")), None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        assert_eq!(
            status(app(Some("secret")), Some("Bearer nope")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn correct_token_passes() {
        assert_eq!(status(app(Some("secret")), Some("Bearer secret")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        assert_eq!(
            status(app(Some("secret")), Some("Basic secret")).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
