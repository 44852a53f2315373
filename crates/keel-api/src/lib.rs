//! # keel-api — Versioned API Building Blocks
//!
//! The shared web-API bootstrap layer for a modular platform. Feature crates
//! contribute [`ApiModule`]s (a named, versioned axum router plus its OpenAPI
//! fragment); [`pipeline`] assembles them into one application with:
//!
//! - kebab-case, lowercase routing conventions,
//! - API version negotiation (URL segment → `x-api-version` header →
//!   media-type parameter, default 1.0.0),
//! - one OpenAPI document per published version,
//! - a documentation UI listing versions newest first,
//! - structured client errors and bearer-token authorization.
//!
//! ## Assembled surface
//!
//! | Path                          | Module        | Notes                        |
//! |-------------------------------|---------------|------------------------------|
//! | `/{group}/{module}/*`         | [`registry`]  | versioned API, behind auth   |
//! | `/docs`                       | [`docs_ui`]   | Swagger UI shell             |
//! | `/docs/{group}/openapi.json`  | [`openapi`]   | one document per version     |
//! | `/reference`                  | [`docs_ui`]   | Scalar page, newest version  |
//! | `/versions`                   | [`routes`]    | version report               |
//! | `/health/*`                   | [`routes`]    | unauthenticated probes       |
//!
//! ## Middleware stack (execution order)
//!
//! ```text
//! HttpsRedirect → LowercasePaths → VersionNegotiation → TraceLayer → Auth → Handler
//! ```
//!
//! Path-rewriting layers (lowercasing, negotiation) wrap the router as a
//! whole so rewrites happen before route matching; authorization wraps only
//! the versioned surface, leaving documentation and probes open.
//!
//! ## Example
//!
//! ```no_run
//! use keel_api::{pipeline, ApiConfig, ModuleRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     keel_api::telemetry::init_tracing();
//!
//!     let registry = ModuleRegistry::new();
//!     // feature crates register their ApiModules here
//!
//!     let app = pipeline(registry, ApiConfig::from_env());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod config;
pub mod docs_ui;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod registry;
pub mod routes;
pub mod routing;
pub mod telemetry;
pub mod versioning;

use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::{from_fn, Next};
use axum::{Extension, Router};
use tower::Layer;
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;
pub use error::{AppError, ErrorBody, ErrorDetail};
pub use keel_core::ApiVersion;
pub use openapi::ApiExplorer;
pub use registry::{ApiModule, ModuleProvider, ModuleRegistry};
pub use versioning::VersionPolicy;

use middleware::auth::AuthConfig;

/// Assemble the full application router from the registered modules.
///
/// Registration happens once, single-threaded, before the router serves its
/// first request; nothing mutates the routing table afterwards.
pub fn pipeline(registry: ModuleRegistry, config: ApiConfig) -> Router {
    let policy = Arc::new(VersionPolicy::from_registry(&registry));
    let explorer = ApiExplorer::from_registry(&registry, &config.doc_title);

    let auth_config = AuthConfig { token: config.auth_token.clone() };

    // Versioned API surface, behind bearer-token authorization.
    let versioned = registry
        .into_service_router()
        .layer(from_fn(middleware::auth::authorize))
        .layer(Extension(auth_config));

    // Documentation and operational probes stay outside authorization.
    let mut inner = Router::new()
        .merge(routes::health::router())
        .merge(routes::meta::router(policy.clone()))
        .merge(versioned);
    if config.docs_enabled {
        inner = inner
            .merge(docs_ui::router(&explorer))
            .merge(docs_ui::scalar_router(&explorer));
    }
    let inner = inner.layer(TraceLayer::new_for_http());

    // Path-rewriting layers wrap the router as a whole: negotiation rewrites
    // the URI onto the canonical version mount, so it must run before route
    // matching, which `Router::layer` would not provide.
    let negotiator = from_fn(move |req: Request, next: Next| {
        let policy = policy.clone();
        async move { versioning::negotiate(policy, req, next).await }
    });
    let service = from_fn(routing::lowercase_paths).layer(negotiator.layer(inner));
    let app = Router::new().fallback_service(service);

    if config.enforce_https {
        let service = from_fn(middleware::https_redirect::https_redirect).layer(app);
        Router::new().fallback_service(service)
    } else {
        app
    }
}
