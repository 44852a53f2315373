//! # URL Routing Conventions
//!
//! Two conventions apply to the whole surface:
//!
//! - route segments are kebab-case ([`segment`] is the helper module authors
//!   use when declaring routes),
//! - matching is case-insensitive, implemented by lowercasing the request
//!   path before it reaches the router ([`lowercase_paths`]). Query strings
//!   pass through untouched.
//!
//! Path parameters are lowercased along with the rest of the path; every
//! identifier the surface exposes is lowercase by construction, so no
//! information is lost.

use axum::extract::Request;
use axum::http::uri::{PathAndQuery, Uri};
use axum::middleware::Next;
use axum::response::Response;
use keel_core::kebab_case;

/// Render one route segment in kebab-case with a leading slash:
/// `segment("OrderLines")` → `/order-lines`.
pub fn segment(name: &str) -> String {
    format!("/{}", kebab_case(name))
}

/// Middleware lowercasing the request path before routing.
pub async fn lowercase_paths(mut req: Request, next: Next) -> Response {
    if req.uri().path().bytes().any(|b| b.is_ascii_uppercase()) {
        if let Some(uri) = lowercased_uri(req.uri()) {
            *req.uri_mut() = uri;
        }
    }
    next.run(req).await
}

/// Rebuild `uri` with its path lowercased. Returns `None` when the rebuilt
/// URI fails to parse, in which case the original request passes through
/// unchanged.
fn lowercased_uri(uri: &Uri) -> Option<Uri> {
    let lowered = uri.path().to_ascii_lowercase();
    let path_and_query = match uri.query() {
        Some(q) => format!("{lowered}?{q}"),
        None => lowered,
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().ok()?);
    Uri::from_parts(parts).ok()
}
