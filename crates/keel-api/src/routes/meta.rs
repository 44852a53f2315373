//! # Version Report
//!
//! `GET /versions` — the machine-readable counterpart of the
//! `api-supported-versions` / `api-deprecated-versions` response headers:
//! every published version, the deprecated subset, and the default assumed
//! when a client sends no indicator.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use keel_core::ApiVersion;
use serde::{Deserialize, Serialize};

use crate::versioning::VersionPolicy;

/// The version report payload. Versions serialize as display strings
/// (`"2.1.0"`).
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionReport {
    pub default: ApiVersion,
    pub supported: Vec<ApiVersion>,
    pub deprecated: Vec<ApiVersion>,
}

/// Build the version report router.
pub fn router(policy: Arc<VersionPolicy>) -> Router {
    Router::new().route(
        "/versions",
        get(move || async move {
            Json(VersionReport {
                default: policy.default_version(),
                supported: policy.supported().to_vec(),
                deprecated: policy.deprecated().to_vec(),
            })
        }),
    )
}
