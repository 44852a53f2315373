//! # Pipeline Configuration
//!
//! Environment-driven configuration for the assembled pipeline. Everything
//! has a sensible local default: no auth token, no HTTPS enforcement, docs
//! enabled.

/// Configuration consumed by [`pipeline`](crate::pipeline).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bearer token guarding the versioned surface; `None` disables auth.
    pub auth_token: Option<String>,
    /// Redirect forwarded plain-HTTP requests to HTTPS.
    pub enforce_https: bool,
    /// Mount the documentation UI and per-version documents.
    pub docs_enabled: bool,
    /// Title carried by every generated OpenAPI document.
    pub doc_title: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_token: None,
            enforce_https: false,
            docs_enabled: true,
            doc_title: "Keel API".to_string(),
        }
    }
}

impl ApiConfig {
    /// Read configuration from the environment:
    /// `KEEL_AUTH_TOKEN`, `KEEL_ENFORCE_HTTPS`, `KEEL_DOCS_ENABLED`,
    /// `KEEL_DOC_TITLE`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_token: std::env::var("KEEL_AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
            enforce_https: env_flag("KEEL_ENFORCE_HTTPS", defaults.enforce_https),
            docs_enabled: env_flag("KEEL_DOCS_ENABLED", defaults.docs_enabled),
            doc_title: std::env::var("KEEL_DOC_TITLE").unwrap_or(defaults.doc_title),
        }
    }
}

/// Boolean env flag: `"false"`/`"0"` disable, `"true"`/`"1"` enable,
/// anything else keeps the default.
fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => match value.to_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
