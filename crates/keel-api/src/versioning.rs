//! # API Version Negotiation
//!
//! Resolves the API version a request targets from three sources, first one
//! present wins:
//!
//! 1. URL path segment — `/v2.1.0/orders`, shorthands `/v2/orders` and
//!    `/2.1/orders` accepted;
//! 2. the `x-api-version` request header;
//! 3. the `x-api-version` media-type parameter, read from `Accept` and then
//!    `Content-Type`.
//!
//! A request carrying no indicator at all resolves to the default version
//! (1.0.0). Shorthand indicators resolve to the newest published version
//! sharing the supplied components; a full `major.minor.patch` indicator
//! must match a published version exactly.
//!
//! After resolution the request URI is rewritten onto the canonical
//! `/v<major>.<minor>.<patch>/...` mount path and the negotiated
//! [`ApiVersion`] is inserted as a request extension. Every negotiated
//! response reports the published surface through the
//! `api-supported-versions` and `api-deprecated-versions` headers.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use axum::http::uri::{PathAndQuery, Uri};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use keel_core::ApiVersion;

use crate::error::AppError;
use crate::registry::ModuleRegistry;

/// Request header and media-type parameter carrying the version indicator.
pub const VERSION_HEADER: &str = "x-api-version";

/// Response header listing every published version.
pub const SUPPORTED_VERSIONS_HEADER: &str = "api-supported-versions";

/// Response header listing deprecated versions; absent when none are.
pub const DEPRECATED_VERSIONS_HEADER: &str = "api-deprecated-versions";

/// First path segments that bypass negotiation entirely: the documentation
/// surface and operational probes are unversioned.
pub const RESERVED_PREFIXES: &[&str] = &["docs", "reference", "health", "versions"];

/// Immutable negotiation policy derived from the registry at startup.
#[derive(Debug, Clone)]
pub struct VersionPolicy {
    supported: Vec<ApiVersion>,
    deprecated: Vec<ApiVersion>,
    default: ApiVersion,
}

impl VersionPolicy {
    /// Derive the policy from the registered modules.
    ///
    /// The default version is the published version that 1.0.0 resolves to:
    /// exactly 1.0.0 when published, otherwise the newest published 1.x,
    /// otherwise the oldest published version. An empty registry publishes
    /// just the default so the pipeline stays well-formed.
    pub fn from_registry(registry: &ModuleRegistry) -> Self {
        let mut supported = registry.versions();
        if supported.is_empty() {
            supported.push(ApiVersion::DEFAULT);
        }

        let default = if supported.contains(&ApiVersion::DEFAULT) {
            ApiVersion::DEFAULT
        } else {
            supported
                .iter()
                .rev()
                .find(|v| v.matches_prefix(ApiVersion::DEFAULT.major, None))
                .copied()
                .unwrap_or(supported[0])
        };

        Self {
            supported,
            deprecated: registry.deprecated_versions(),
            default,
        }
    }

    /// Every published version, ascending.
    pub fn supported(&self) -> &[ApiVersion] {
        &self.supported
    }

    /// Deprecated versions, ascending.
    pub fn deprecated(&self) -> &[ApiVersion] {
        &self.deprecated
    }

    /// The version assumed when the client supplies no indicator.
    pub fn default_version(&self) -> ApiVersion {
        self.default
    }

    /// Resolve a raw version indicator against the published surface.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidValue`] for malformed indicators,
    /// [`AppError::UnsupportedVersion`] for well-formed indicators naming no
    /// published version.
    pub fn resolve(&self, raw: &str) -> Result<ApiVersion, AppError> {
        let parsed: ApiVersion = raw.parse()?;

        // Components the client actually supplied.
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let supplied = digits.split('.').count();

        let resolved = match supplied {
            3 => self.supported.iter().copied().find(|v| *v == parsed),
            2 => self
                .supported
                .iter()
                .rev()
                .copied()
                .find(|v| v.matches_prefix(parsed.major, Some(parsed.minor))),
            _ => self
                .supported
                .iter()
                .rev()
                .copied()
                .find(|v| v.matches_prefix(parsed.major, None)),
        };

        resolved.ok_or_else(|| AppError::UnsupportedVersion(trimmed.to_string()))
    }

    fn supported_header(&self) -> String {
        join_versions(&self.supported)
    }

    fn deprecated_header(&self) -> Option<String> {
        if self.deprecated.is_empty() {
            None
        } else {
            Some(join_versions(&self.deprecated))
        }
    }
}

fn join_versions(versions: &[ApiVersion]) -> String {
    versions
        .iter()
        .map(ApiVersion::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The negotiation middleware. Layered over the versioned sub-router via
/// `axum::middleware::from_fn` with the policy captured by the closure.
pub async fn negotiate(policy: Arc<VersionPolicy>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let first = path.trim_start_matches('/').split('/').next().unwrap_or("");

    if first.is_empty() || RESERVED_PREFIXES.contains(&first) {
        return next.run(req).await;
    }

    let outcome = if looks_like_version(first) {
        resolve_from_segment(&policy, &path, first)
    } else {
        resolve_from_headers(&policy, &path, req.headers())
    };

    let (version, rewritten) = match outcome {
        Ok(v) => v,
        Err(err) => return err.into_response(),
    };

    if let Some(new_path) = rewritten {
        if let Some(uri) = replace_path(req.uri(), &new_path) {
            *req.uri_mut() = uri;
        }
    }
    req.extensions_mut().insert(version);

    let mut response = next.run(req).await;
    report_versions(&policy, response.headers_mut());
    response
}

/// URL segment reader: resolve the leading segment, rewriting it onto the
/// canonical group when the client used a shorthand.
fn resolve_from_segment(
    policy: &VersionPolicy,
    path: &str,
    segment: &str,
) -> Result<(ApiVersion, Option<String>), AppError> {
    let version = policy.resolve(segment)?;
    let group = version.group_name();
    if segment == group {
        Ok((version, None))
    } else {
        let rest = &path[1 + segment.len()..];
        Ok((version, Some(format!("/{group}{rest}"))))
    }
}

/// Header and media-type readers, then the default. The resolved group is
/// prepended to the path so the request lands on the versioned mount.
fn resolve_from_headers(
    policy: &VersionPolicy,
    path: &str,
    headers: &HeaderMap,
) -> Result<(ApiVersion, Option<String>), AppError> {
    let raw = header_version(headers).or_else(|| media_type_version(headers));
    let version = match raw {
        Some(raw) => policy.resolve(&raw)?,
        None => policy.default_version(),
    };
    Ok((version, Some(format!("/{}{path}", version.group_name()))))
}

/// Whether a path segment is a version indicator: an optional `v`/`V`
/// followed by digits and dots.
fn looks_like_version(segment: &str) -> bool {
    let digits = segment
        .strip_prefix('v')
        .or_else(|| segment.strip_prefix('V'))
        .unwrap_or(segment);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

fn header_version(headers: &HeaderMap) -> Option<String> {
    headers
        .get(VERSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Media-type parameter reader: `Accept: application/json;x-api-version=2.0`
/// and the same parameter on `Content-Type`.
fn media_type_version(headers: &HeaderMap) -> Option<String> {
    [ACCEPT, CONTENT_TYPE].iter().find_map(|name| {
        let value = headers.get(name)?.to_str().ok()?;
        media_type_param(value, VERSION_HEADER)
    })
}

/// Extract a parameter value from a media-type header value, scanning every
/// listed media range.
fn media_type_param(header: &str, param: &str) -> Option<String> {
    header.split(',').find_map(|range| {
        range.split(';').skip(1).find_map(|candidate| {
            let (name, value) = candidate.split_once('=')?;
            if name.trim().eq_ignore_ascii_case(param) {
                let value = value.trim().trim_matches('"');
                (!value.is_empty()).then(|| value.to_string())
            } else {
                None
            }
        })
    })
}

/// Swap the path of `uri`, keeping the query string.
fn replace_path(uri: &Uri, new_path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(q) => format!("{new_path}?{q}"),
        None => new_path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().ok()?);
    Uri::from_parts(parts).ok()
}

/// Attach the version report headers to a negotiated response.
fn report_versions(policy: &VersionPolicy, headers: &mut HeaderMap) {
    if let Ok(value) = HeaderValue::from_str(&policy.supported_header()) {
        headers.insert(SUPPORTED_VERSIONS_HEADER, value);
    }
    if let Some(deprecated) = policy.deprecated_header() {
        if let Ok(value) = HeaderValue::from_str(&deprecated) {
            headers.insert(DEPRECATED_VERSIONS_HEADER, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ApiModule, ModuleRegistry};
    use axum::Router;
    use utoipa::openapi::OpenApiBuilder;

    fn policy(versions: &[(u16, u16, bool)]) -> VersionPolicy {
        let mut registry = ModuleRegistry::new();
        for &(major, minor, deprecated) in versions {
            let mut module = ApiModule::new(
                "orders",
                ApiVersion::new(major, minor),
                Router::new(),
                OpenApiBuilder::new().build(),
            );
            if deprecated {
                module = module.deprecated();
            }
            registry.register(module);
        }
        VersionPolicy::from_registry(&registry)
    }

    #[test]
    fn empty_registry_publishes_default() {
        let policy = VersionPolicy::from_registry(&ModuleRegistry::new());
        assert_eq!(policy.supported(), &[ApiVersion::DEFAULT]);
        assert_eq!(policy.default_version(), ApiVersion::DEFAULT);
    }

    #[test]
    fn exact_version_resolves() {
        let p = policy(&[(1, 0, false), (2, 0, false)]);
        assert_eq!(p.resolve("2.0.0").unwrap(), ApiVersion::new(2, 0));
        assert_eq!(p.resolve("v2.0.0").unwrap(), ApiVersion::new(2, 0));
    }

    #[test]
    fn shorthand_resolves_to_newest_matching() {
        let p = policy(&[(2, 0, false), (2, 1, false)]);
        assert_eq!(p.resolve("2").unwrap(), ApiVersion::new(2, 1));
        assert_eq!(p.resolve("v2.0").unwrap(), ApiVersion::new(2, 0));
    }

    #[test]
    fn full_form_requires_exact_match() {
        let p = policy(&[(2, 1, false)]);
        let err = p.resolve("2.1.5").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedVersion(_)));
    }

    #[test]
    fn unknown_version_is_unsupported() {
        let p = policy(&[(1, 0, false)]);
        let err = p.resolve("9").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedVersion(ref raw) if raw == "9"));
    }

    #[test]
    fn malformed_version_is_invalid_value() {
        let p = policy(&[(1, 0, false)]);
        let err = p.resolve("banana").unwrap_err();
        assert!(matches!(err, AppError::InvalidValue { .. }));
    }

    #[test]
    fn deprecated_versions_reported() {
        let p = policy(&[(1, 0, true), (2, 0, false)]);
        assert_eq!(p.deprecated(), &[ApiVersion::new(1, 0)]);
        assert_eq!(p.deprecated_header().unwrap(), "1.0.0");
        assert_eq!(p.supported_header(), "1.0.0, 2.0.0");
    }

    #[test]
    fn version_segments_recognized() {
        for seg in ["v1", "V2.1", "1.0.0", "2"] {
            assert!(looks_like_version(seg), "{seg}");
        }
        for seg in ["orders", "docs", "v", "va1", ""] {
            assert!(!looks_like_version(seg), "{seg}");
        }
    }

    #[test]
    fn header_reader_trims() {
        let mut headers = HeaderMap::new();
        headers.insert(VERSION_HEADER, HeaderValue::from_static(" 2.0 "));
        assert_eq!(header_version(&headers).unwrap(), "2.0");
    }

    #[test]
    fn media_type_reader_scans_accept_then_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;x-api-version=1.0"),
        );
        assert_eq!(media_type_version(&headers).unwrap(), "1.0");

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json; x-api-version=2.0"),
        );
        assert_eq!(media_type_version(&headers).unwrap(), "2.0");
    }

    #[test]
    fn media_type_param_handles_quoted_and_listed_ranges() {
        assert_eq!(
            media_type_param("text/html, application/json;x-api-version=\"2.1\"", "x-api-version"),
            Some("2.1".to_string())
        );
        assert_eq!(media_type_param("application/json", "x-api-version"), None);
    }

    #[test]
    fn segment_resolution_rewrites_shorthand() {
        let p = policy(&[(2, 1, false)]);
        let (version, rewritten) = resolve_from_segment(&p, "/v2/orders/7", "v2").unwrap();
        assert_eq!(version, ApiVersion::new(2, 1));
        assert_eq!(rewritten.unwrap(), "/v2.1.0/orders/7");
    }

    #[test]
    fn canonical_segment_needs_no_rewrite() {
        let p = policy(&[(2, 1, false)]);
        let (_, rewritten) = resolve_from_segment(&p, "/v2.1.0/orders", "v2.1.0").unwrap();
        assert!(rewritten.is_none());
    }

    #[test]
    fn headerless_request_gets_default_prefix() {
        let p = policy(&[(1, 0, false), (2, 0, false)]);
        let headers = HeaderMap::new();
        let (version, rewritten) = resolve_from_headers(&p, "/orders", &headers).unwrap();
        assert_eq!(version, ApiVersion::DEFAULT);
        assert_eq!(rewritten.unwrap(), "/v1.0.0/orders");
    }

    #[test]
    fn replace_path_keeps_query() {
        let uri: Uri = "/orders?page=2".parse().unwrap();
        let replaced = replace_path(&uri, "/v1.0.0/orders").unwrap();
        assert_eq!(replaced.path(), "/v1.0.0/orders");
        assert_eq!(replaced.query(), Some("page=2"));
    }
}
