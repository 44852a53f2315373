//! # Documentation UI
//!
//! Two documentation surfaces sit on top of the explorer's per-version
//! documents:
//!
//! - `GET /docs` — a Swagger UI shell whose version picker lists every
//!   published document, newest first, with deprecated versions labeled
//!   ` (DEPRECATED)`;
//! - `GET /reference` — the alternate minimal surface: a Scalar reference
//!   page for the newest document.
//!
//! Both routers are stateless; the documents are captured at assembly time.

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use utoipa_scalar::{Scalar, Servable};

use crate::openapi::ApiExplorer;

/// Router serving the Swagger UI shell at `/docs` and every version's
/// document beneath it.
pub fn router(explorer: &ApiExplorer) -> Router {
    let page = swagger_page(explorer);
    Router::new()
        .route("/docs", get(move || async move { Html(page) }))
        .merge(explorer.router())
}

/// Router serving the Scalar reference page for the newest document.
pub fn scalar_router(explorer: &ApiExplorer) -> Router {
    Router::new().merge(Scalar::with_url("/reference", explorer.newest().document.clone()))
}

/// Render the Swagger UI shell. The `urls` entries drive the version picker;
/// the first entry is preselected, so newest comes first.
fn swagger_page(explorer: &ApiExplorer) -> String {
    let urls: Vec<serde_json::Value> = explorer
        .newest_first()
        .map(|doc| {
            serde_json::json!({
                "url": doc.document_path(),
                "name": doc.display_label(),
            })
        })
        .collect();
    let urls = serde_json::to_string(&urls).unwrap_or_else(|_| "[]".to_string());
    let title = &explorer.newest().document.info.title;

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>{title}</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
  <script>
    window.onload = () => {{
      SwaggerUIBundle({{
        urls: {urls},
        dom_id: "#swagger-ui",
        presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
        layout: "StandaloneLayout",
      }});
    }};
  </script>
</body>
</html>
"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ApiModule, ModuleRegistry};
    use keel_core::ApiVersion;
    use utoipa::openapi::OpenApiBuilder;

    fn explorer() -> ApiExplorer {
        let mut registry = ModuleRegistry::new();
        registry
            .register(
                ApiModule::new(
                    "orders",
                    ApiVersion::new(1, 0),
                    Router::new(),
                    OpenApiBuilder::new().build(),
                )
                .deprecated(),
            )
            .register(ApiModule::new(
                "orders",
                ApiVersion::new(2, 0),
                Router::new(),
                OpenApiBuilder::new().build(),
            ));
        ApiExplorer::from_registry(&registry, "Keel API")
    }

    #[test]
    fn page_lists_versions_newest_first() {
        let page = swagger_page(&explorer());
        let v2 = page.find("V2.0.0").expect("v2 listed");
        let v1 = page.find("V1.0.0").expect("v1 listed");
        assert!(v2 < v1, "newest version must come first");
    }

    #[test]
    fn page_marks_deprecated_versions() {
        let page = swagger_page(&explorer());
        assert!(page.contains("V1.0.0 (DEPRECATED)"));
        assert!(!page.contains("V2.0.0 (DEPRECATED)"));
    }

    #[test]
    fn page_links_document_paths() {
        let page = swagger_page(&explorer());
        assert!(page.contains("/docs/v1.0.0/openapi.json"));
        assert!(page.contains("/docs/v2.0.0/openapi.json"));
    }
}
