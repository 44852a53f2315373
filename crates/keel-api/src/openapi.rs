//! # Versioned OpenAPI Document Explorer
//!
//! Assembles one OpenAPI document per published API version from the module
//! fragments in the registry. Each module's path keys are rewritten under its
//! mount path (`/{group}/{module-name}`), so documents advertise the exact
//! URLs the pipeline serves, version segment included.
//!
//! Four document filters run over every assembled document, in order:
//!
//! 1. [`DescribeSchemas`] — component schemas missing a description get one
//!    humanized from the schema name.
//! 2. [`VersionHeaderParam`] — every operation declares the optional
//!    `x-api-version` header parameter.
//! 3. [`InlineEnums`] — enum component schemas are inlined at each reference
//!    site and dropped from the components table.
//! 4. [`OrderTags`] — document tags are sorted by name; tags used by
//!    operations but never declared are synthesized first so the ordering is
//!    total.
//!
//! Documents are served at `GET /docs/{group}/openapi.json`.

use std::collections::BTreeMap;

use axum::routing::get;
use axum::{Json, Router};
use keel_core::{humanize, ApiVersion};
use utoipa::openapi::schema::{ObjectBuilder, SchemaType};
use utoipa::openapi::tag::{Tag, TagBuilder};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder, Ref, RefOr, Required, Schema};
use utoipa::openapi::path::{ParameterBuilder, ParameterIn};
use utoipa::Modify;

use crate::registry::ModuleRegistry;
use crate::versioning::VERSION_HEADER;

/// One assembled document for one published version.
#[derive(Debug, Clone)]
pub struct VersionedDoc {
    pub version: ApiVersion,
    pub deprecated: bool,
    /// The group name: `v<major>.<minor>.<patch>`.
    pub group: String,
    pub document: OpenApi,
}

impl VersionedDoc {
    /// Relative path this document is served at.
    pub fn document_path(&self) -> String {
        format!("/docs/{}/openapi.json", self.group)
    }

    /// Display label for the documentation UI: uppercased group name with
    /// the deprecation suffix where it applies.
    pub fn display_label(&self) -> String {
        let suffix = if self.deprecated { " (DEPRECATED)" } else { "" };
        format!("{}{}", self.group.to_uppercase(), suffix)
    }
}

/// Enumerates every published API version with its assembled document.
#[derive(Debug, Clone)]
pub struct ApiExplorer {
    docs: Vec<VersionedDoc>,
}

impl ApiExplorer {
    /// Assemble one document per version from the registered modules.
    ///
    /// An empty registry still yields a document for the default version so
    /// the documentation surface is never empty.
    pub fn from_registry(registry: &ModuleRegistry, title: &str) -> Self {
        let mut versions = registry.versions();
        if versions.is_empty() {
            versions.push(ApiVersion::DEFAULT);
        }

        let docs = versions
            .into_iter()
            .map(|version| {
                let mut document = OpenApiBuilder::new()
                    .info(
                        InfoBuilder::new()
                            .title(title)
                            .version(version.to_string())
                            .build(),
                    )
                    .build();

                for module in registry.modules().iter().filter(|m| m.version() == version) {
                    let fragment = prefixed(module.openapi().clone(), &module.mount_path());
                    document.merge(fragment);
                }

                DescribeSchemas.modify(&mut document);
                VersionHeaderParam.modify(&mut document);
                InlineEnums.modify(&mut document);
                OrderTags.modify(&mut document);

                VersionedDoc {
                    version,
                    deprecated: registry.is_version_deprecated(version),
                    group: version.group_name(),
                    document,
                }
            })
            .collect();

        Self { docs }
    }

    /// Documents in ascending version order.
    pub fn docs(&self) -> &[VersionedDoc] {
        &self.docs
    }

    /// Documents newest first — the order the documentation UI lists them.
    pub fn newest_first(&self) -> impl Iterator<Item = &VersionedDoc> {
        self.docs.iter().rev()
    }

    /// The newest published document.
    pub fn newest(&self) -> &VersionedDoc {
        self.docs.last().expect("explorer always holds at least one document")
    }

    /// Router serving every document at `/docs/{group}/openapi.json`.
    pub fn router(&self) -> Router {
        let mut router = Router::new();
        for doc in &self.docs {
            let document = doc.document.clone();
            router = router.route(
                &doc.document_path(),
                get(move || async move { Json(document) }),
            );
        }
        router
    }
}

/// Rewrite every path key of `doc` under `prefix`. A bare `/` path collapses
/// onto the prefix itself.
fn prefixed(mut doc: OpenApi, prefix: &str) -> OpenApi {
    let old = std::mem::take(&mut doc.paths.paths);
    for (path, item) in old {
        let key = if path == "/" {
            prefix.to_string()
        } else {
            format!("{prefix}{path}")
        };
        doc.paths.paths.insert(key, item);
    }
    doc
}

/// Schema description enrichment: components missing a description get one
/// humanized from their name (`OrderLine` → "Order line").
pub struct DescribeSchemas;

impl Modify for DescribeSchemas {
    fn modify(&self, openapi: &mut OpenApi) {
        let Some(components) = openapi.components.as_mut() else {
            return;
        };
        for (name, schema) in components.schemas.iter_mut() {
            if let RefOr::T(Schema::Object(object)) = schema {
                if object.description.is_none() {
                    object.description = Some(humanize(name));
                }
            }
        }
    }
}

/// Declares the `x-api-version` header parameter on every operation so the
/// negotiation surface is visible in the documents.
pub struct VersionHeaderParam;

impl Modify for VersionHeaderParam {
    fn modify(&self, openapi: &mut OpenApi) {
        for path_item in openapi.paths.paths.values_mut() {
            for operation in path_item.operations.values_mut() {
                let parameters = operation.parameters.get_or_insert_with(Vec::new);
                if parameters.iter().any(|p| p.name == VERSION_HEADER) {
                    continue;
                }
                parameters.push(
                    ParameterBuilder::new()
                        .name(VERSION_HEADER)
                        .parameter_in(ParameterIn::Header)
                        .required(Required::False)
                        .description(Some(
                            "API version indicator; overridden by a version segment in the URL.",
                        ))
                        .schema(Some(RefOr::T(Schema::Object(
                            ObjectBuilder::new().schema_type(SchemaType::String).build(),
                        ))))
                        .build(),
                );
            }
        }
    }
}

/// Inlines enum component schemas at every reference site and removes them
/// from the components table.
pub struct InlineEnums;

impl Modify for InlineEnums {
    fn modify(&self, openapi: &mut OpenApi) {
        let Some(components) = openapi.components.as_mut() else {
            return;
        };

        let enums: BTreeMap<String, Schema> = components
            .schemas
            .iter()
            .filter_map(|(name, schema)| match schema {
                RefOr::T(inner) if is_enum(inner) => Some((name.clone(), inner.clone())),
                _ => None,
            })
            .collect();
        if enums.is_empty() {
            return;
        }

        for (name, schema) in components.schemas.iter_mut() {
            if !enums.contains_key(name) {
                inline_ref_or(schema, &enums);
            }
        }
        components.schemas.retain(|name, _| !enums.contains_key(name));

        for path_item in openapi.paths.paths.values_mut() {
            for operation in path_item.operations.values_mut() {
                if let Some(parameters) = operation.parameters.as_mut() {
                    for parameter in parameters {
                        if let Some(schema) = parameter.schema.as_mut() {
                            inline_ref_or(schema, &enums);
                        }
                    }
                }
                if let Some(body) = operation.request_body.as_mut() {
                    for content in body.content.values_mut() {
                        inline_ref_or(&mut content.schema, &enums);
                    }
                }
                for response in operation.responses.responses.values_mut() {
                    if let RefOr::T(response) = response {
                        for content in response.content.values_mut() {
                            inline_ref_or(&mut content.schema, &enums);
                        }
                    }
                }
            }
        }
    }
}

fn is_enum(schema: &Schema) -> bool {
    matches!(schema, Schema::Object(object) if object.enum_values.is_some())
}

fn inline_ref_or(node: &mut RefOr<Schema>, enums: &BTreeMap<String, Schema>) {
    match node {
        RefOr::Ref(reference) => {
            let name = schema_name(reference);
            if let Some(inlined) = enums.get(name) {
                *node = RefOr::T(inlined.clone());
            }
        }
        RefOr::T(schema) => inline_in_schema(schema, enums),
    }
}

fn inline_in_schema(schema: &mut Schema, enums: &BTreeMap<String, Schema>) {
    match schema {
        Schema::Object(object) => {
            for property in object.properties.values_mut() {
                inline_ref_or(property, enums);
            }
        }
        Schema::Array(array) => inline_ref_or(&mut array.items, enums),
        Schema::OneOf(one_of) => {
            for item in &mut one_of.items {
                inline_ref_or(item, enums);
            }
        }
        Schema::AllOf(all_of) => {
            for item in &mut all_of.items {
                inline_ref_or(item, enums);
            }
        }
        _ => {}
    }
}

fn schema_name(reference: &Ref) -> &str {
    reference
        .ref_location
        .rsplit('/')
        .next()
        .unwrap_or(reference.ref_location.as_str())
}

/// Sorts document tags by name, synthesizing declarations for tags that
/// operations use without declaring.
pub struct OrderTags;

impl Modify for OrderTags {
    fn modify(&self, openapi: &mut OpenApi) {
        let mut tags: Vec<Tag> = openapi.tags.take().unwrap_or_default();

        for path_item in openapi.paths.paths.values() {
            for operation in path_item.operations.values() {
                for used in operation.tags.iter().flatten() {
                    if !tags.iter().any(|t| &t.name == used) {
                        tags.push(TagBuilder::new().name(used.clone()).build());
                    }
                }
            }
        }

        if tags.is_empty() {
            return;
        }
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        openapi.tags = Some(tags);
    }
}
