//! # keel-core — Foundation Types for the Keel API Layer
//!
//! Framework-free building blocks shared by the API bootstrap crate and by
//! feature crates that contribute API modules:
//!
//! - [`version`] — the [`ApiVersion`](version::ApiVersion) value type with
//!   lenient parsing and the canonical `v<major>.<minor>.<patch>` group name
//!   used for OpenAPI document grouping.
//! - [`casing`] — route-segment case conversion (kebab-case) and schema-name
//!   humanization.
//!
//! Nothing in this crate touches HTTP; it exists so feature crates can name
//! versions and route segments without depending on the web stack.

pub mod casing;
pub mod version;

pub use casing::{humanize, kebab_case};
pub use version::{ApiVersion, VersionError};
