//! # Built-in Routes
//!
//! Routes the pipeline mounts outside the versioned API surface:
//!
//! - `health` — unauthenticated liveness/readiness probes.
//! - `meta` — the machine-readable version report at `/versions`.

pub mod health;
pub mod meta;
