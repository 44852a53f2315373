//! # Middleware Stack
//!
//! Cross-cutting layers for the assembled pipeline:
//! - [`https_redirect`]: permanent redirect to HTTPS for forwarded plain-HTTP
//!   requests, applied outermost when enforcement is configured.
//! - [`auth`]: bearer-token authorization guarding the versioned API surface;
//!   documentation and health routes sit outside it.
//!
//! Request tracing uses `tower-http`'s `TraceLayer`, applied during pipeline
//! assembly in `lib.rs`.

pub mod auth;
pub mod https_redirect;
