//! k8s-demo-rs library - diagnostic HTTP server for container platforms.
//!
//! Serves a handful of diagnostic endpoints under a configurable path prefix:
//! liveness, version, a persisted counter, a secret-gated page, environment
//! templates, a URL listing, and deliberate crash/quit triggers.

pub mod cli;
pub mod colors;
pub mod config;
pub mod counter;
pub mod env;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod listing;
pub mod logging;
pub mod middleware;
pub mod routing;
pub mod secret;
pub mod state;
pub mod template;
