//! Crate version reporting.
//!
//! Certificate-type UUID tables and CLI tooling are intentionally out of this crate's scope (see
//! the top-level crate docs); this module only reports the crate's own semver for callers that
//! want to embed it in diagnostics or logs.

/// The crate's version string, as set by Cargo at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
