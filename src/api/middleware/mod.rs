//! HTTP middleware: admin authentication, public rate limiting and request
//! tracing.

pub mod auth;
pub mod rate_limit;
pub mod tracing;
