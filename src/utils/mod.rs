//! Helper functions shared across layers.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`target_url`] - Target URL normalization
//! - [`short_url`] - Short-link and QR-code URL construction

pub mod code_generator;
pub mod short_url;
pub mod target_url;
