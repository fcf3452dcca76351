//! Application layer services implementing business logic.
//!
//! Services consume the repository and cache traits and give HTTP handlers
//! and the admin CLI a single entry point per use case.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, listing and deletion
//! - [`services::redirect_service::RedirectService`] - Code resolution and click hand-off
//! - [`services::auth_service::AuthService`] - Admin token verification
//! - [`services::domain_check_service::DomainCheckService`] - Periodic domain DNS check

pub mod services;
