//! Shared application state.

use std::sync::Arc;

use crate::application::services::{AuthService, DomainCheckService, LinkService, RedirectService};
use crate::infrastructure::cache::CacheService;

/// Services shared by every handler through axum's `State` extractor.
///
/// Built once at startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
    /// `None` when domain checks are disabled.
    pub domain_check: Option<Arc<DomainCheckService>>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        redirect_service: Arc<RedirectService>,
        auth_service: Arc<AuthService>,
        cache: Arc<dyn CacheService>,
        domain_check: Option<Arc<DomainCheckService>>,
    ) -> Self {
        Self {
            link_service,
            redirect_service,
            auth_service,
            cache,
            domain_check,
        }
    }
}
