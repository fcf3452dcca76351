//! Short code resolution for the redirect path.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::apply_click;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::domain::reserved_paths::ReservedPaths;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::is_valid_code;

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path names a stored link.
    Found(Link),
    /// The path is not a short code at all (empty, reserved, bad shape).
    Declined,
    /// The path looks like a code but no link exists, or the store failed.
    NotFound,
}

/// Resolves paths to links through the cache and store, and hands clicks
/// off to the background worker.
pub struct RedirectService {
    repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    reserved: ReservedPaths,
    click_tx: mpsc::Sender<ClickEvent>,
}

impl RedirectService {
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        reserved: ReservedPaths,
        click_tx: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            repository,
            cache,
            reserved,
            click_tx,
        }
    }

    /// Resolves a raw request path.
    ///
    /// Leading and trailing slashes are ignored. The cache is consulted
    /// first; a store hit repopulates it. Store errors are logged and
    /// reported as [`Resolution::NotFound`].
    pub async fn resolve(&self, path: &str) -> Resolution {
        let code = path.trim_matches('/');

        if code.is_empty() || self.reserved.is_reserved(code) || !is_valid_code(code) {
            metrics::counter!("shortifyme_redirects_total", "outcome" => "declined").increment(1);
            return Resolution::Declined;
        }

        match self.cache.get_link(code).await {
            Ok(Some(link)) => {
                metrics::counter!("shortifyme_cache_hits_total").increment(1);
                metrics::counter!("shortifyme_redirects_total", "outcome" => "found").increment(1);
                return Resolution::Found(link);
            }
            Ok(None) => {
                metrics::counter!("shortifyme_cache_misses_total").increment(1);
            }
            Err(e) => {
                metrics::counter!("shortifyme_cache_misses_total").increment(1);
                warn!(code, error = %e, "Cache lookup failed");
            }
        }

        match self.repository.find_by_code(code).await {
            Ok(Some(link)) => {
                if let Err(e) = self.cache.set_link(code, &link, None).await {
                    warn!(code, error = %e, "Cache fill failed");
                }
                metrics::counter!("shortifyme_redirects_total", "outcome" => "found").increment(1);
                Resolution::Found(link)
            }
            Ok(None) => {
                metrics::counter!("shortifyme_redirects_total", "outcome" => "not_found").increment(1);
                Resolution::NotFound
            }
            Err(e) => {
                metrics::counter!("shortifyme_redirects_total", "outcome" => "error").increment(1);
                error!(code, error = %e, "Link lookup failed");
                Resolution::NotFound
            }
        }
    }

    /// Queues a click for `link` without waiting for it to be applied.
    ///
    /// When the queue is full the increment runs on a detached task. A closed
    /// queue means shutdown; the click is logged and dropped.
    pub fn record_click(&self, link: &Link) {
        let event = ClickEvent::new(link.id, link.short_code.clone());

        match self.click_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!(link_id = event.link_id, "Click queue full, applying directly");
                let repository = self.repository.clone();
                tokio::spawn(async move {
                    apply_click(repository.as_ref(), &event).await;
                });
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("shortifyme_click_failures_total").increment(1);
                error!(link_id = event.link_id, code = %event.code, "Click queue closed, click lost");
            }
        }
    }

    /// Pending events and total capacity of the click queue.
    pub fn click_queue_status(&self) -> (usize, usize) {
        let capacity = self.click_tx.max_capacity();
        (capacity - self.click_tx.capacity(), capacity)
    }

    pub fn click_queue_closed(&self) -> bool {
        self.click_tx.is_closed()
    }
}
