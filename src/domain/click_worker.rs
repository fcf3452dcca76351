//! Background worker applying click increments.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Consumes click events until every sender is dropped.
///
/// At most `concurrency` increments run at once. Each increment is a single
/// atomic store update, so parallel events for the same link never lose
/// counts. Failures are logged and swallowed.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn LinkRepository>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tasks.spawn(async move {
            apply_click(repository.as_ref(), &event).await;
            drop(permit);
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    info!("Click worker stopped");
}

/// Applies one click increment, logging instead of returning failures.
pub async fn apply_click(repository: &dyn LinkRepository, event: &ClickEvent) {
    match repository.increment_clicks(event.link_id).await {
        Ok(true) => debug!(link_id = event.link_id, code = %event.code, "Click recorded"),
        Ok(false) => {
            warn!(link_id = event.link_id, code = %event.code, "Click for a link that no longer exists");
        }
        Err(e) => {
            metrics::counter!("shortifyme_click_failures_total").increment(1);
            error!(link_id = event.link_id, code = %event.code, error = %e, "Failed to record click");
        }
    }
}
