//! In-process link repository.
//!
//! Useful for local development (`STORAGE_BACKEND=memory`) and tests. Data
//! lives only as long as the process.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::json;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::domain::entities::{Link, LinkOrder, NewLink, SortColumn, SortDirection};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    next_id: i64,
    links: BTreeMap<i64, Link>,
    codes: HashMap<String, i64>,
}

/// Link store held in memory behind a single read-write lock.
///
/// Writes, including click increments, take the write lock, so every
/// mutation is atomic with respect to the others.
#[derive(Default)]
pub struct MemoryLinkRepository {
    tables: RwLock<Tables>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed link, bypassing validation.
    ///
    /// Returns `false` and leaves the store untouched if the id or the code
    /// is already taken.
    pub fn insert_raw(&self, link: Link) -> bool {
        let mut tables = self.tables.write();
        if tables.links.contains_key(&link.id) || tables.codes.contains_key(&link.short_code) {
            return false;
        }
        tables.next_id = tables.next_id.max(link.id);
        tables.codes.insert(link.short_code.clone(), link.id);
        tables.links.insert(link.id, link);
        true
    }
}

fn compare(a: &Link, b: &Link, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Title => a.title.cmp(&b.title),
        SortColumn::ShortCode => a.short_code.cmp(&b.short_code),
        SortColumn::TargetUrl => a.target_url.cmp(&b.target_url),
        SortColumn::Clicks => a.clicks.cmp(&b.clicks),
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tables = self.tables.write();

        if tables.codes.contains_key(&new_link.short_code) {
            return Err(AppError::conflict(
                "Short code already in use",
                json!({ "code": new_link.short_code }),
            ));
        }

        tables.next_id += 1;
        let link = Link::new(
            tables.next_id,
            new_link.title,
            new_link.target_url,
            new_link.short_code,
            Utc::now(),
            0,
        );

        tables.codes.insert(link.short_code.clone(), link.id);
        tables.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .codes
            .get(code)
            .and_then(|id| tables.links.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self.tables.read().links.get(&id).cloned())
    }

    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write();
        match tables.links.get_mut(&id) {
            Some(link) => {
                link.clicks += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, order: LinkOrder) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self.tables.read().links.values().cloned().collect();

        links.sort_by(|a, b| {
            let primary = match order.direction {
                SortDirection::Asc => compare(a, b, order.column),
                SortDirection::Desc => compare(b, a, order.column),
            };
            primary.then_with(|| b.id.cmp(&a.id))
        });

        Ok(links)
    }

    async fn delete(&self, id: i64) -> Result<Option<Link>, AppError> {
        let mut tables = self.tables.write();
        let removed = tables.links.remove(&id);
        if let Some(link) = &removed {
            tables.codes.remove(&link.short_code);
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.read().links.len() as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
