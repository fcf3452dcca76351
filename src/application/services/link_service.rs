//! Link creation, listing and deletion.

use std::sync::Arc;

use crate::domain::entities::{Link, LinkOrder, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::domain::reserved_paths::ReservedPaths;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::short_url::ShortUrlBuilder;
use crate::utils::target_url::normalize_target_url;
use serde_json::json;
use tracing::{info, warn};

/// Attempts at finding a free generated code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Longest accepted title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Service for creating and managing short links.
///
/// Owns input validation, target URL normalization, slug generation with
/// bounded retry, and cache invalidation on writes.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    reserved: ReservedPaths,
    urls: ShortUrlBuilder,
}

impl LinkService {
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        reserved: ReservedPaths,
        urls: ShortUrlBuilder,
    ) -> Self {
        Self {
            repository,
            cache,
            reserved,
            urls,
        }
    }

    /// Creates a link with an explicit or generated short code.
    ///
    /// # Code selection
    ///
    /// - `slug` given: validated, then inserted once. A taken slug is a conflict.
    /// - no slug: a random 6-character code is generated. Collisions and codes
    ///   falling under a reserved prefix are retried up to
    ///   [`MAX_CODE_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a blank/overlong title, a bad URL or slug
    /// - [`AppError::Conflict`] if the slug is already in use
    /// - [`AppError::CodeGenerationExhausted`] if no free code was found
    /// - [`AppError::Internal`] on storage errors
    pub async fn create(
        &self,
        title: &str,
        target_url: &str,
        slug: Option<&str>,
    ) -> Result<Link, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::bad_request(
                "Title is required",
                json!({ "field": "title" }),
            ));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(AppError::bad_request(
                "Title is too long",
                json!({ "field": "title", "max_length": MAX_TITLE_LENGTH }),
            ));
        }

        let target_url = normalize_target_url(target_url).map_err(|e| {
            AppError::bad_request(
                "Invalid URL",
                json!({ "field": "url", "reason": e.to_string() }),
            )
        })?;

        let link = match slug.map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => {
                validate_custom_code(slug, &self.reserved)?;
                self.repository
                    .create(NewLink {
                        title: title.to_string(),
                        target_url,
                        short_code: slug.to_string(),
                    })
                    .await?
            }
            None => self.create_with_generated_code(title, target_url).await?,
        };

        if let Err(e) = self.cache.invalidate(&link.short_code).await {
            warn!(code = %link.short_code, error = %e, "Cache invalidation failed");
        }

        info!(id = link.id, code = %link.short_code, "Link created");
        Ok(link)
    }

    async fn create_with_generated_code(
        &self,
        title: &str,
        target_url: String,
    ) -> Result<Link, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code();

            if self.reserved.is_reserved(&code) {
                continue;
            }

            let new_link = NewLink {
                title: title.to_string(),
                target_url: target_url.clone(),
                short_code: code,
            };

            match self.repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, "Generated code collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        metrics::counter!("shortifyme_code_generation_exhausted_total").increment(1);
        Err(AppError::code_generation_exhausted(
            "Could not generate a unique short code, try again",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Fetches a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn get_by_code(&self, code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Fetches a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get(&self, id: i64) -> Result<Link, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Lists every link. Unknown sort columns fall back to newest first.
    pub async fn list(&self, sort: Option<&str>, dir: Option<&str>) -> Result<Vec<Link>, AppError> {
        self.repository.list(LinkOrder::from_params(sort, dir)).await
    }

    /// Deletes a link by id and drops its cache entry.
    ///
    /// Returns whether a link was removed. Deleting a missing id is a no-op.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let Some(removed) = self.repository.delete(id).await? else {
            return Ok(false);
        };

        if let Err(e) = self.cache.invalidate(&removed.short_code).await {
            warn!(code = %removed.short_code, error = %e, "Cache invalidation failed");
        }

        info!(id, code = %removed.short_code, "Link deleted");
        Ok(true)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await
    }

    pub fn short_url(&self, code: &str) -> String {
        self.urls.short_url(code)
    }

    pub fn qr_code_url(&self, short_url: &str) -> String {
        self.urls.qr_code_url(short_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{MemoryCache, NullCache};
    use crate::utils::short_url::DEFAULT_QR_SERVICE_URL;
    use chrono::Utc;
    use std::time::Duration;

    fn link_from(id: i64, new_link: &NewLink) -> Link {
        Link::new(
            id,
            new_link.title.clone(),
            new_link.target_url.clone(),
            new_link.short_code.clone(),
            Utc::now(),
            0,
        )
    }

    fn service_with(repo: MockLinkRepository, cache: Arc<dyn CacheService>) -> LinkService {
        LinkService::new(
            Arc::new(repo),
            cache,
            ReservedPaths::default(),
            ShortUrlBuilder::new("https://s.example.com", DEFAULT_QR_SERVICE_URL),
        )
    }

    fn service(repo: MockLinkRepository) -> LinkService {
        service_with(repo, Arc::new(NullCache))
    }

    #[tokio::test]
    async fn test_create_with_slug() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|n| n.short_code == "spring" && n.title == "Spring Sale")
            .times(1)
            .returning(|n| Ok(link_from(1, &n)));

        let link = service(repo)
            .create("  Spring Sale ", "https://example.com/x", Some("spring"))
            .await
            .unwrap();

        assert_eq!(link.short_code, "spring");
        assert_eq!(link.title, "Spring Sale");
    }

    #[tokio::test]
    async fn test_create_normalizes_target_url() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|n| n.target_url == "https://example.com/Path")
            .times(1)
            .returning(|n| Ok(link_from(1, &n)));

        let result = service(repo)
            .create("t", "HTTPS://Example.COM:443/Path#frag", None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_generates_six_char_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|n| n.short_code.len() == 6)
            .times(1)
            .returning(|n| Ok(link_from(1, &n)));

        let link = service(repo).create("t", "https://example.com", None).await.unwrap();
        assert!(link.short_code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_create_blank_slug_is_generated() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|n| n.short_code.len() == 6)
            .times(1)
            .returning(|n| Ok(link_from(1, &n)));

        assert!(service(repo).create("t", "https://example.com", Some("  ")).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create().times(0);

        let err = service(repo).create("   ", "https://example.com", None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create().times(0);

        let svc = service(repo);
        for url in ["", "not-a-url", "javascript:alert(1)"] {
            let err = svc.create("t", url, None).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }), "{url}");
        }
    }

    #[tokio::test]
    async fn test_create_rejects_reserved_slug() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create().times(0);

        let err = service(repo)
            .create("t", "https://example.com", Some("admin-login"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_slug_conflict_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::conflict("Short code already in use", json!({}))));

        let err = service(repo)
            .create("t", "https://example.com", Some("taken"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_retries_after_collision() {
        let mut repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_create()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("Short code already in use", json!({}))));
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|n| Ok(link_from(9, &n)));

        let link = service(repo).create("t", "https://example.com", None).await.unwrap();
        assert_eq!(link.id, 9);
    }

    #[tokio::test]
    async fn test_create_exhausted_after_five_collisions() {
        let mut repo = MockLinkRepository::new();
        // A generated code under a reserved prefix skips the insert, so the
        // store sees at most five attempts.
        repo.expect_create()
            .times(..=MAX_CODE_ATTEMPTS)
            .returning(|_| Err(AppError::conflict("Short code already in use", json!({}))));

        let err = service(repo).create("t", "https://example.com", None).await.unwrap_err();
        assert!(matches!(err, AppError::CodeGenerationExhausted { .. }));
    }

    #[tokio::test]
    async fn test_create_storage_error_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("Storage failure", json!({}))));

        let err = service(repo).create("t", "https://example.com", None).await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_create_invalidates_stale_cache_entry() {
        let cache = Arc::new(MemoryCache::new(100, Duration::from_secs(60)));
        let stale = Link::new(
            1,
            "old".to_string(),
            "https://old.example.com/".to_string(),
            "reused".to_string(),
            Utc::now(),
            4,
        );
        cache.set_link("reused", &stale, None).await.unwrap();

        let mut repo = MockLinkRepository::new();
        repo.expect_create().times(1).returning(|n| Ok(link_from(2, &n)));

        let svc = service_with(repo, cache.clone());
        svc.create("new", "https://new.example.com", Some("reused"))
            .await
            .unwrap();

        assert!(cache.get_link("reused").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_code_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let err = service(repo).get_by_code("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .withf(|id| *id == 42)
            .times(1)
            .returning(|_| Ok(None));

        let err = service(repo).get(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_falls_back_to_default_order() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list()
            .withf(|order| *order == LinkOrder::default())
            .times(1)
            .returning(|_| Ok(vec![]));

        let links = service(repo)
            .list(Some("title; DROP TABLE links"), Some("asc"))
            .await
            .unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete().times(1).returning(|_| Ok(None));

        assert!(!service(repo).delete(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() {
        let cache = Arc::new(MemoryCache::new(100, Duration::from_secs(60)));
        let link = Link::new(
            3,
            "t".to_string(),
            "https://example.com/".to_string(),
            "gone".to_string(),
            Utc::now(),
            0,
        );
        cache.set_link("gone", &link, None).await.unwrap();

        let mut repo = MockLinkRepository::new();
        let removed = link.clone();
        repo.expect_delete()
            .withf(|id| *id == 3)
            .times(1)
            .returning(move |_| Ok(Some(removed.clone())));

        let svc = service_with(repo, cache.clone());
        assert!(svc.delete(3).await.unwrap());
        assert!(cache.get_link("gone").await.unwrap().is_none());
    }

    #[test]
    fn test_short_and_qr_urls() {
        let svc = service(MockLinkRepository::new());
        let short = svc.short_url("abc");
        assert_eq!(short, "https://s.example.com/abc");
        assert!(svc.qr_code_url(&short).ends_with("&size=150"));
    }
}
