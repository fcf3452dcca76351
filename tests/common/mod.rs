#![allow(dead_code)]

use axum_test::TestServer;
use chrono::Utc;
use shortifyme::application::services::{AuthService, LinkService, RedirectService};
use shortifyme::domain::click_worker::run_click_worker;
use shortifyme::domain::entities::Link;
use shortifyme::domain::repositories::LinkRepository;
use shortifyme::domain::reserved_paths::ReservedPaths;
use shortifyme::infrastructure::cache::{CacheService, MemoryCache};
use shortifyme::infrastructure::persistence::MemoryLinkRepository;
use shortifyme::routes::app_router;
use shortifyme::state::AppState;
use shortifyme::utils::short_url::{DEFAULT_QR_SERVICE_URL, ShortUrlBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "https://s.example.com";
pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const ADMIN_TOKEN: &str = "test-admin-token";

pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<MemoryLinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub state: AppState,
}

impl TestApp {
    pub fn bearer(&self) -> String {
        format!("Bearer {ADMIN_TOKEN}")
    }
}

/// Builds state over an in-memory store with a running click worker.
/// Must be called inside a tokio runtime.
pub fn create_test_state(repo: Arc<MemoryLinkRepository>, cache: Arc<dyn CacheService>) -> AppState {
    let repository: Arc<dyn LinkRepository> = repo;
    let reserved = ReservedPaths::default();

    let (tx, rx) = mpsc::channel(100);
    tokio::spawn(run_click_worker(rx, repository.clone(), 4));

    let link_service = Arc::new(LinkService::new(
        repository.clone(),
        cache.clone(),
        reserved.clone(),
        ShortUrlBuilder::new(BASE_URL, DEFAULT_QR_SERVICE_URL),
    ));
    let redirect_service = Arc::new(RedirectService::new(
        repository,
        cache.clone(),
        reserved,
        tx,
    ));

    let hash = AuthService::new(SIGNING_SECRET, None)
        .unwrap()
        .hash_token(ADMIN_TOKEN);
    let auth_service = Arc::new(AuthService::new(SIGNING_SECRET, Some(&hash)).unwrap());

    AppState::new(link_service, redirect_service, auth_service, cache, None)
}

pub fn test_app_with_cache(cache: Arc<dyn CacheService>) -> TestApp {
    let repo = Arc::new(MemoryLinkRepository::new());
    let state = create_test_state(repo.clone(), cache.clone());
    let server = TestServer::new(app_router(state.clone(), None)).unwrap();

    TestApp {
        server,
        repo,
        cache,
        state,
    }
}

pub fn test_app() -> TestApp {
    test_app_with_cache(Arc::new(MemoryCache::new(1_000, Duration::from_secs(60))))
}

/// Inserts a link directly into the store, bypassing validation.
pub fn insert_link(repo: &MemoryLinkRepository, id: i64, code: &str, target: &str) -> Link {
    let link = Link::new(
        id,
        format!("Link {code}"),
        target.to_string(),
        code.to_string(),
        Utc::now(),
        0,
    );
    assert!(repo.insert_raw(link.clone()));
    link
}

/// Polls until the link's click counter reaches `expected` or a timeout passes.
pub async fn wait_for_clicks(repo: &MemoryLinkRepository, id: i64, expected: i64) -> i64 {
    let mut clicks = 0;
    for _ in 0..200 {
        clicks = repo
            .find_by_id(id)
            .await
            .unwrap()
            .map(|l| l.clicks)
            .unwrap_or_default();
        if clicks >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    clicks
}
