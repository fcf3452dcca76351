//! HTTP server initialization and runtime setup.
//!
//! Handles store and cache selection, background tasks, and the Axum server
//! lifecycle.

use crate::api::middleware::rate_limit::RateLimit;
use crate::application::services::{AuthService, DomainCheckService, LinkService, RedirectService};
use crate::config::{CacheBackend, Config, StorageBackend};
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::LinkRepository;
use crate::domain::reserved_paths::ReservedPaths;
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::dns::SystemResolver;
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::short_url::ShortUrlBuilder;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// How long shutdown waits for queued clicks to be applied.
const CLICK_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store (PostgreSQL with migrations, or in-memory)
/// - Lookup cache (Redis, in-process, or disabled)
/// - Background click worker
/// - Periodic domain check
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = connect_store(&config).await?;
    let cache = connect_cache(&config).await;
    let reserved = ReservedPaths::new(&config.reserved_prefixes);
    tracing::info!(prefixes = ?reserved.prefixes(), "Reserved path prefixes");

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        repository.clone(),
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let link_service = Arc::new(LinkService::new(
        repository.clone(),
        cache.clone(),
        reserved.clone(),
        ShortUrlBuilder::new(&config.base_url, &config.qr_service_url),
    ));
    let redirect_service = Arc::new(RedirectService::new(
        repository,
        cache.clone(),
        reserved,
        click_tx,
    ));
    let auth_service = Arc::new(
        AuthService::new(&config.token_signing_secret, config.admin_token_hash.as_deref())
            .context("ADMIN_TOKEN_HASH must be hex")?,
    );
    if !auth_service.is_configured() {
        tracing::warn!("ADMIN_TOKEN_HASH is not set, admin API will reject every request");
    }

    let domain_check = start_domain_check(&config)?;

    let state = AppState::new(
        link_service,
        redirect_service,
        auth_service,
        cache,
        domain_check.as_ref().map(|(svc, _)| svc.clone()),
    );

    let rate_limit = RateLimit::new(config.rate_limit_per_second, config.rate_limit_burst);
    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state, rate_limit));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some((_, handle)) = domain_check {
        handle.abort();
    }

    // The server owned the last click sender; the worker drains and exits.
    match tokio::time::timeout(CLICK_DRAIN_TIMEOUT, worker).await {
        Ok(_) => tracing::info!("Click queue drained"),
        Err(_) => tracing::warn!("Timed out draining click queue"),
    }

    Ok(())
}

/// Opens the configured link store.
///
/// For PostgreSQL this also applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory link store, data is lost on restart");
            Ok(Arc::new(MemoryLinkRepository::new()))
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");

            Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
        }
    }
}

/// Opens the configured cache. An unreachable Redis disables caching
/// instead of failing startup.
pub async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let ttl = Duration::from_secs(config.cache_ttl_seconds);

    match (config.cache_backend, &config.redis_url) {
        (CacheBackend::Redis, Some(redis_url)) => match RedisCache::connect(redis_url, ttl).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {e}. Using NullCache.");
                Arc::new(NullCache::new())
            }
        },
        (CacheBackend::Memory, _) => {
            tracing::info!(capacity = config.cache_capacity, "Cache enabled (in-process)");
            Arc::new(MemoryCache::new(config.cache_capacity, ttl))
        }
        _ => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    }
}

type DomainCheckTask = (Arc<DomainCheckService>, tokio::task::JoinHandle<()>);

fn start_domain_check(config: &Config) -> Result<Option<DomainCheckTask>> {
    if config.domain_check_interval_seconds == 0 {
        tracing::info!("Domain check disabled");
        return Ok(None);
    }

    let service = Arc::new(DomainCheckService::new(
        Arc::new(SystemResolver),
        config.public_domain()?,
        config.domain_check_expected_ip,
    ));
    let handle = tokio::spawn(
        service
            .clone()
            .run(Duration::from_secs(config.domain_check_interval_seconds)),
    );
    tracing::info!(domain = %service.domain(), "Domain check started");

    Ok(Some((service, handle)))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
