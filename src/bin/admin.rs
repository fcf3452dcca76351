//! CLI administration tool for shortifyme.
//!
//! Manages links, issues admin tokens and runs database diagnostics without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue an admin token (prints the token and the ADMIN_TOKEN_HASH to configure)
//! cargo run --bin admin -- token create
//!
//! # Create, list and delete links
//! cargo run --bin admin -- link create --title "Docs" --url https://example.com/docs --slug docs
//! cargo run --bin admin -- link list --sort clicks --dir desc
//! cargo run --bin admin -- link show docs
//! cargo run --bin admin -- link delete 42
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`
//!   (link and db commands): PostgreSQL connection
//! - `TOKEN_SIGNING_SECRET` (token commands): HMAC key shared with the server
//! - `REDIS_URL` or `REDIS_*` (optional): invalidates cached links on create
//!   and delete, with `CACHE_TTL_SECONDS`
//! - `BASE_URL`, `QR_SERVICE_URL`, `RESERVED_PREFIXES` (optional): as for the server

use shortifyme::application::services::{AuthService, LinkService};
use shortifyme::config::Config;
use shortifyme::domain::reserved_paths::{DEFAULT_RESERVED_PREFIXES, ReservedPaths};
use shortifyme::infrastructure::cache::{CacheService, NullCache, RedisCache};
use shortifyme::infrastructure::persistence::PgLinkRepository;
use shortifyme::utils::short_url::{DEFAULT_QR_SERVICE_URL, ShortUrlBuilder};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for managing shortifyme.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Manage the admin API token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Create a short link
    Create {
        /// Link title (prompted if omitted)
        #[arg(short, long)]
        title: Option<String>,

        /// Target URL (prompted if omitted)
        #[arg(short, long)]
        url: Option<String>,

        /// Custom short code; generated if omitted
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// List links
    List {
        /// Sort column: title, short_code, target_url, clicks, created_at
        #[arg(long)]
        sort: Option<String>,

        /// Sort direction: asc or desc
        #[arg(long)]
        dir: Option<String>,
    },

    /// Show one link by short code
    Show { code: String },

    /// Delete a link by id
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Generate an admin token and its hash
    Create {
        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Token { action } => handle_token_action(action)?,
        Commands::Link { action } => {
            let pool = connect().await?;
            handle_link_action(action, pool).await?
        }
        Commands::Db { action } => {
            let pool = connect().await?;
            handle_db_action(action, &pool).await?
        }
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url()
        .context("DATABASE_URL or DB_USER/DB_PASSWORD/DB_NAME must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Builds the same link service the server uses, on the given pool.
async fn link_service(pool: PgPool) -> LinkService {
    let ttl = Duration::from_secs(Config::load_cache_ttl_seconds());
    let cache: Arc<dyn CacheService> = match Config::load_redis_url() {
        Some(url) => match RedisCache::connect(&url, ttl).await {
            Ok(redis) => Arc::new(redis),
            Err(e) => {
                println!("{} {}", "⚠️  Redis unavailable, cache not invalidated:".yellow(), e);
                Arc::new(NullCache::new())
            }
        },
        None => Arc::new(NullCache::new()),
    };

    let reserved = match std::env::var("RESERVED_PREFIXES") {
        Ok(list) => ReservedPaths::new(list.split(',')),
        Err(_) => ReservedPaths::new(DEFAULT_RESERVED_PREFIXES),
    };

    LinkService::new(
        Arc::new(PgLinkRepository::new(Arc::new(pool))),
        cache,
        reserved,
        ShortUrlBuilder::new(
            env_or("BASE_URL", "http://localhost:3000"),
            env_or("QR_SERVICE_URL", DEFAULT_QR_SERVICE_URL),
        ),
    )
}

async fn handle_link_action(action: LinkAction, pool: PgPool) -> Result<()> {
    let service = link_service(pool).await;

    match action {
        LinkAction::Create { title, url, slug } => create_link(&service, title, url, slug).await,
        LinkAction::List { sort, dir } => list_links(&service, sort, dir).await,
        LinkAction::Show { code } => show_link(&service, &code).await,
        LinkAction::Delete { id, yes } => delete_link(&service, id, yes).await,
    }
}

async fn create_link(
    service: &LinkService,
    title: Option<String>,
    url: Option<String>,
    slug: Option<String>,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let title = match title {
        Some(t) => t,
        None => Input::new().with_prompt("Title").interact_text()?,
    };
    let url = match url {
        Some(u) => u,
        None => Input::new().with_prompt("Target URL").interact_text()?,
    };

    let link = service
        .create(&title, &url, slug.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    let short_url = service.short_url(&link.short_code);

    println!("{}", "✅ Link created".green().bold());
    println!();
    println!("  ID:        {}", link.id.to_string().bright_black());
    println!("  Title:     {}", link.title.cyan());
    println!("  Target:    {}", link.target_url);
    println!("  Short URL: {}", short_url.bright_yellow().bold());
    println!("  QR code:   {}", service.qr_code_url(&short_url).bright_black());
    println!();

    Ok(())
}

async fn show_link(service: &LinkService, code: &str) -> Result<()> {
    let link = service
        .get_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to find link '{}': {}", code, e))?;
    let short_url = service.short_url(&link.short_code);

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  ID:        {}", link.id.to_string().bright_black());
    println!("  Title:     {}", link.title.cyan());
    println!("  Target:    {}", link.target_url);
    println!("  Short URL: {}", short_url.bright_yellow().bold());
    println!("  Clicks:    {}", link.clicks.to_string().bright_green());
    println!(
        "  Created:   {}",
        link.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    println!();

    Ok(())
}

/// Lists links as a table.
///
/// ```text
///   ID    Code         Clicks   Created            Title
///   ────────────────────────────────────────────────────────────
///   12    spring       418      2026-03-01 09:12   Spring sale
/// ```
async fn list_links(service: &LinkService, sort: Option<String>, dir: Option<String>) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = service
        .list(sort.as_deref(), dir.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<12} {:<8} {:<18} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Title".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<5} {:<12} {:<8} {:<18} {}",
            link.id.to_string().bright_black(),
            link.short_code.cyan(),
            link.clicks.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.title
        );
    }

    let total = service
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    println!();
    println!("  Total: {}", total.to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn delete_link(service: &LinkService, id: i64, skip_confirm: bool) -> Result<()> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete link {id}?"))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = service
        .delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    if deleted {
        println!("{}", "✅ Link deleted".green().bold());
    } else {
        println!("{}", "⚠️  No link with this id".yellow());
    }

    Ok(())
}

fn handle_token_action(action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Create { token } => create_token(token),
    }
}

/// Generates an admin token and prints the hash to configure on the server.
///
/// The raw token is shown once; the server only ever sees its HMAC.
fn create_token(token: Option<String>) -> Result<()> {
    let secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;
    let auth = AuthService::new(secret, None)?;

    println!("{}", "🔑 Create Admin Token".bright_blue().bold());
    println!();

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => generate_token(),
    };
    let token_hash = auth.hash_token(&token_value);

    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! Only its hash is stored."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Configure the server with:".bright_white());
    println!("  ADMIN_TOKEN_HASH={}", token_hash.bright_cyan());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// 48 random alphanumeric characters.
fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await?;
            let clicks: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM links")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Links:      {}", links.to_string().bright_green().bold());
            println!("  Clicks:     {}", clicks.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
