//! CLI administration tool for shorturl.
//!
//! Inspects and maintains short URLs directly against the database, without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Translate between ids and codes
//! cargo run --bin admin -- code encode 125
//! cargo run --bin admin -- code decode 12
//!
//! # Inspect a record (deleted ones included) and its recent visits
//! cargo run --bin admin -- url show 125
//!
//! # Soft-delete a record
//! cargo run --bin admin -- url delete 125
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required for everything except `code`): PostgreSQL connection string

use shorturl::domain::codec;
use shorturl::domain::repositories::{AccessLogRepository, ShortUrlRepository};
use shorturl::infrastructure::persistence::{PgAccessLogRepository, PgShortUrlRepository};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// Number of access log entries shown by `url show`.
const RECENT_LOGS: i64 = 10;

/// CLI tool for managing shorturl.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Convert between record ids and short codes
    Code {
        #[command(subcommand)]
        action: CodeAction,
    },

    /// Inspect or delete short URLs
    Url {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum CodeAction {
    /// Print the short code for an id
    Encode { id: u64 },

    /// Print the id for a short code
    Decode { code: String },
}

#[derive(Subcommand)]
enum UrlAction {
    /// Show a record and its most recent access logs
    Show {
        /// Record id (use `code decode` to look up a code)
        id: i64,
    },

    /// Soft-delete a record
    Delete {
        /// Record id
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
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

    // Codec commands are pure and work without a database.
    if let Commands::Code { action } = cli.command {
        return handle_code_action(action);
    }

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Code { .. } => unreachable!("handled above"),
        Commands::Url { action } => handle_url_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn handle_code_action(action: CodeAction) -> Result<()> {
    match action {
        CodeAction::Encode { id } => {
            println!("{}", codec::encode(id).bright_green().bold());
        }
        CodeAction::Decode { code } => {
            let id = codec::decode(&code).with_context(|| format!("Cannot decode '{code}'"))?;
            println!("{}", id.to_string().bright_green().bold());

            if !codec::is_canonical(&code) {
                println!(
                    "{} canonical form is {}",
                    "note:".yellow(),
                    codec::encode(id).cyan()
                );
            }
        }
    }

    Ok(())
}

async fn handle_url_action(action: UrlAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let short_urls = PgShortUrlRepository::new(pool.clone());
    let access_logs = PgAccessLogRepository::new(pool);

    match action {
        UrlAction::Show { id } => show_url(&short_urls, &access_logs, id).await?,
        UrlAction::Delete { id, yes } => delete_url(&short_urls, id, yes).await?,
    }

    Ok(())
}

/// Prints a record regardless of its state, with recent access logs.
async fn show_url(
    short_urls: &PgShortUrlRepository,
    access_logs: &PgAccessLogRepository,
    id: i64,
) -> Result<()> {
    let record = short_urls
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Short URL not found")?;

    let state = if record.is_deleted {
        "deleted".red()
    } else if !record.is_active {
        "inactive".yellow()
    } else if record.is_expired() {
        "expired".yellow()
    } else {
        "live".green()
    };

    println!("{}", "Short URL".bright_blue().bold());
    println!();
    println!("  ID:       {}", record.id.to_string().bright_black());
    println!("  Code:     {}", record.code().cyan());
    println!("  Target:   {}", record.original_url);
    println!("  State:    {}", state);
    println!("  Created:  {}", record.created_at);
    println!("  Expires:  {}", record.expires_at);
    println!(
        "  Clicks:   {}",
        record.clicks_count.to_string().bright_green().bold()
    );
    println!();

    let logs = access_logs
        .list_for_short_url(record.id, 0, RECENT_LOGS)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if logs.is_empty() {
        println!("{}", "No access logs".bright_black());
    } else {
        println!("{}", "Recent access logs:".bright_white().bold());
        for log in logs {
            println!(
                "  {}  {:<39}  {}",
                log.accessed_at.format("%Y-%m-%d %H:%M:%S"),
                log.ip_address.as_deref().unwrap_or("-"),
                log.user_agent.bright_black()
            );
        }
    }
    println!();

    Ok(())
}

/// Soft-deletes a record after confirmation.
///
/// The row and its access logs stay in the database.
async fn delete_url(short_urls: &PgShortUrlRepository, id: i64, skip_confirm: bool) -> Result<()> {
    let record = short_urls
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Short URL not found")?;

    if record.is_deleted {
        println!("{}", "This short URL is already deleted".yellow());
        return Ok(());
    }

    println!("  Code:   {}", record.code().cyan());
    println!("  Target: {}", record.original_url);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this short URL?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    short_urls
        .soft_delete(record.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete short URL: {}", e))?;

    println!();
    println!("{}", "Short URL deleted".green().bold());
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total, live and deleted short URLs
/// - Total clicks and stored access logs
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
        .fetch_one(pool)
        .await?;

    let short_urls = PgShortUrlRepository::new(Arc::new(pool.clone()));
    let live = short_urls
        .count_eligible(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let deleted: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM short_urls WHERE is_deleted = TRUE")
            .fetch_one(pool)
            .await?;

    let clicks: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(clicks_count), 0)::BIGINT FROM short_urls")
            .fetch_one(pool)
            .await?;

    let logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM access_logs")
        .fetch_one(pool)
        .await?;

    println!("  Short URLs:  {}", total.to_string().bright_green().bold());
    println!("  Live:        {}", live.to_string().bright_green().bold());
    println!("  Deleted:     {}", deleted.to_string().bright_green().bold());
    println!("  Clicks:      {}", clicks.to_string().bright_green().bold());
    println!("  Access logs: {}", logs.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            PgShortUrlRepository::new(Arc::new(pool.clone()))
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
