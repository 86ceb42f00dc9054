//! Demo data seed script
//!
//! Loads the built-in sample records (8 orphans, 7 donations, 4 members,
//! 4 expenses) through the same services the API uses.
//!
//! Usage:
//!   DATABASE_URL=sqlite://orphanage.db?mode=rwc ./seed-demo [--reset]

use std::env;

use anyhow::{Context, Result};
use clap::Parser;

use orphanage_admin::{
    client::sample,
    db,
    services::{
        donations::DonationService, expenses::ExpenseService, members::MemberService,
        orphans::OrphanService,
    },
};

#[derive(Parser)]
#[command(name = "seed-demo", about = "Load sample orphanage records into the database")]
struct Args {
    /// Delete every existing record first
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://orphanage.db?mode=rwc".to_string());

    println!("=== Seed Demo Data ===");

    let pool = db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool).await.context("Failed to run migrations")?;

    if args.reset {
        println!("Clearing existing records...");
        for table in ["orphans", "donations", "members", "expenses"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&pool)
                .await
                .with_context(|| format!("Failed to clear {table}"))?;
        }
    }

    println!("Creating orphans...");
    for draft in sample::orphan_drafts() {
        let orphan = OrphanService::create(&pool, &draft)
            .await
            .with_context(|| format!("Failed to insert orphan {}", draft.name))?;
        println!("  #{} {}", orphan.id, orphan.name);
    }

    println!("Creating donations...");
    for draft in sample::donation_drafts() {
        DonationService::create(&pool, &draft)
            .await
            .with_context(|| format!("Failed to insert donation from {}", draft.donor_name))?;
    }

    println!("Creating members...");
    for draft in sample::member_drafts() {
        MemberService::create(&pool, &draft)
            .await
            .with_context(|| format!("Failed to insert member {}", draft.name))?;
    }

    println!("Creating expenses...");
    for draft in sample::expense_drafts() {
        ExpenseService::create(&pool, &draft)
            .await
            .with_context(|| format!("Failed to insert expense {}", draft.description))?;
    }

    println!("Done.");
    Ok(())
}
