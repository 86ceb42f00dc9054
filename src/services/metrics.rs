use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_gauge, CounterVec, Gauge};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::services::stats::StatsService;

lazy_static! {
    // ── Event counters ──────────────────────────────────────────────────────
    pub static ref LOGINS_COUNTER: CounterVec = register_counter_vec!(
        "api_logins_total",
        "Login attempts by outcome",
        &["status"]
    ).unwrap();

    pub static ref MUTATIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_mutations_total",
        "Create/update/delete requests by resource and action",
        &["resource", "action"]
    ).unwrap();

    // ── Business metrics ────────────────────────────────────────────────────
    pub static ref ORPHANS_GAUGE: Gauge = register_gauge!(
        "orphanage_orphans_total",
        "Orphans on record"
    ).unwrap();

    pub static ref ADOPTED_GAUGE: Gauge = register_gauge!(
        "orphanage_orphans_adopted_total",
        "Orphans marked adopted"
    ).unwrap();

    pub static ref DONATIONS_GAUGE: Gauge = register_gauge!(
        "orphanage_donations_amount_total",
        "Sum of money donations"
    ).unwrap();

    pub static ref EXPENSES_GAUGE: Gauge = register_gauge!(
        "orphanage_expenses_amount_total",
        "Sum of recorded expenses"
    ).unwrap();
}

pub fn record_mutation(resource: &str, action: &str) {
    MUTATIONS_COUNTER.with_label_values(&[resource, action]).inc();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: SqlitePool) {
    tokio::spawn(async move {
        if let Err(e) = collect(&pool).await {
            warn!("Metrics: initial collection failed: {}", e);
        }
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
        }
    });
}

pub async fn collect(pool: &SqlitePool) -> anyhow::Result<()> {
    let stats = StatsService::dashboard(pool).await?;
    ORPHANS_GAUGE.set(stats.orphan_count as f64);
    ADOPTED_GAUGE.set(stats.adopted_count as f64);
    DONATIONS_GAUGE.set(stats.total_donations);
    EXPENSES_GAUGE.set(stats.total_expenses);
    info!("Metrics: collected ({} orphans)", stats.orphan_count);
    Ok(())
}
