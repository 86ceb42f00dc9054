use sqlx::SqlitePool;

use crate::{
    models::{
        orphan::{age_bucket, Orphan, AGE_BUCKETS},
        stats::{
            current_month, AgeCount, DashboardStats, DonationStats, MonthlyAmount, NamedValue,
            Report, RECENT_DONATIONS, RECENT_ORPHANS,
        },
    },
    services::donations::DonationService,
};

pub struct StatsService;

impl StatsService {
    pub async fn dashboard(pool: &SqlitePool) -> anyhow::Result<DashboardStats> {
        let (orphan_count, adopted_count): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(CASE WHEN status = 'adopted' THEN 1 END) FROM orphans",
        )
        .fetch_one(pool)
        .await?;

        let total_donations: f64 = sqlx::query_scalar("SELECT TOTAL(amount) FROM donations")
            .fetch_one(pool)
            .await?;
        let total_expenses: f64 = sqlx::query_scalar("SELECT TOTAL(amount) FROM expenses")
            .fetch_one(pool)
            .await?;

        let recent_orphans = sqlx::query_as::<_, Orphan>(
            "SELECT * FROM orphans ORDER BY date_joined DESC, id DESC LIMIT ?",
        )
        .bind(RECENT_ORPHANS as i64)
        .fetch_all(pool)
        .await?;

        Ok(DashboardStats {
            orphan_count,
            adopted_count,
            total_donations,
            total_expenses,
            recent_donations: DonationService::recent(pool, RECENT_DONATIONS as i64).await?,
            recent_orphans,
        })
    }

    pub async fn donations(pool: &SqlitePool) -> anyhow::Result<DonationStats> {
        let month = current_month();
        let (total, monthly, donors): (f64, f64, i64) = sqlx::query_as(
            "SELECT TOTAL(amount),
                    TOTAL(CASE WHEN strftime('%Y-%m', donation_date) = ? THEN amount END),
                    COUNT(DISTINCT donor_name)
             FROM donations",
        )
        .bind(month)
        .fetch_one(pool)
        .await?;

        Ok(DonationStats {
            total,
            monthly,
            donors,
        })
    }

    pub async fn report(pool: &SqlitePool) -> anyhow::Result<Report> {
        let monthly_donations = sqlx::query_as::<_, (String, f64)>(
            "SELECT strftime('%Y-%m', donation_date) AS month, TOTAL(amount)
             FROM donations
             GROUP BY month
             ORDER BY month",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(month, amount)| MonthlyAmount { month, amount })
        .collect();

        let ages: Vec<i64> = sqlx::query_scalar("SELECT age FROM orphans")
            .fetch_all(pool)
            .await?;
        let orphans_by_age = AGE_BUCKETS
            .iter()
            .map(|(label, _, _)| AgeCount {
                age: label.to_string(),
                count: ages.iter().filter(|a| age_bucket(**a) == *label).count() as i64,
            })
            .collect();

        let donations_by_type = sqlx::query_as::<_, (String, i64)>(
            "SELECT donation_type, COUNT(*) FROM donations GROUP BY donation_type ORDER BY donation_type",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(name, count)| NamedValue {
            name,
            value: count as f64,
        })
        .collect();

        let expenses_by_category = sqlx::query_as::<_, (String, f64)>(
            "SELECT category, TOTAL(amount) FROM expenses GROUP BY category ORDER BY category",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(name, value)| NamedValue { name, value })
        .collect();

        Ok(Report {
            monthly_donations,
            orphans_by_age,
            donations_by_type,
            expenses_by_category,
        })
    }
}
