use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    db,
    models::{
        donation::{Donation, DonationDraft},
        query::ListQuery,
        EntityId,
    },
};

pub struct DonationService;

impl DonationService {
    pub async fn list(pool: &SqlitePool, query: &ListQuery) -> anyhow::Result<Vec<Donation>> {
        let mut qb = db::select_from("donations");
        db::push_search(&mut qb, &["donor_name", "donation_type"], query);
        db::push_eq(&mut qb, "donation_type", "type", query);
        db::push_month(&mut qb, "donation_date", "date", query);
        db::push_order_and_window(&mut qb, query);

        let donations = qb.build_query_as::<Donation>().fetch_all(pool).await?;
        Ok(donations)
    }

    pub async fn recent(pool: &SqlitePool, limit: i64) -> anyhow::Result<Vec<Donation>> {
        let donations = sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations ORDER BY donation_date DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(donations)
    }

    pub async fn get(pool: &SqlitePool, id: EntityId) -> anyhow::Result<Option<Donation>> {
        let donation = sqlx::query_as::<_, Donation>("SELECT * FROM donations WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(donation)
    }

    pub async fn create(pool: &SqlitePool, req: &DonationDraft) -> anyhow::Result<Donation> {
        let donation = sqlx::query_as::<_, Donation>(
            "INSERT INTO donations
                 (donor_name, email, phone, amount, donation_date, donation_type, items, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(req.donor_name.trim())
        .bind(&req.email)
        .bind(&req.phone)
        .bind(req.stored_amount())
        .bind(req.donation_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(req.donation_type)
        .bind(&req.items)
        .bind(&req.notes)
        .fetch_one(pool)
        .await?;
        Ok(donation)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: EntityId,
        req: &DonationDraft,
    ) -> anyhow::Result<Option<Donation>> {
        let donation = sqlx::query_as::<_, Donation>(
            "UPDATE donations
             SET donor_name = ?, email = ?, phone = ?, amount = ?, donation_date = ?,
                 donation_type = ?, items = ?, notes = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(req.donor_name.trim())
        .bind(&req.email)
        .bind(&req.phone)
        .bind(req.stored_amount())
        .bind(req.donation_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(req.donation_type)
        .bind(&req.items)
        .bind(&req.notes)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(donation)
    }

    pub async fn delete(pool: &SqlitePool, id: EntityId) -> anyhow::Result<bool> {
        db::delete_by_id(pool, "donations", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::sample;
    use crate::models::donation::DonationType;

    async fn seeded() -> SqlitePool {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        for draft in sample::donation_drafts() {
            DonationService::create(&pool, &draft).await.unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn test_money_donation_keeps_amount() {
        let pool = seeded().await;
        let draft = DonationDraft {
            donor_name: "John Smith".to_string(),
            email: None,
            phone: None,
            amount: Some(500.0),
            donation_date: None,
            donation_type: DonationType::Money,
            items: None,
            notes: None,
        };
        let saved = DonationService::create(&pool, &draft).await.unwrap();
        assert_eq!(saved.amount, 500.0);
        assert_eq!(saved.donation_date, Utc::now().date_naive());
        assert_eq!(DonationService::get(&pool, saved.id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_non_money_amount_is_zeroed() {
        let pool = seeded().await;
        let draft = DonationDraft {
            donor_name: "Local Bakery".to_string(),
            email: None,
            phone: None,
            amount: Some(120.0),
            donation_date: None,
            donation_type: DonationType::Supplies,
            items: Some("Bread".to_string()),
            notes: None,
        };
        let saved = DonationService::create(&pool, &draft).await.unwrap();
        assert_eq!(saved.amount, 0.0);
    }

    #[tokio::test]
    async fn test_type_and_month_filters() {
        let pool = seeded().await;
        let records = sample::donations();

        let mut query = ListQuery::default();
        query.set_filter("type", "money");
        query.set_filter("date", "2023-12");
        let got = DonationService::list(&pool, &query).await.unwrap();
        let expected = crate::client::filter::apply(&records, &query);
        assert_eq!(got.len(), expected.len());
        assert!(got
            .iter()
            .all(|d| d.donation_type == DonationType::Money
                && d.donation_date.format("%Y-%m").to_string() == "2023-12"));
    }

    #[tokio::test]
    async fn test_paging_windows_newest_first() {
        let pool = seeded().await;
        let mut query = ListQuery::default();
        query.limit = Some(3);
        query.page = Some(2);
        let page = DonationService::list(&pool, &query).await.unwrap();
        let all = DonationService::list(&pool, &ListQuery::default()).await.unwrap();
        assert_eq!(page, all[3..6].to_vec());
    }

    #[tokio::test]
    async fn test_recent_is_capped() {
        let pool = seeded().await;
        let recent = DonationService::recent(&pool, 5).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert!(recent.windows(2).all(|w| w[0].donation_date >= w[1].donation_date));
    }
}
