use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    db,
    models::{
        orphan::{Orphan, OrphanDraft, AGE_BUCKETS},
        query::ListQuery,
        EntityId,
    },
};

pub struct OrphanService;

impl OrphanService {
    pub async fn list(pool: &SqlitePool, query: &ListQuery) -> anyhow::Result<Vec<Orphan>> {
        let mut qb = db::select_from("orphans");
        db::push_search(&mut qb, &["name", "status"], query);
        db::push_eq(&mut qb, "status", "status", query);
        db::push_eq(&mut qb, "gender", "gender", query);
        if let Some(bucket) = query.filter("age") {
            match AGE_BUCKETS.iter().find(|(label, _, _)| *label == bucket) {
                Some((_, lo, hi)) => {
                    qb.push(" AND age BETWEEN ");
                    qb.push_bind(*lo);
                    qb.push(" AND ");
                    qb.push_bind(*hi);
                }
                None => {
                    qb.push(" AND 0");
                }
            }
        }
        db::push_order_and_window(&mut qb, query);

        let orphans = qb.build_query_as::<Orphan>().fetch_all(pool).await?;
        Ok(orphans)
    }

    pub async fn get(pool: &SqlitePool, id: EntityId) -> anyhow::Result<Option<Orphan>> {
        let orphan = sqlx::query_as::<_, Orphan>("SELECT * FROM orphans WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(orphan)
    }

    pub async fn create(pool: &SqlitePool, req: &OrphanDraft) -> anyhow::Result<Orphan> {
        let orphan = sqlx::query_as::<_, Orphan>(
            "INSERT INTO orphans
                 (name, age, gender, date_joined, medical_condition, education_level,
                  background, photo_url, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(req.name.trim())
        .bind(req.age)
        .bind(req.gender)
        .bind(req.date_joined.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(&req.medical_condition)
        .bind(&req.education_level)
        .bind(&req.background)
        .bind(&req.photo_url)
        .bind(req.adoption_status())
        .fetch_one(pool)
        .await?;
        Ok(orphan)
    }

    /// Full replace. `None` when the id does not exist.
    pub async fn update(
        pool: &SqlitePool,
        id: EntityId,
        req: &OrphanDraft,
    ) -> anyhow::Result<Option<Orphan>> {
        let orphan = sqlx::query_as::<_, Orphan>(
            "UPDATE orphans
             SET name = ?, age = ?, gender = ?, date_joined = ?, medical_condition = ?,
                 education_level = ?, background = ?, photo_url = ?, status = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(req.name.trim())
        .bind(req.age)
        .bind(req.gender)
        .bind(req.date_joined.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(&req.medical_condition)
        .bind(&req.education_level)
        .bind(&req.background)
        .bind(&req.photo_url)
        .bind(req.adoption_status())
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(orphan)
    }

    pub async fn delete(pool: &SqlitePool, id: EntityId) -> anyhow::Result<bool> {
        db::delete_by_id(pool, "orphans", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::sample;
    use crate::models::orphan::AdoptionStatus;

    async fn seeded() -> SqlitePool {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        for draft in sample::orphan_drafts() {
            OrphanService::create(&pool, &draft).await.unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let pool = seeded().await;
        let all = OrphanService::list(&pool, &ListQuery::default()).await.unwrap();
        assert_eq!(all.len(), sample::orphan_drafts().len());
        assert!(all.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn test_filters_match_client_predicate() {
        let pool = seeded().await;
        let records = sample::orphans();

        for (key, value) in [("status", "adopted"), ("gender", "Female"), ("age", "7-10"), ("age", "15+")] {
            let mut query = ListQuery::default();
            query.set_filter(key, value);
            let mut expected: Vec<String> = crate::client::filter::apply(&records, &query)
                .into_iter()
                .map(|o| o.name.clone())
                .collect();
            let mut got: Vec<String> = OrphanService::list(&pool, &query)
                .await
                .unwrap()
                .into_iter()
                .map(|o| o.name)
                .collect();
            expected.sort();
            got.sort();
            assert_eq!(got, expected, "filter {key}={value}");
        }
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let pool = seeded().await;
        let mut query = ListQuery::default();
        query.set_search("sAR");
        let found = OrphanService::list(&pool, &query).await.unwrap();
        assert!(!found.is_empty());
        assert!(found.iter().all(|o| o.name.to_lowercase().contains("sar")
            || o.status.as_str().contains("sar")));
    }

    #[tokio::test]
    async fn test_unknown_age_bucket_matches_nothing() {
        let pool = seeded().await;
        let mut query = ListQuery::default();
        query.set_filter("age", "99-100");
        assert!(OrphanService::list(&pool, &query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_defaults_and_update_replaces() {
        let pool = seeded().await;
        let mut draft = sample::orphan_drafts().remove(0);
        draft.date_joined = None;
        draft.status = None;
        draft.is_adopted = Some(true);

        let created = OrphanService::create(&pool, &draft).await.unwrap();
        assert_eq!(created.date_joined, Utc::now().date_naive());
        assert_eq!(created.status, AdoptionStatus::Adopted);

        draft.name = "Renamed".to_string();
        draft.is_adopted = None;
        draft.medical_condition = None;
        let updated = OrphanService::update(&pool, created.id, &draft).await.unwrap().unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.status, AdoptionStatus::Active);
        assert_eq!(updated.medical_condition, None);

        assert!(OrphanService::update(&pool, 9999, &draft).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let pool = seeded().await;
        let before = OrphanService::list(&pool, &ListQuery::default()).await.unwrap();
        let target = before[1].id;
        assert!(OrphanService::delete(&pool, target).await.unwrap());
        assert!(!OrphanService::delete(&pool, target).await.unwrap());
        let after = OrphanService::list(&pool, &ListQuery::default()).await.unwrap();
        assert_eq!(after.len(), before.len() - 1);
        assert!(OrphanService::get(&pool, target).await.unwrap().is_none());
    }
}
