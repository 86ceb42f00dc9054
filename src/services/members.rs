use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    db,
    models::{
        member::{Member, MemberDraft},
        query::ListQuery,
        EntityId,
    },
};

pub struct MemberService;

impl MemberService {
    pub async fn list(pool: &SqlitePool, query: &ListQuery) -> anyhow::Result<Vec<Member>> {
        let mut qb = db::select_from("members");
        db::push_search(&mut qb, &["name", "role"], query);
        db::push_eq(&mut qb, "role", "role", query);
        db::push_order_and_window(&mut qb, query);

        let members = qb.build_query_as::<Member>().fetch_all(pool).await?;
        Ok(members)
    }

    pub async fn get(pool: &SqlitePool, id: EntityId) -> anyhow::Result<Option<Member>> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(member)
    }

    pub async fn create(pool: &SqlitePool, req: &MemberDraft) -> anyhow::Result<Member> {
        let member = sqlx::query_as::<_, Member>(
            "INSERT INTO members (name, role, phone, email, joined_date, address)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(req.name.trim())
        .bind(req.role.trim())
        .bind(req.phone.trim())
        .bind(req.email.trim())
        .bind(req.joined_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(&req.address)
        .fetch_one(pool)
        .await?;
        Ok(member)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: EntityId,
        req: &MemberDraft,
    ) -> anyhow::Result<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            "UPDATE members
             SET name = ?, role = ?, phone = ?, email = ?, joined_date = ?, address = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(req.name.trim())
        .bind(req.role.trim())
        .bind(req.phone.trim())
        .bind(req.email.trim())
        .bind(req.joined_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(&req.address)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(member)
    }

    pub async fn delete(pool: &SqlitePool, id: EntityId) -> anyhow::Result<bool> {
        db::delete_by_id(pool, "members", id).await
    }
}
