use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    db,
    models::{
        expense::{Expense, ExpenseDraft},
        query::ListQuery,
        EntityId,
    },
};

pub struct ExpenseService;

impl ExpenseService {
    pub async fn list(pool: &SqlitePool, query: &ListQuery) -> anyhow::Result<Vec<Expense>> {
        let mut qb = db::select_from("expenses");
        db::push_search(&mut qb, &["description", "category"], query);
        db::push_eq(&mut qb, "category", "category", query);
        db::push_month(&mut qb, "expense_date", "date", query);
        db::push_order_and_window(&mut qb, query);

        let expenses = qb.build_query_as::<Expense>().fetch_all(pool).await?;
        Ok(expenses)
    }

    pub async fn get(pool: &SqlitePool, id: EntityId) -> anyhow::Result<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>("SELECT * FROM expenses WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(expense)
    }

    pub async fn create(pool: &SqlitePool, req: &ExpenseDraft) -> anyhow::Result<Expense> {
        let expense = sqlx::query_as::<_, Expense>(
            "INSERT INTO expenses (description, amount, category, expense_date, approved_by, receipt_url)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(req.description.trim())
        .bind(req.amount)
        .bind(req.category.trim())
        .bind(req.expense_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(&req.approved_by)
        .bind(&req.receipt_url)
        .fetch_one(pool)
        .await?;
        Ok(expense)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: EntityId,
        req: &ExpenseDraft,
    ) -> anyhow::Result<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(
            "UPDATE expenses
             SET description = ?, amount = ?, category = ?, expense_date = ?,
                 approved_by = ?, receipt_url = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(req.description.trim())
        .bind(req.amount)
        .bind(req.category.trim())
        .bind(req.expense_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(&req.approved_by)
        .bind(&req.receipt_url)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(expense)
    }

    pub async fn delete(pool: &SqlitePool, id: EntityId) -> anyhow::Result<bool> {
        db::delete_by_id(pool, "expenses", id).await
    }
}
