use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{
    validation::{require_amount, require_text, ValidationError},
    EntityId,
};
use crate::client::{form::FormBuffer, resource::Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: EntityId,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub expense_date: NaiveDate,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_date: Option<NaiveDate>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
}

impl ExpenseDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("description", &self.description)?;
        require_amount("amount", self.amount)?;
        require_text("category", &self.category)?;
        Ok(())
    }
}

impl Resource for Expense {
    type Draft = ExpenseDraft;

    const LABEL: &'static str = "expense";
    const PATH: &'static str = "expenses";
    const FILTERS: &'static [&'static str] = &["category", "date"];
    const COLUMNS: &'static [&'static str] =
        &["ID", "Description", "Amount", "Category", "Date", "Approved by"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.description.as_str(), self.category.as_str()]
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        match key {
            "category" => Some(self.category.clone()),
            "date" => Some(self.expense_date.format("%Y-%m").to_string()),
            _ => None,
        }
    }

    fn form_defaults() -> FormBuffer {
        let today = Utc::now().date_naive().to_string();
        FormBuffer::with_defaults([
            ("description", String::new()),
            ("amount", String::new()),
            ("category", String::new()),
            ("expense_date", today),
            ("approved_by", String::new()),
            ("receipt_url", String::new()),
        ])
    }

    fn to_form(&self) -> FormBuffer {
        let mut form = Self::form_defaults();
        form.set("description", &self.description);
        form.set("amount", self.amount.to_string());
        form.set("category", &self.category);
        form.set("expense_date", self.expense_date.to_string());
        form.set("approved_by", self.approved_by.clone().unwrap_or_default());
        form.set("receipt_url", self.receipt_url.clone().unwrap_or_default());
        form
    }

    fn parse_form(form: &FormBuffer) -> Result<ExpenseDraft, ValidationError> {
        let draft = ExpenseDraft {
            description: form.required("description")?.to_string(),
            amount: form.required_decimal("amount")?,
            category: form.required("category")?.to_string(),
            expense_date: Some(form.required_date("expense_date")?),
            approved_by: form.optional("approved_by"),
            receipt_url: form.optional("receipt_url"),
        };
        draft.validate()?;
        Ok(draft)
    }

    fn from_draft(id: EntityId, draft: ExpenseDraft) -> Self {
        Self {
            id,
            description: draft.description,
            amount: draft.amount,
            category: draft.category,
            expense_date: draft.expense_date.unwrap_or_else(|| Utc::now().date_naive()),
            approved_by: draft.approved_by,
            receipt_url: draft.receipt_url,
        }
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.description.clone(),
            format!("${:.2}", self.amount),
            self.category.clone(),
            self.expense_date.to_string(),
            self.approved_by.clone().unwrap_or_default(),
        ]
    }
}
