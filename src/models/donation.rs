use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{
    validation::{require_amount, require_text, ValidationError},
    EntityId,
};
use crate::client::{form::FormBuffer, resource::Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum DonationType {
    Money,
    Supplies,
    Other,
}

impl DonationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationType::Money => "money",
            DonationType::Supplies => "supplies",
            DonationType::Other => "other",
        }
    }
}

impl std::fmt::Display for DonationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DonationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "money" => Ok(DonationType::Money),
            "supplies" => Ok(DonationType::Supplies),
            "other" => Ok(DonationType::Other),
            _ => Err(anyhow::anyhow!("Unknown donation type: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Donation {
    pub id: EntityId,
    pub donor_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Zero unless `donation_type` is money.
    pub amount: f64,
    pub donation_date: NaiveDate,
    #[serde(rename = "type", alias = "donation_type")]
    pub donation_type: DonationType,
    #[serde(default)]
    pub items: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /donations` and `PUT /donations/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationDraft {
    pub donor_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_date: Option<NaiveDate>,
    #[serde(rename = "type", alias = "donation_type")]
    pub donation_type: DonationType,
    #[serde(default)]
    pub items: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DonationDraft {
    /// Money donations need an amount, everything else needs a description
    /// of what was given.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("donor_name", &self.donor_name)?;
        match self.donation_type {
            DonationType::Money => {
                let amount = self.amount.ok_or_else(|| ValidationError::missing("amount"))?;
                require_amount("amount", amount)?;
            }
            _ => {
                let items = self.items.as_deref().unwrap_or_default();
                require_text("items", items)?;
            }
        }
        Ok(())
    }

    /// Amount as stored: forced to zero for non-money donations.
    pub fn stored_amount(&self) -> f64 {
        match self.donation_type {
            DonationType::Money => self.amount.unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl Resource for Donation {
    type Draft = DonationDraft;

    const LABEL: &'static str = "donation";
    const PATH: &'static str = "donations";
    const FILTERS: &'static [&'static str] = &["type", "date"];
    const COLUMNS: &'static [&'static str] = &["ID", "Donor", "Amount/Items", "Type", "Date"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.donor_name.as_str(), self.donation_type.as_str()]
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        match key {
            "type" => Some(self.donation_type.to_string()),
            "date" => Some(self.donation_date.format("%Y-%m").to_string()),
            _ => None,
        }
    }

    fn form_defaults() -> FormBuffer {
        let today = Utc::now().date_naive().to_string();
        FormBuffer::with_defaults([
            ("donor_name", String::new()),
            ("email", String::new()),
            ("phone", String::new()),
            ("type", "money".to_string()),
            ("amount", String::new()),
            ("items", String::new()),
            ("donation_date", today),
            ("notes", String::new()),
        ])
    }

    fn to_form(&self) -> FormBuffer {
        let mut form = Self::form_defaults();
        form.set("donor_name", &self.donor_name);
        form.set("email", self.email.clone().unwrap_or_default());
        form.set("phone", self.phone.clone().unwrap_or_default());
        form.set("type", self.donation_type.to_string());
        if self.donation_type == DonationType::Money {
            form.set("amount", self.amount.to_string());
        } else {
            form.set("items", self.items.clone().unwrap_or_default());
        }
        form.set("donation_date", self.donation_date.to_string());
        form.set("notes", self.notes.clone().unwrap_or_default());
        form
    }

    fn parse_form(form: &FormBuffer) -> Result<DonationDraft, ValidationError> {
        let donor_name = form.required("donor_name")?.to_string();
        let donation_type: DonationType =
            form.required_parsed("type", "money, supplies or other")?;
        let donation_date = form.required_date("donation_date")?;

        let (amount, items) = match donation_type {
            DonationType::Money => (form.required_decimal("amount")?, None),
            _ => (0.0, Some(form.required("items")?.to_string())),
        };

        let draft = DonationDraft {
            donor_name,
            email: form.optional("email"),
            phone: form.optional("phone"),
            amount: Some(amount),
            donation_date: Some(donation_date),
            donation_type,
            items,
            notes: form.optional("notes"),
        };
        draft.validate()?;
        Ok(draft)
    }

    fn from_draft(id: EntityId, draft: DonationDraft) -> Self {
        let amount = draft.stored_amount();
        Self {
            id,
            donor_name: draft.donor_name,
            email: draft.email,
            phone: draft.phone,
            amount,
            donation_date: draft
                .donation_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            donation_type: draft.donation_type,
            items: draft.items,
            notes: draft.notes,
        }
    }

    fn row(&self) -> Vec<String> {
        let what = match self.donation_type {
            DonationType::Money => format!("${:.2}", self.amount),
            _ => self.items.clone().unwrap_or_else(|| "Supplies".to_string()),
        };
        vec![
            self.id.to_string(),
            self.donor_name.clone(),
            what,
            self.donation_type.to_string(),
            self.donation_date.to_string(),
        ]
    }
}
