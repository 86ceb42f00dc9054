use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{
    validation::{require_text, ValidationError},
    EntityId,
};
use crate::client::{form::FormBuffer, resource::Resource};

/// NGO staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: EntityId,
    pub name: String,
    pub role: String,
    pub phone: String,
    pub email: String,
    pub joined_date: NaiveDate,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDraft {
    pub name: String,
    pub role: String,
    pub phone: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_date: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
}

impl MemberDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("role", &self.role)?;
        require_text("phone", &self.phone)?;
        require_text("email", &self.email)?;
        Ok(())
    }
}

impl Resource for Member {
    type Draft = MemberDraft;

    const LABEL: &'static str = "member";
    const PATH: &'static str = "members";
    const FILTERS: &'static [&'static str] = &["role"];
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Role", "Phone", "Email", "Joined"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.role.as_str()]
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        match key {
            "role" => Some(self.role.clone()),
            _ => None,
        }
    }

    fn form_defaults() -> FormBuffer {
        FormBuffer::with_defaults([
            ("name", ""),
            ("role", ""),
            ("phone", ""),
            ("email", ""),
            ("joined_date", ""),
            ("address", ""),
        ])
    }

    fn to_form(&self) -> FormBuffer {
        let mut form = Self::form_defaults();
        form.set("name", &self.name);
        form.set("role", &self.role);
        form.set("phone", &self.phone);
        form.set("email", &self.email);
        form.set("joined_date", self.joined_date.to_string());
        form.set("address", self.address.clone().unwrap_or_default());
        form
    }

    fn parse_form(form: &FormBuffer) -> Result<MemberDraft, ValidationError> {
        let draft = MemberDraft {
            name: form.required("name")?.to_string(),
            role: form.required("role")?.to_string(),
            phone: form.required("phone")?.to_string(),
            email: form.required("email")?.to_string(),
            joined_date: form.optional_date("joined_date")?,
            address: form.optional("address"),
        };
        draft.validate()?;
        Ok(draft)
    }

    fn from_draft(id: EntityId, draft: MemberDraft) -> Self {
        Self {
            id,
            name: draft.name,
            role: draft.role,
            phone: draft.phone,
            email: draft.email,
            joined_date: draft.joined_date.unwrap_or_else(|| Utc::now().date_naive()),
            address: draft.address,
        }
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.role.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.joined_date.to_string(),
        ]
    }
}
