use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{
    validation::{require_text, ValidationError},
    EntityId,
};
use crate::client::{form::FormBuffer, resource::Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(anyhow::anyhow!("Unknown gender: {s}")),
        }
    }
}

/// Where an orphan stands with respect to adoption.
///
/// Older clients only know a boolean `is_adopted`; it maps onto
/// `Adopted` / `Active` at the serialization boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AdoptionStatus {
    #[default]
    Active,
    Pending,
    Adopted,
}

impl AdoptionStatus {
    pub fn resolve(status: Option<AdoptionStatus>, is_adopted: Option<bool>) -> Self {
        match (status, is_adopted) {
            (Some(status), _) => status,
            (None, Some(true)) => AdoptionStatus::Adopted,
            _ => AdoptionStatus::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Active => "active",
            AdoptionStatus::Pending => "pending",
            AdoptionStatus::Adopted => "adopted",
        }
    }
}

impl std::fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdoptionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AdoptionStatus::Active),
            "pending" => Ok(AdoptionStatus::Pending),
            "adopted" => Ok(AdoptionStatus::Adopted),
            _ => Err(anyhow::anyhow!("Unknown adoption status: {s}")),
        }
    }
}

/// Age ranges used by the age filter and the reports page.
pub const AGE_BUCKETS: &[(&str, i64, i64)] = &[
    ("0-3", 0, 3),
    ("4-6", 4, 6),
    ("7-10", 7, 10),
    ("11-14", 11, 14),
    ("15+", 15, i64::MAX),
];

pub fn age_bucket(age: i64) -> &'static str {
    AGE_BUCKETS
        .iter()
        .find(|(_, lo, hi)| age >= *lo && age <= *hi)
        .map(|(label, _, _)| *label)
        .unwrap_or("0-3")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(from = "OrphanWire", into = "OrphanWire")]
pub struct Orphan {
    pub id: EntityId,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub date_joined: NaiveDate,
    pub medical_condition: Option<String>,
    pub education_level: Option<String>,
    pub background: Option<String>,
    pub photo_url: Option<String>,
    pub status: AdoptionStatus,
}

impl Orphan {
    pub fn is_adopted(&self) -> bool {
        self.status == AdoptionStatus::Adopted
    }
}

/// JSON shape of an orphan: carries both adoption representations.
#[derive(Serialize, Deserialize)]
struct OrphanWire {
    id: EntityId,
    name: String,
    age: i64,
    gender: Gender,
    date_joined: NaiveDate,
    #[serde(default)]
    medical_condition: Option<String>,
    #[serde(default)]
    education_level: Option<String>,
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    status: Option<AdoptionStatus>,
    #[serde(default)]
    is_adopted: Option<bool>,
}

impl From<OrphanWire> for Orphan {
    fn from(w: OrphanWire) -> Self {
        Self {
            id: w.id,
            name: w.name,
            age: w.age,
            gender: w.gender,
            date_joined: w.date_joined,
            medical_condition: w.medical_condition,
            education_level: w.education_level,
            background: w.background,
            photo_url: w.photo_url,
            status: AdoptionStatus::resolve(w.status, w.is_adopted),
        }
    }
}

impl From<Orphan> for OrphanWire {
    fn from(o: Orphan) -> Self {
        let is_adopted = o.is_adopted();
        Self {
            id: o.id,
            name: o.name,
            age: o.age,
            gender: o.gender,
            date_joined: o.date_joined,
            medical_condition: o.medical_condition,
            education_level: o.education_level,
            background: o.background,
            photo_url: o.photo_url,
            status: Some(o.status),
            is_adopted: Some(is_adopted),
        }
    }
}

/// Body of `POST /orphans` and `PUT /orphans/{id}` (full replace).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrphanDraft {
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<NaiveDate>,
    #[serde(default)]
    pub medical_condition: Option<String>,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AdoptionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_adopted: Option<bool>,
}

impl OrphanDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        if self.age < 0 {
            return Err(ValidationError::invalid("age", "a non-negative whole number"));
        }
        require_text("medical_condition", self.medical_condition.as_deref().unwrap_or(""))?;
        Ok(())
    }

    pub fn adoption_status(&self) -> AdoptionStatus {
        AdoptionStatus::resolve(self.status, self.is_adopted)
    }
}

impl Resource for Orphan {
    type Draft = OrphanDraft;

    const LABEL: &'static str = "orphan";
    const PATH: &'static str = "orphans";
    const FILTERS: &'static [&'static str] = &["status", "gender", "age"];
    const COLUMNS: &'static [&'static str] =
        &["ID", "Name", "Age", "Gender", "Joined", "Health", "Status"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.status.as_str()]
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        match key {
            "status" => Some(self.status.to_string()),
            "gender" => Some(self.gender.to_string()),
            "age" => Some(age_bucket(self.age).to_string()),
            _ => None,
        }
    }

    fn form_defaults() -> FormBuffer {
        FormBuffer::with_defaults([
            ("name", ""),
            ("age", ""),
            ("gender", ""),
            ("date_joined", ""),
            ("medical_condition", ""),
            ("education_level", ""),
            ("background", ""),
            ("photo_url", ""),
            ("status", "active"),
        ])
    }

    fn to_form(&self) -> FormBuffer {
        let mut form = Self::form_defaults();
        form.set("name", &self.name);
        form.set("age", self.age.to_string());
        form.set("gender", self.gender.to_string());
        form.set("date_joined", self.date_joined.to_string());
        form.set("medical_condition", self.medical_condition.clone().unwrap_or_default());
        form.set("education_level", self.education_level.clone().unwrap_or_default());
        form.set("background", self.background.clone().unwrap_or_default());
        form.set("photo_url", self.photo_url.clone().unwrap_or_default());
        form.set("status", self.status.to_string());
        form
    }

    fn parse_form(form: &FormBuffer) -> Result<OrphanDraft, ValidationError> {
        let draft = OrphanDraft {
            name: form.required("name")?.to_string(),
            age: form.required_int("age")?,
            gender: form.required_parsed("gender", "Male, Female or Other")?,
            date_joined: form.optional_date("date_joined")?,
            medical_condition: form.optional("medical_condition"),
            education_level: form.optional("education_level"),
            background: form.optional("background"),
            photo_url: form.optional("photo_url"),
            status: Some(
                form.optional_parsed("status", "active, pending or adopted")?
                    .unwrap_or_default(),
            ),
            is_adopted: None,
        };
        draft.validate()?;
        Ok(draft)
    }

    fn from_draft(id: EntityId, draft: OrphanDraft) -> Self {
        let status = draft.adoption_status();
        Self {
            id,
            name: draft.name,
            age: draft.age,
            gender: draft.gender,
            date_joined: draft
                .date_joined
                .unwrap_or_else(|| Utc::now().date_naive()),
            medical_condition: draft.medical_condition,
            education_level: draft.education_level,
            background: draft.background,
            photo_url: draft.photo_url,
            status,
        }
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.age.to_string(),
            self.gender.to_string(),
            self.date_joined.to_string(),
            self.medical_condition.clone().unwrap_or_default(),
            self.status.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_adopted_maps_to_status() {
        let json = r#"{"id":1,"name":"Sarah Johnson","age":8,"gender":"Female",
            "date_joined":"2023-01-15","is_adopted":true}"#;
        let orphan: Orphan = serde_json::from_str(json).unwrap();
        assert_eq!(orphan.status, AdoptionStatus::Adopted);

        let json = r#"{"id":2,"name":"Michael Lee","age":10,"gender":"Male",
            "date_joined":"2023-02-01","status":"pending","is_adopted":true}"#;
        let orphan: Orphan = serde_json::from_str(json).unwrap();
        assert_eq!(orphan.status, AdoptionStatus::Pending);
    }

    #[test]
    fn test_serialized_orphan_carries_both_representations() {
        let orphan = Orphan::from_draft(
            7,
            OrphanDraft {
                name: "Emma Wilson".into(),
                age: 5,
                gender: Gender::Female,
                date_joined: NaiveDate::from_ymd_opt(2023, 3, 10),
                medical_condition: None,
                education_level: None,
                background: None,
                photo_url: None,
                status: Some(AdoptionStatus::Adopted),
                is_adopted: None,
            },
        );
        let value = serde_json::to_value(&orphan).unwrap();
        assert_eq!(value["status"], "adopted");
        assert_eq!(value["is_adopted"], true);
    }

    #[test]
    fn test_age_buckets() {
        assert_eq!(age_bucket(0), "0-3");
        assert_eq!(age_bucket(6), "4-6");
        assert_eq!(age_bucket(10), "7-10");
        assert_eq!(age_bucket(14), "11-14");
        assert_eq!(age_bucket(17), "15+");
    }

    #[test]
    fn test_parse_form_requires_name_age_gender_health() {
        let mut form = Orphan::form_defaults();
        form.set("name", "Sarah Johnson");
        form.set("gender", "Female");
        let err = Orphan::parse_form(&form).unwrap_err();
        assert_eq!(err.field, "age");

        form.set("age", "eight");
        let err = Orphan::parse_form(&form).unwrap_err();
        assert_eq!(err.field, "age");

        form.set("age", "8");
        let err = Orphan::parse_form(&form).unwrap_err();
        assert_eq!(err.field, "medical_condition");
        assert_eq!(err.to_string(), "Medical condition is required");

        form.set("medical_condition", "Healthy");
        let draft = Orphan::parse_form(&form).unwrap();
        assert_eq!(draft.age, 8);
        assert_eq!(draft.adoption_status(), AdoptionStatus::Active);
        assert_eq!(draft.date_joined, None);
    }

    #[test]
    fn test_form_round_trip_through_edit() {
        let orphan = Orphan::from_draft(
            3,
            OrphanDraft {
                name: "David Brown".into(),
                age: 12,
                gender: Gender::Male,
                date_joined: NaiveDate::from_ymd_opt(2022, 11, 5),
                medical_condition: Some("Asthma".into()),
                education_level: None,
                background: None,
                photo_url: None,
                status: Some(AdoptionStatus::Pending),
                is_adopted: None,
            },
        );
        let form = orphan.to_form();
        assert_eq!(form.get("age"), "12");
        let draft = Orphan::parse_form(&form).unwrap();
        assert_eq!(Orphan::from_draft(3, draft), orphan);
    }
}
