use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::models::validation::ValidationError;

/// Draft field values for a create/edit dialog, kept as the strings the user
/// typed. Typed values are only produced on submit.
///
/// The buffer never aliases a committed entity: `load_from` copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBuffer {
    defaults: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
}

impl FormBuffer {
    pub fn with_defaults<I, K, V>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let defaults: BTreeMap<String, String> = defaults
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: defaults.clone(),
            defaults,
        }
    }

    /// Overwrites one field.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
    }

    /// Empty string for unknown fields.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
    }

    /// Replaces the values with another buffer's, keeping our defaults.
    pub fn load_from(&mut self, other: &FormBuffer) {
        self.values = other.values.clone();
    }

    pub fn is_pristine(&self) -> bool {
        self.values == self.defaults
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn trimmed(&self, field: &str) -> Option<&str> {
        Some(self.get(field).trim()).filter(|v| !v.is_empty())
    }

    pub fn required(&self, field: &'static str) -> Result<&str, ValidationError> {
        self.trimmed(field)
            .ok_or_else(|| ValidationError::missing(field))
    }

    pub fn optional(&self, field: &str) -> Option<String> {
        self.trimmed(field).map(str::to_string)
    }

    /// Non-negative whole number.
    pub fn required_int(&self, field: &'static str) -> Result<i64, ValidationError> {
        self.required(field)?
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| ValidationError::invalid(field, "a non-negative whole number"))
    }

    /// Non-negative decimal.
    pub fn required_decimal(&self, field: &'static str) -> Result<f64, ValidationError> {
        self.required(field)?
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .ok_or_else(|| ValidationError::invalid(field, "a non-negative number"))
    }

    pub fn required_date(&self, field: &'static str) -> Result<NaiveDate, ValidationError> {
        parse_date(field, self.required(field)?)
    }

    pub fn optional_date(&self, field: &'static str) -> Result<Option<NaiveDate>, ValidationError> {
        self.trimmed(field).map(|v| parse_date(field, v)).transpose()
    }

    pub fn required_parsed<T: FromStr>(
        &self,
        field: &'static str,
        expected: &str,
    ) -> Result<T, ValidationError> {
        self.required(field)?
            .parse()
            .map_err(|_| ValidationError::invalid(field, expected))
    }

    pub fn optional_parsed<T: FromStr>(
        &self,
        field: &'static str,
        expected: &str,
    ) -> Result<Option<T>, ValidationError> {
        self.trimmed(field)
            .map(|v| v.parse().map_err(|_| ValidationError::invalid(field, expected)))
            .transpose()
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid(field, "a date (YYYY-MM-DD)"))
}
