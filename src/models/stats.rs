use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{
    donation::Donation,
    expense::Expense,
    orphan::{age_bucket, Orphan, AGE_BUCKETS},
};

pub const RECENT_DONATIONS: usize = 5;
pub const RECENT_ORPHANS: usize = 4;

/// `YYYY-MM` of today, the month counted by `DonationStats::monthly`.
pub fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}

/// `GET /dashboard/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub orphan_count: i64,
    pub adopted_count: i64,
    pub total_donations: f64,
    pub total_expenses: f64,
    /// Latest donation dates first.
    #[serde(default)]
    pub recent_donations: Vec<Donation>,
    /// Most recently joined first.
    #[serde(default)]
    pub recent_orphans: Vec<Orphan>,
}

impl DashboardStats {
    /// Dashboard figures over records already in memory (offline mode).
    pub fn from_records(orphans: &[Orphan], donations: &[Donation], expenses: &[Expense]) -> Self {
        let mut recent_donations = donations.to_vec();
        recent_donations.sort_by(|a, b| {
            b.donation_date
                .cmp(&a.donation_date)
                .then(b.id.cmp(&a.id))
        });
        recent_donations.truncate(RECENT_DONATIONS);

        let mut recent_orphans = orphans.to_vec();
        recent_orphans.sort_by(|a, b| b.date_joined.cmp(&a.date_joined).then(b.id.cmp(&a.id)));
        recent_orphans.truncate(RECENT_ORPHANS);

        Self {
            orphan_count: orphans.len() as i64,
            adopted_count: orphans.iter().filter(|o| o.is_adopted()).count() as i64,
            total_donations: donations.iter().map(|d| d.amount).sum(),
            total_expenses: expenses.iter().map(|e| e.amount).sum(),
            recent_donations,
            recent_orphans,
        }
    }
}

/// `GET /donations/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationStats {
    pub total: f64,
    /// Money received in the current calendar month.
    pub monthly: f64,
    /// Distinct donor names.
    pub donors: i64,
}

impl DonationStats {
    /// `month` is `YYYY-MM`, usually `current_month()`.
    pub fn from_donations(donations: &[Donation], month: &str) -> Self {
        let mut donors: Vec<&str> = donations.iter().map(|d| d.donor_name.as_str()).collect();
        donors.sort_unstable();
        donors.dedup();

        Self {
            total: donations.iter().map(|d| d.amount).sum(),
            monthly: donations
                .iter()
                .filter(|d| d.donation_date.format("%Y-%m").to_string() == month)
                .map(|d| d.amount)
                .sum(),
            donors: donors.len() as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAmount {
    /// `YYYY-MM`
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeCount {
    pub age: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

/// `GET /reports`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub monthly_donations: Vec<MonthlyAmount>,
    pub orphans_by_age: Vec<AgeCount>,
    /// Number of donations per type.
    pub donations_by_type: Vec<NamedValue>,
    /// Amount spent per category.
    pub expenses_by_category: Vec<NamedValue>,
}

impl Report {
    /// Report groups over records already in memory, ordered like the SQL
    /// `GROUP BY ... ORDER BY` the backend runs.
    pub fn from_records(orphans: &[Orphan], donations: &[Donation], expenses: &[Expense]) -> Self {
        let mut monthly: BTreeMap<String, f64> = BTreeMap::new();
        let mut by_type: BTreeMap<String, f64> = BTreeMap::new();
        for d in donations {
            *monthly.entry(d.donation_date.format("%Y-%m").to_string()).or_default() += d.amount;
            *by_type.entry(d.donation_type.to_string()).or_default() += 1.0;
        }
        let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
        for e in expenses {
            *by_category.entry(e.category.clone()).or_default() += e.amount;
        }

        Self {
            monthly_donations: monthly
                .into_iter()
                .map(|(month, amount)| MonthlyAmount { month, amount })
                .collect(),
            orphans_by_age: AGE_BUCKETS
                .iter()
                .map(|(label, _, _)| AgeCount {
                    age: label.to_string(),
                    count: orphans.iter().filter(|o| age_bucket(o.age) == *label).count() as i64,
                })
                .collect(),
            donations_by_type: named(by_type),
            expenses_by_category: named(by_category),
        }
    }
}

fn named(groups: BTreeMap<String, f64>) -> Vec<NamedValue> {
    groups
        .into_iter()
        .map(|(name, value)| NamedValue { name, value })
        .collect()
}
