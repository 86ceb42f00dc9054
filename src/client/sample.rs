//! Built-in sample records for the offline demo mode and the `seed-demo`
//! binary.

use chrono::NaiveDate;

use super::resource::Resource;
use crate::models::{
    donation::{Donation, DonationDraft, DonationType},
    expense::{Expense, ExpenseDraft},
    member::{Member, MemberDraft},
    orphan::{AdoptionStatus, Gender, Orphan, OrphanDraft},
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn orphan(name: &str, age: i64, gender: Gender, joined: NaiveDate, health: &str, status: AdoptionStatus) -> OrphanDraft {
    OrphanDraft {
        name: name.to_string(),
        age,
        gender,
        date_joined: Some(joined),
        medical_condition: Some(health.to_string()),
        education_level: None,
        background: None,
        photo_url: None,
        status: Some(status),
        is_adopted: None,
    }
}

pub fn orphan_drafts() -> Vec<OrphanDraft> {
    use AdoptionStatus::*;
    use Gender::*;
    vec![
        orphan("Sarah Johnson", 8, Female, date(2023, 10, 15), "Good", Active),
        orphan("Michael Lee", 6, Male, date(2023, 11, 2), "Excellent", Active),
        orphan("Emma Williams", 10, Female, date(2023, 11, 20), "Good", Pending),
        orphan("David Brown", 5, Male, date(2023, 12, 1), "Fair", Active),
        orphan("Olivia Davis", 9, Female, date(2023, 9, 28), "Good", Adopted),
        orphan("James Wilson", 7, Male, date(2023, 10, 5), "Good", Active),
        orphan("Sophia Martinez", 11, Female, date(2023, 8, 15), "Excellent", Active),
        orphan("Benjamin Garcia", 4, Male, date(2023, 11, 10), "Fair", Pending),
    ]
}

fn money(donor: &str, email: Option<&str>, phone: Option<&str>, amount: f64, on: NaiveDate) -> DonationDraft {
    DonationDraft {
        donor_name: donor.to_string(),
        email: email.map(str::to_string),
        phone: phone.map(str::to_string),
        amount: Some(amount),
        donation_date: Some(on),
        donation_type: DonationType::Money,
        items: None,
        notes: None,
    }
}

fn in_kind(donor: &str, kind: DonationType, email: Option<&str>, phone: Option<&str>, items: &str, on: NaiveDate) -> DonationDraft {
    DonationDraft {
        donor_name: donor.to_string(),
        email: email.map(str::to_string),
        phone: phone.map(str::to_string),
        amount: Some(0.0),
        donation_date: Some(on),
        donation_type: kind,
        items: Some(items.to_string()),
        notes: None,
    }
}

pub fn donation_drafts() -> Vec<DonationDraft> {
    vec![
        money("John Smith", Some("john.smith@example.com"), Some("555-123-4567"), 500.0, date(2023, 12, 1)),
        money("ABC Corporation", Some("donations@abccorp.com"), None, 1000.0, date(2023, 11, 28)),
        money("City Council", Some("council@cityname.gov"), None, 1500.0, date(2023, 11, 20)),
        in_kind(
            "Local Grocery Store",
            DonationType::Supplies,
            None,
            Some("555-987-6543"),
            "Food supplies for the month",
            date(2023, 11, 15),
        ),
        money("Mary Johnson", Some("mary.j@example.com"), Some("555-765-4321"), 250.0, date(2023, 11, 10)),
        money("Anonymous", None, None, 1000.0, date(2023, 11, 5)),
        in_kind(
            "Local Charity Group",
            DonationType::Other,
            Some("info@charitygroup.org"),
            None,
            "Clothes and toys for children",
            date(2023, 10, 29),
        ),
    ]
}

fn member(name: &str, role: &str, phone: &str, email: &str, joined: NaiveDate) -> MemberDraft {
    MemberDraft {
        name: name.to_string(),
        role: role.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        joined_date: Some(joined),
        address: None,
    }
}

pub fn member_drafts() -> Vec<MemberDraft> {
    vec![
        member("Anita Sharma", "Director", "555-201-0001", "anita@balsadan.org", date(2021, 4, 1)),
        member("Rahul Mehta", "Caretaker", "555-201-0002", "rahul@balsadan.org", date(2022, 1, 15)),
        member("Grace Thomas", "Teacher", "555-201-0003", "grace@balsadan.org", date(2022, 6, 20)),
        member("Vikram Rao", "Accountant", "555-201-0004", "vikram@balsadan.org", date(2023, 2, 10)),
    ]
}

fn expense(description: &str, amount: f64, category: &str, on: NaiveDate, approved_by: &str) -> ExpenseDraft {
    ExpenseDraft {
        description: description.to_string(),
        amount,
        category: category.to_string(),
        expense_date: Some(on),
        approved_by: Some(approved_by.to_string()),
        receipt_url: None,
    }
}

pub fn expense_drafts() -> Vec<ExpenseDraft> {
    vec![
        expense("Monthly groceries", 820.0, "Food", date(2023, 12, 2), "Anita Sharma"),
        expense("School uniforms", 340.5, "Education", date(2023, 11, 25), "Anita Sharma"),
        expense("Pediatric check-ups", 410.0, "Medical", date(2023, 11, 18), "Vikram Rao"),
        expense("Electricity bill", 160.75, "Utilities", date(2023, 11, 8), "Vikram Rao"),
    ]
}

/// Numbers drafts 1..=n in order.
fn number<R: Resource>(drafts: Vec<R::Draft>) -> Vec<R> {
    drafts
        .into_iter()
        .zip(1..)
        .map(|(draft, id)| R::from_draft(id, draft))
        .collect()
}

pub fn orphans() -> Vec<Orphan> {
    number(orphan_drafts())
}

pub fn donations() -> Vec<Donation> {
    number(donation_drafts())
}

pub fn members() -> Vec<Member> {
    number(member_drafts())
}

pub fn expenses() -> Vec<Expense> {
    number(expense_drafts())
}
