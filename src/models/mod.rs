pub mod auth;
pub mod donation;
pub mod expense;
pub mod member;
pub mod orphan;
pub mod query;
pub mod stats;
pub mod validation;

/// Identity assigned by the backend on creation.
pub type EntityId = i64;
