pub mod auth;
pub mod donations;
pub mod expenses;
pub mod members;
pub mod metrics;
pub mod orphans;
pub mod stats;
