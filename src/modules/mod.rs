pub mod dashboard;
pub mod provider;
