pub mod config;
pub mod dataset;
pub mod errors;
pub mod evaluation;
pub mod intelligence;
pub mod metrics;
pub mod models;
pub mod provider;
