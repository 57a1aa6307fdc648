pub mod config;
pub mod error;
pub mod evaluations;
pub mod scoring;
pub mod telemetry;
