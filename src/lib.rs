//! Maintenance tracking for construction site equipment: machines, service
//! records, fuel, lubrication schedules and spare parts, persisted to SQLite.
pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod ids;
pub mod logging;
pub mod seed;
pub mod settings;
pub mod types;
