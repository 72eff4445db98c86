pub mod config;
pub mod error;
pub mod monitor;
pub mod plate_detection;
pub mod registry;
