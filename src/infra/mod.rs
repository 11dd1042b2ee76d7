//! Infrastructure - configuration and logging
//!
//! This module contains infrastructure concerns:
//! - `config` - Tool configuration (TOML loading, defaults, date schedule)
//! - `logging` - tracing subscriber setup

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::{load_schedule_json, Config};
