//! Vigil Common - Shared types, utilities, and configuration for the Vigil
//! portfolio monitoring services.
//!
//! This crate provides:
//! - Configuration types with environment overrides
//! - Error types and handling utilities
//! - Logging setup with noise filtering

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, ObservabilityConfig, ServerConfig, ValidatorConfig};
pub use error::{Error, Result};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Config, ValidatorConfig};
    pub use crate::error::{Error, Result};
    pub use crate::logging::init_logging;
}
