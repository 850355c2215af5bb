//! # Configuration
//!
//! Environment-driven configuration for the Keygate backend.

pub mod settings;

pub use settings::{AppConfig, AuthConfig, DatabaseConfig, ObservabilityConfig, ServerConfig};
