/// Database configuration and connection management
pub mod database;

/// Pricing settings loading from gestima.toml
pub mod settings;
