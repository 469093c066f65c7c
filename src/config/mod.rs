/// Database configuration and connection management
pub mod database;

/// Billing rates, ledger key and menu loading from config.toml
pub mod mess;
