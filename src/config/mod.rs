/// Database connection and table creation
pub mod database;

/// Environment-based application settings
pub mod settings;
