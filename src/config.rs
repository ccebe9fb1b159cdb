//! Application configuration
//! Mission: Load every runtime knob once at startup, never from ambient state

use anyhow::Result;

/// Fallback signing secret for local development. Startup warns when it is
/// still in use.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub port: u16,
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./sweets.db".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());

        let admin_username =
            std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());

        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "password123".to_string());

        Ok(Self {
            database_path,
            port,
            jwt_secret,
            admin_username,
            admin_password,
        })
    }
}
