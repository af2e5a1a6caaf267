// ============================================================================
// CONFIGURATION
// ============================================================================
//
// Description:
//   Configuration de l'application chargée en couches:
//     1. valeurs par défaut (ci-dessous)
//     2. fichier optionnel (config/default.toml ou chemin passé en argument)
//     3. variables d'environnement préfixées FUNDS__ (séparateur "__")
//     4. raccourcis historiques: DATABASE_URL, JWT_SECRET
//
// Exemple:
//   FUNDS__SERVER__PORT=9000
//   FUNDS__LEDGER__MIN_WITHDRAWAL=50
//
// ============================================================================

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::password;

/// Charge la configuration depuis un fichier optionnel et l'environnement.
pub fn load_config(config_file_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    dotenv::dotenv().ok();

    let mut settings = Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "postgres://localhost/funds")?
        .set_default("database.max_connections", 10)?
        .set_default("database.create_schema", true)?
        .set_default("auth.jwt_secret", "default-insecure-key-change-this")?
        .set_default("auth.access_ttl_minutes", 60)?
        .set_default("auth.refresh_ttl_days", 7)?
        .set_default("auth.reset_ttl_minutes", 60)?
        .set_default("auth.otp_ttl_seconds", 600)?
        .set_default("auth.password_iterations", i64::from(password::DEFAULT_ITERATIONS))?
        .set_default("ledger.min_withdrawal", "100")?
        .set_default("mail.from", "no-reply@fgpremiumfunds.com")?
        .set_default("mail.admin", "admin@fgpremiumfunds.com")?
        .set_default("mail.contact_inbox", "contact@fgpremiumfunds.com")?
        .set_default("mail.frontend_url", "http://localhost:3000")?
        .set_default("logging.level", "info")?
        .set_default("logging.json", false)?;

    settings = match config_file_path {
        Some(path) => settings.add_source(File::from(path).required(true)),
        None => settings.add_source(File::with_name("config/default").required(false)),
    };

    settings = settings.add_source(Environment::with_prefix("FUNDS").separator("__"));

    if let Ok(url) = std::env::var("DATABASE_URL") {
        settings = settings.set_override("database.url", url)?;
    }
    match std::env::var("JWT_SECRET") {
        Ok(secret) => settings = settings.set_override("auth.jwt_secret", secret)?,
        Err(_) => tracing::warn!("JWT_SECRET not set, falling back to configured secret"),
    }

    let app_config = settings.build()?.try_deserialize::<AppConfig>()?;
    Ok(app_config)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub ledger: LedgerConfig,
    pub mail: MailConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Crée les tables manquantes au démarrage
    pub create_schema: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
    pub reset_ttl_minutes: i64,
    pub otp_ttl_seconds: i64,
    pub password_iterations: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub min_withdrawal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    pub from: String,
    pub admin: String,
    pub contact_inbox: String,
    pub frontend_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl AppConfig {
    /// Configuration utilisée par les tests (pas de fichier, pas d'environnement)
    pub fn for_tests() -> Self {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                create_schema: true,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                access_ttl_minutes: 60,
                refresh_ttl_days: 7,
                reset_ttl_minutes: 60,
                otp_ttl_seconds: 600,
                password_iterations: 1000,
            },
            ledger: LedgerConfig {
                min_withdrawal: Decimal::from(100),
            },
            mail: MailConfig {
                from: "no-reply@test.local".to_string(),
                admin: "admin@test.local".to_string(),
                contact_inbox: "contact@test.local".to_string(),
                frontend_url: "http://frontend.test".to_string(),
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: false,
            },
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.auth.otp_ttl_seconds, 600);
        assert_eq!(config.ledger.min_withdrawal, Decimal::from(100));
        assert!(config.database.max_connections > 0);
    }
}
