pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod utils;

use actix_web::web;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::notifications::Notifier;

/// État partagé par tous les workers actix
#[derive(Clone)]
pub struct AppState {
    pub db: web::Data<DatabaseConnection>,
    pub config: web::Data<AppConfig>,
    pub notifier: web::Data<Notifier>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig, notifier: Notifier) -> Self {
        AppState {
            db: web::Data::new(db),
            config: web::Data::new(config),
            notifier: web::Data::new(notifier),
        }
    }

    /// Enregistre l'état, les extracteurs JSON et toutes les routes /api
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.db.clone())
            .app_data(self.config.clone())
            .app_data(self.notifier.clone())
            // Corps JSON invalide -> enveloppe d'erreur standard
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
            )
            .configure(routes::configure_routes);
    }
}
