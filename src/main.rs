use actix_web::{middleware::Logger, App, HttpServer};
use std::sync::Arc;

use funds_backend::services::mailer::LogMailer;
use funds_backend::services::notifications::Notifier;
use funds_backend::{config, db, telemetry, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let app_config = config::load_config(config_path.as_deref())?;
    telemetry::init_logging(&app_config.logging);

    tracing::info!("Connecting to database...");
    let db = db::establish_connection(&app_config.database).await?;
    tracing::info!(create_schema = app_config.database.create_schema, "Database connected");

    // Pas de transport SMTP: les emails sont seulement loggés
    let notifier = Notifier::new(Arc::new(LogMailer), app_config.mail.clone());
    let bind_address = app_config.bind_address();
    let state = AppState::new(db, app_config, notifier);

    tracing::info!(host = %bind_address.0, port = bind_address.1, "Starting server");

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| state.configure(cfg))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
