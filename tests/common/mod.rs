#![allow(dead_code)]

use sea_orm::*;
use serde_json::{json, Value};
use std::sync::Arc;

use funds_backend::config::AppConfig;
use funds_backend::db;
use funds_backend::models::{profiles, users};
use funds_backend::services::mailer::MemoryMailer;
use funds_backend::services::notifications::Notifier;
use funds_backend::AppState;

pub const PASSWORD: &str = "s3cret-pass";

/// Construit le service actix de test à partir d'un AppState
macro_rules! test_app {
    ($state:expr) => {{
        let state = $state.clone();
        actix_web::test::init_service(actix_web::App::new().configure(move |cfg| state.configure(cfg))).await
    }};
}

pub async fn test_state() -> (AppState, Arc<MemoryMailer>) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("sqlite in-memory connection");
    db::create_schema(&db).await.expect("schema creation");

    let config = AppConfig::for_tests();
    let mailer = Arc::new(MemoryMailer::new());
    let notifier = Notifier::new(mailer.clone(), config.mail.clone());

    (AppState::new(db, config, notifier), mailer)
}

pub fn registration(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": PASSWORD,
        "password2": PASSWORD,
        "first_name": "Test",
        "last_name": "User",
    })
}

pub async fn promote_to_staff(db: &DatabaseConnection, username: &str) {
    let user = find_user(db, username).await;
    let mut active: users::ActiveModel = user.into();
    active.is_staff = Set(true);
    active.update(db).await.expect("promote user");
}

pub async fn find_user(db: &DatabaseConnection, username: &str) -> users::Model {
    users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await
        .expect("query user")
        .expect("user exists")
}

pub async fn find_profile(db: &DatabaseConnection, username: &str) -> profiles::Model {
    let user = find_user(db, username).await;
    profiles::Entity::find()
        .filter(profiles::Column::UserId.eq(user.id))
        .one(db)
        .await
        .expect("query profile")
        .expect("profile exists")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
