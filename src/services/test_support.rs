// Données de test partagées par les services (sqlite en mémoire)
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::*;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db;
use crate::models::{profiles, users};
use crate::services::mailer::MemoryMailer;
use crate::services::notifications::Notifier;
use crate::utils::password;

pub const TEST_PASSWORD: &str = "password123";

pub struct Fixture {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub mailer: Arc<MemoryMailer>,
    pub notifier: Notifier,
    pub user: users::Model,
}

pub async fn fixture() -> Fixture {
    let db = db::test_connection().await;
    let config = AppConfig::for_tests();
    let mailer = Arc::new(MemoryMailer::new());
    let notifier = Notifier::new(mailer.clone(), config.mail.clone());
    let user = create_user(&db, &config, "alice", "alice@example.com").await;

    Fixture { db, config, mailer, notifier, user }
}

pub async fn create_user(db: &DatabaseConnection, config: &AppConfig, username: &str, email: &str) -> users::Model {
    let now = Utc::now().naive_utc();
    let user = users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        first_name: Set("Alice".to_string()),
        last_name: Set("Martin".to_string()),
        password_hash: Set(password::hash_password(TEST_PASSWORD, config.auth.password_iterations).unwrap()),
        is_staff: Set(false),
        is_active: Set(true),
        date_joined: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    profiles::ActiveModel {
        user_id: Set(user.id),
        phone_number: Set(None),
        balance: Set(Decimal::ZERO),
        earnings: Set(Decimal::ZERO),
        ada: Set(Decimal::ZERO),
        avail_balance: Set(Decimal::ZERO),
        tax_balance: Set(Decimal::ZERO),
        deposit: Set(Decimal::ZERO),
        transaction_pin: Set(None),
        pin_otp: Set(None),
        pin_otp_created: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    user
}

pub async fn set_pin(db: &DatabaseConnection, user_id: i32, pin: &str) {
    let profile = profiles::Entity::find()
        .filter(profiles::Column::UserId.eq(user_id))
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut active: profiles::ActiveModel = profile.into();
    active.transaction_pin = Set(Some(pin.to_string()));
    active.update(db).await.unwrap();
}
