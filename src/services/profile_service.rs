use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::*;
use serde::Deserialize;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::deposits::{self, DepositStatus};
use crate::models::dto::ProfileResponse;
use crate::models::withdrawals::{self, WithdrawalStatus};
use crate::models::{profiles, users};
use crate::services::ledger_service::{load_profile, load_user};
use crate::services::notifications::Notifier;
use crate::utils::money::format_amount;
use crate::utils::otp;

pub struct ProfileService;

/// Champs absents = inchangés
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 150))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetPinRequest {
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub confirm_pin: String,
}

impl ProfileService {
    /// Vue du profil avec les totaux des dépôts / retraits complétés
    pub async fn summary(db: &DatabaseConnection, user_id: i32) -> Result<ProfileResponse, AppError> {
        let user = load_user(db, user_id).await?;
        let profile = load_profile(db, user_id).await?;

        let total_deposits: Decimal = deposits::Entity::find()
            .filter(deposits::Column::UserId.eq(user_id))
            .filter(deposits::Column::Status.eq(DepositStatus::Completed))
            .all(db)
            .await?
            .iter()
            .map(|d| d.amount)
            .sum();

        let total_withdrawals: Decimal = withdrawals::Entity::find()
            .filter(withdrawals::Column::UserId.eq(user_id))
            .filter(withdrawals::Column::Status.eq(WithdrawalStatus::Completed))
            .all(db)
            .await?
            .iter()
            .map(|w| w.amount)
            .sum();

        Ok(build_response(&user, &profile, total_deposits, total_withdrawals))
    }

    pub async fn update(db: &DatabaseConnection, user_id: i32, update: ProfileUpdate) -> Result<ProfileResponse, AppError> {
        update.validate()?;

        let txn = db.begin().await?;
        let user = load_user(&txn, user_id).await?;
        let profile = load_profile(&txn, user_id).await?;

        if update.first_name.is_some() || update.last_name.is_some() {
            let mut active: users::ActiveModel = user.into();
            if let Some(first_name) = update.first_name {
                active.first_name = Set(first_name.trim().to_string());
            }
            if let Some(last_name) = update.last_name {
                active.last_name = Set(last_name.trim().to_string());
            }
            active.update(&txn).await?;
        }

        if let Some(phone) = update.phone_number {
            let mut active: profiles::ActiveModel = profile.into();
            let phone = phone.trim().to_string();
            active.phone_number = Set(if phone.is_empty() { None } else { Some(phone) });
            active.updated_at = Set(Utc::now().naive_utc());
            active.update(&txn).await?;
        }

        txn.commit().await?;
        tracing::info!(user_id, "profile updated");

        Self::summary(db, user_id).await
    }

    /// Génère un OTP à 6 chiffres, le stocke sur le profil et l'envoie par email
    pub async fn request_pin_otp(
        db: &DatabaseConnection,
        config: &AppConfig,
        notifier: &Notifier,
        user_id: i32,
    ) -> Result<(), AppError> {
        let user = load_user(db, user_id).await?;
        let profile = load_profile(db, user_id).await?;

        let code = otp::generate_otp();
        let mut active: profiles::ActiveModel = profile.into();
        active.pin_otp = Set(Some(code.clone()));
        active.pin_otp_created = Set(Some(Utc::now().naive_utc()));
        active.update(db).await?;

        // L'utilisateur doit recevoir le code: l'échec est remonté
        notifier.pin_otp(&user, &code, config.auth.otp_ttl_seconds).await?;
        tracing::info!(user_id, "transaction PIN OTP sent");

        Ok(())
    }

    pub async fn set_transaction_pin(
        db: &DatabaseConnection,
        config: &AppConfig,
        user_id: i32,
        request: SetPinRequest,
    ) -> Result<(), AppError> {
        if request.otp.is_empty() || request.pin.is_empty() || request.confirm_pin.is_empty() {
            return Err(AppError::validation("OTP and PIN are required"));
        }
        if request.pin != request.confirm_pin {
            return Err(AppError::validation("PINs do not match"));
        }
        if !otp::is_valid_pin(&request.pin) {
            return Err(AppError::validation("PIN must be 6 digits"));
        }

        let profile = load_profile(db, user_id).await?;

        let created = match (profile.pin_otp.as_deref(), profile.pin_otp_created) {
            (Some(stored), Some(created)) if stored == request.otp => created,
            _ => return Err(AppError::validation("Invalid OTP")),
        };
        if otp::is_expired(created, Utc::now().naive_utc(), config.auth.otp_ttl_seconds) {
            return Err(AppError::OtpExpired);
        }

        let mut active: profiles::ActiveModel = profile.into();
        active.transaction_pin = Set(Some(request.pin));
        active.pin_otp = Set(None);
        active.pin_otp_created = Set(None);
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await?;

        tracing::info!(user_id, "transaction PIN set");
        Ok(())
    }
}

fn build_response(
    user: &users::Model,
    profile: &profiles::Model,
    total_deposits: Decimal,
    total_withdrawals: Decimal,
) -> ProfileResponse {
    ProfileResponse {
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        phone_number: profile.phone_number.clone(),
        balance: format_amount(profile.balance),
        earnings: format_amount(profile.earnings),
        ada: format_amount(profile.ada),
        avail_balance: format_amount(profile.avail_balance),
        tax_balance: format_amount(profile.tax_balance),
        deposit: format_amount(profile.deposit),
        total_deposits: format_amount(total_deposits),
        total_withdrawals: format_amount(total_withdrawals),
        has_transaction_pin: profile.has_transaction_pin(),
        created_at: profile.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::fixture;
    use chrono::Duration;

    #[tokio::test]
    async fn test_summary_formats_balances() {
        let fx = fixture().await;
        let summary = ProfileService::summary(&fx.db, fx.user.id).await.unwrap();

        assert_eq!(summary.username, "alice");
        assert_eq!(summary.balance, "0.00");
        assert_eq!(summary.total_deposits, "0.00");
        assert!(!summary.has_transaction_pin);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("ADA").is_some());
        assert!(json.get("Tax_balance").is_some());
    }

    #[tokio::test]
    async fn test_update_profile_fields() {
        let fx = fixture().await;
        let update = ProfileUpdate {
            first_name: Some("Alicia".to_string()),
            last_name: None,
            phone_number: Some("+33 6 12 34 56 78".to_string()),
        };

        let summary = ProfileService::update(&fx.db, fx.user.id, update).await.unwrap();
        assert_eq!(summary.first_name, "Alicia");
        assert_eq!(summary.last_name, "Martin");
        assert_eq!(summary.phone_number.as_deref(), Some("+33 6 12 34 56 78"));
    }

    async fn stored_otp(db: &DatabaseConnection, user_id: i32) -> String {
        load_profile(db, user_id).await.unwrap().pin_otp.unwrap()
    }

    fn pin_request(otp: &str, pin: &str, confirm: &str) -> SetPinRequest {
        SetPinRequest { otp: otp.to_string(), pin: pin.to_string(), confirm_pin: confirm.to_string() }
    }

    #[tokio::test]
    async fn test_pin_setup_with_otp() {
        let fx = fixture().await;
        ProfileService::request_pin_otp(&fx.db, &fx.config, &fx.notifier, fx.user.id).await.unwrap();

        let code = stored_otp(&fx.db, fx.user.id).await;
        let mail = fx.mailer.sent_to(&fx.user.email);
        assert!(mail[0].body.contains(&code));
        assert!(mail[0].body.contains("10 minutes"));

        let err = ProfileService::set_transaction_pin(&fx.db, &fx.config, fx.user.id, pin_request(&code, "123456", "654321"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "PINs do not match");

        let err = ProfileService::set_transaction_pin(&fx.db, &fx.config, fx.user.id, pin_request(&code, "1234", "1234"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "PIN must be 6 digits");

        let err = ProfileService::set_transaction_pin(&fx.db, &fx.config, fx.user.id, pin_request("999999x", "123456", "123456"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid OTP");

        ProfileService::set_transaction_pin(&fx.db, &fx.config, fx.user.id, pin_request(&code, "123456", "123456"))
            .await
            .unwrap();

        let profile = load_profile(&fx.db, fx.user.id).await.unwrap();
        assert_eq!(profile.transaction_pin.as_deref(), Some("123456"));
        assert!(profile.pin_otp.is_none());
        assert!(profile.pin_otp_created.is_none());
    }

    #[tokio::test]
    async fn test_expired_otp_is_refused() {
        let fx = fixture().await;
        let profile = load_profile(&fx.db, fx.user.id).await.unwrap();
        let mut active: profiles::ActiveModel = profile.into();
        active.pin_otp = Set(Some("246810".to_string()));
        active.pin_otp_created = Set(Some(Utc::now().naive_utc() - Duration::seconds(601)));
        active.update(&fx.db).await.unwrap();

        let err = ProfileService::set_transaction_pin(&fx.db, &fx.config, fx.user.id, pin_request("246810", "123456", "123456"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::OtpExpired));

        let profile = load_profile(&fx.db, fx.user.id).await.unwrap();
        assert!(profile.transaction_pin.is_none());
    }
}
