// ============================================================================
// ACCOUNT SERVICE
// ============================================================================
//
// Inscription, connexion, tokens JWT, vérification email et mots de passe.
//
// Inscription: user + profil (soldes à 0) + email_verifications sont créés
// dans la même transaction. L'envoi de l'email de vérification peut échouer
// sans annuler l'inscription (email_sent = false dans la réponse).
//
// ============================================================================

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::*;
use sea_orm::sea_query::Expr;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::dto::TokenPair;
use crate::models::{email_verifications, password_reset_tokens, profiles, users};
use crate::services::notifications::Notifier;
use crate::utils::jwt::{self, TokenType};
use crate::utils::password::{self, MIN_PASSWORD_LENGTH};

pub struct AccountService;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150, message = "Username must be between 3 and 150 characters"))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    pub password2: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username ou email
    #[validate(length(min = 1, message = "This field is required"))]
    pub login: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub password: String,
}

#[derive(Debug)]
pub struct Registration {
    pub user: users::Model,
    pub tokens: TokenPair,
    pub email_sent: bool,
}

impl AccountService {
    pub async fn register(
        db: &DatabaseConnection,
        config: &AppConfig,
        notifier: &Notifier,
        request: RegisterRequest,
    ) -> Result<Registration, AppError> {
        request.validate()?;
        if request.password != request.password2 {
            return Err(AppError::validation("Passwords don't match"));
        }

        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        if users::Entity::find()
            .filter(users::Column::Username.eq(&username))
            .one(db)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("This username is already taken.".to_string()));
        }
        if users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .one(db)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("This email is already registered.".to_string()));
        }

        let password_hash = password::hash_password(&request.password, config.auth.password_iterations)?;
        let now = Utc::now().naive_utc();

        let txn = db.begin().await?;

        let user = users::ActiveModel {
            username: Set(username),
            email: Set(email),
            first_name: Set(request.first_name.trim().to_string()),
            last_name: Set(request.last_name.trim().to_string()),
            password_hash: Set(password_hash),
            is_staff: Set(false),
            is_active: Set(true),
            date_joined: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

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
        .insert(&txn)
        .await?;

        let verification = email_verifications::ActiveModel {
            user_id: Set(user.id),
            token: Set(Uuid::new_v4().to_string()),
            is_verified: Set(false),
            created_at: Set(now),
            verified_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");

        let email_sent = match notifier.verification_email(&user, &verification.token).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, user_id = user.id, "failed to send verification email");
                false
            }
        };

        let tokens = jwt::issue_pair(&config.auth, &user)?;

        Ok(Registration { user, tokens, email_sent })
    }

    /// Connexion par username OU email
    pub async fn login(
        db: &DatabaseConnection,
        config: &AppConfig,
        request: LoginRequest,
    ) -> Result<(users::Model, TokenPair), AppError> {
        request.validate()?;

        let login = request.login.trim();
        let user = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(login))
                    .add(users::Column::Email.eq(login.to_lowercase())),
            )
            .one(db)
            .await?
            .ok_or_else(|| AppError::Unauthorized("No account found with these credentials".to_string()))?;

        if !user.is_active || !password::verify_password(&request.password, &user.password_hash)? {
            tracing::warn!(user_id = user.id, "authentication failed");
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let tokens = jwt::issue_pair(&config.auth, &user)?;
        tracing::info!(user_id = user.id, "user logged in");

        Ok((user, tokens))
    }

    /// Échange un refresh token contre un nouvel access token
    pub async fn refresh(db: &DatabaseConnection, config: &AppConfig, refresh_token: &str) -> Result<String, AppError> {
        let claims = jwt::verify_token(&config.auth, refresh_token, TokenType::Refresh)?;

        let user = users::Entity::find_by_id(claims.sub)
            .one(db)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        jwt::generate_token(&config.auth, &user, TokenType::Access)
    }

    pub async fn verify_email(db: &DatabaseConnection, notifier: &Notifier, token: &str) -> Result<(), AppError> {
        let verification = email_verifications::Entity::find()
            .filter(email_verifications::Column::Token.eq(token))
            .filter(email_verifications::Column::IsVerified.eq(false))
            .one(db)
            .await?
            .ok_or_else(|| AppError::validation("Invalid or expired verification token"))?;

        let user_id = verification.user_id;
        let now = Utc::now().naive_utc();

        let mut active: email_verifications::ActiveModel = verification.into();
        active.is_verified = Set(true);
        active.verified_at = Set(Some(now));
        active.update(db).await?;

        tracing::info!(user_id, "email verified");

        if let Some(user) = users::Entity::find_by_id(user_id).one(db).await? {
            notifier.admin_email_verified(&user, now).await;
        }

        Ok(())
    }

    /// Change le mot de passe et renvoie une nouvelle paire de tokens
    pub async fn change_password(
        db: &DatabaseConnection,
        config: &AppConfig,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<TokenPair, AppError> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(AppError::validation("Both current and new password are required"));
        }

        let user = users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !password::verify_password(current_password, &user.password_hash)? {
            return Err(AppError::validation("Current password is incorrect"));
        }
        check_length(new_password)?;

        let user = Self::store_password(db, config, user, new_password).await?;
        tracing::info!(user_id, "password changed");

        jwt::issue_pair(&config.auth, &user)
    }

    /// Envoie un lien de reset si l'email existe. Réponse identique sinon.
    pub async fn forgot_password(
        db: &DatabaseConnection,
        config: &AppConfig,
        notifier: &Notifier,
        email: &str,
    ) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }

        let Some(user) = users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .one(db)
            .await?
        else {
            tracing::info!("password reset requested for unknown email");
            return Ok(());
        };

        let now = Utc::now().naive_utc();
        let txn = db.begin().await?;

        // Un seul lien valide à la fois
        password_reset_tokens::Entity::update_many()
            .col_expr(password_reset_tokens::Column::Used, Expr::value(true))
            .filter(password_reset_tokens::Column::UserId.eq(user.id))
            .filter(password_reset_tokens::Column::Used.eq(false))
            .exec(&txn)
            .await?;

        let reset = password_reset_tokens::ActiveModel {
            user_id: Set(user.id),
            token: Set(Uuid::new_v4().to_string()),
            expires_at: Set(now + Duration::minutes(config.auth.reset_ttl_minutes)),
            used: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        if let Err(e) = notifier
            .password_reset(&user, &reset.token, config.auth.reset_ttl_minutes)
            .await
        {
            tracing::warn!(error = %e, user_id = user.id, "password reset email failed");
        }

        Ok(())
    }

    /// Consomme un token de reset et renvoie une nouvelle paire de tokens
    pub async fn reset_password(
        db: &DatabaseConnection,
        config: &AppConfig,
        token: &str,
        new_password: &str,
    ) -> Result<(users::Model, TokenPair), AppError> {
        if token.is_empty() || new_password.is_empty() {
            return Err(AppError::validation("Token and new password are required"));
        }

        let reset = password_reset_tokens::Entity::find()
            .filter(password_reset_tokens::Column::Token.eq(token))
            .one(db)
            .await?
            .ok_or_else(|| AppError::validation("Invalid reset link. Please request a new one."))?;

        if !reset.is_usable(Utc::now().naive_utc()) {
            return Err(AppError::validation("Reset link has expired. Please request a new one."));
        }
        check_length(new_password)?;

        let user = users::Entity::find_by_id(reset.user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::validation("User not found"))?;

        let txn = db.begin().await?;
        let user = Self::store_password(&txn, config, user, new_password).await?;
        let mut active: password_reset_tokens::ActiveModel = reset.into();
        active.used = Set(true);
        active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = user.id, "password reset");

        let tokens = jwt::issue_pair(&config.auth, &user)?;
        Ok((user, tokens))
    }

    async fn store_password<C: ConnectionTrait>(
        conn: &C,
        config: &AppConfig,
        user: users::Model,
        new_password: &str,
    ) -> Result<users::Model, AppError> {
        let hash = password::hash_password(new_password, config.auth.password_iterations)?;
        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(hash);
        Ok(active.update(conn).await?)
    }
}

fn check_length(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{fixture, TEST_PASSWORD};

    fn registration(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "s3cret-pass".to_string(),
            password2: "s3cret-pass".to_string(),
            first_name: "Bob".to_string(),
            last_name: "Durand".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_profile_and_verification() {
        let fx = fixture().await;

        let reg = AccountService::register(&fx.db, &fx.config, &fx.notifier, registration("bob", "bob@example.com"))
            .await
            .unwrap();
        assert!(reg.email_sent);
        assert!(jwt::verify_token(&fx.config.auth, &reg.tokens.access, TokenType::Access).is_ok());

        let profile = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(reg.user.id))
            .one(&fx.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.balance, Decimal::ZERO);
        assert!(!profile.has_transaction_pin());

        let verification = email_verifications::Entity::find()
            .filter(email_verifications::Column::UserId.eq(reg.user.id))
            .one(&fx.db)
            .await
            .unwrap()
            .unwrap();
        let sent = fx.mailer.sent_to("bob@example.com");
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains(&verification.token));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_mismatch() {
        let fx = fixture().await;

        let err = AccountService::register(&fx.db, &fx.config, &fx.notifier, registration("alice", "new@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = AccountService::register(&fx.db, &fx.config, &fx.notifier, registration("carol", "alice@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "This email is already registered.");

        let mut request = registration("carol", "carol@example.com");
        request.password2 = "different-pass".to_string();
        let err = AccountService::register(&fx.db, &fx.config, &fx.notifier, request).await.unwrap_err();
        assert_eq!(err.to_string(), "Passwords don't match");

        let mut request = registration("carol", "not-an-email");
        request.password = "short".to_string();
        request.password2 = "short".to_string();
        let err = AccountService::register(&fx.db, &fx.config, &fx.notifier, request).await.unwrap_err();
        assert!(matches!(err, AppError::FieldErrors(_)));
    }

    #[tokio::test]
    async fn test_register_survives_mail_failure() {
        use crate::services::mailer::MemoryMailer;
        use std::sync::Arc;

        let fx = fixture().await;
        let notifier = Notifier::new(Arc::new(MemoryMailer::failing()), fx.config.mail.clone());

        let reg = AccountService::register(&fx.db, &fx.config, &notifier, registration("dave", "dave@example.com"))
            .await
            .unwrap();
        assert!(!reg.email_sent);
    }

    #[tokio::test]
    async fn test_login_with_username_or_email() {
        let fx = fixture().await;

        for login in ["alice", "alice@example.com"] {
            let (user, _) = AccountService::login(
                &fx.db,
                &fx.config,
                LoginRequest { login: login.to_string(), password: TEST_PASSWORD.to_string() },
            )
            .await
            .unwrap();
            assert_eq!(user.id, fx.user.id);
        }

        let err = AccountService::login(
            &fx.db,
            &fx.config,
            LoginRequest { login: "alice".to_string(), password: "wrong-password".to_string() },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = AccountService::login(
            &fx.db,
            &fx.config,
            LoginRequest { login: "nobody".to_string(), password: TEST_PASSWORD.to_string() },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "No account found with these credentials");
    }

    #[tokio::test]
    async fn test_refresh_requires_refresh_token() {
        let fx = fixture().await;
        let pair = jwt::issue_pair(&fx.config.auth, &fx.user).unwrap();

        let access = AccountService::refresh(&fx.db, &fx.config, &pair.refresh).await.unwrap();
        assert!(jwt::verify_token(&fx.config.auth, &access, TokenType::Access).is_ok());

        assert!(AccountService::refresh(&fx.db, &fx.config, &pair.access).await.is_err());
    }

    #[tokio::test]
    async fn test_verify_email_only_once() {
        let fx = fixture().await;
        let reg = AccountService::register(&fx.db, &fx.config, &fx.notifier, registration("erin", "erin@example.com"))
            .await
            .unwrap();
        let token = email_verifications::Entity::find()
            .filter(email_verifications::Column::UserId.eq(reg.user.id))
            .one(&fx.db)
            .await
            .unwrap()
            .unwrap()
            .token;

        AccountService::verify_email(&fx.db, &fx.notifier, &token).await.unwrap();
        assert_eq!(fx.mailer.sent_to("admin@test.local").len(), 1);

        let err = AccountService::verify_email(&fx.db, &fx.notifier, &token).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid or expired verification token");
    }

    #[tokio::test]
    async fn test_change_password() {
        let fx = fixture().await;

        let err = AccountService::change_password(&fx.db, &fx.config, fx.user.id, "wrong", "new-password-1")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Current password is incorrect");

        let err = AccountService::change_password(&fx.db, &fx.config, fx.user.id, TEST_PASSWORD, "short")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        AccountService::change_password(&fx.db, &fx.config, fx.user.id, TEST_PASSWORD, "new-password-1")
            .await
            .unwrap();

        let login = LoginRequest { login: "alice".to_string(), password: "new-password-1".to_string() };
        assert!(AccountService::login(&fx.db, &fx.config, login).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let fx = fixture().await;

        // Email inconnu: succès silencieux
        AccountService::forgot_password(&fx.db, &fx.config, &fx.notifier, "ghost@example.com")
            .await
            .unwrap();
        assert!(fx.mailer.sent().is_empty());

        AccountService::forgot_password(&fx.db, &fx.config, &fx.notifier, "alice@example.com")
            .await
            .unwrap();
        let token = password_reset_tokens::Entity::find()
            .filter(password_reset_tokens::Column::UserId.eq(fx.user.id))
            .one(&fx.db)
            .await
            .unwrap()
            .unwrap()
            .token;
        assert!(fx.mailer.sent_to("alice@example.com")[0].body.contains(&token));

        AccountService::reset_password(&fx.db, &fx.config, &token, "brand-new-pass")
            .await
            .unwrap();
        let err = AccountService::reset_password(&fx.db, &fx.config, &token, "another-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_expired_reset_token() {
        let fx = fixture().await;
        let past = Utc::now().naive_utc() - Duration::hours(2);
        password_reset_tokens::ActiveModel {
            user_id: Set(fx.user.id),
            token: Set("expired-token".to_string()),
            expires_at: Set(past + Duration::hours(1)),
            used: Set(false),
            created_at: Set(past),
            ..Default::default()
        }
        .insert(&fx.db)
        .await
        .unwrap();

        let err = AccountService::reset_password(&fx.db, &fx.config, "expired-token", "brand-new-pass")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Reset link has expired. Please request a new one.");
    }
}
