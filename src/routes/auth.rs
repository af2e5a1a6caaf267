use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{ApiResponse, AuthPayload, UserInfo};
use crate::services::account_service::{AccountService, LoginRequest, RegisterRequest};
use crate::services::notifications::Notifier;

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Deserialize)]
pub struct VerifyEmailQuery {
    #[serde(default)]
    pub token: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    let registration = AccountService::register(&db, &config, &notifier, body.into_inner()).await?;

    let message = if registration.email_sent {
        "Registration successful. Please check your email to verify your account."
    } else {
        "Registration successful. Please contact support to verify your account."
    };

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        message,
        serde_json::json!({
            "user": UserInfo::from(&registration.user),
            "tokens": registration.tokens,
            "email_sent": registration.email_sent,
        }),
    )))
}

/// POST /api/auth/login - Se connecter avec username ou email (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let (user, tokens) = AccountService::login(&db, &config, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(AuthPayload {
        user: UserInfo::from(&user),
        tokens,
    })))
}

/// POST /api/auth/token/refresh - Nouveau access token (PUBLIC)
#[post("/token/refresh")]
pub async fn refresh_token(
    body: web::Json<RefreshRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let access = AccountService::refresh(&db, &config, &body.refresh).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "access": access })))
}

/// GET /api/auth/verify-email?token=xxx (PUBLIC)
#[get("/verify-email")]
pub async fn verify_email(
    query: web::Query<VerifyEmailQuery>,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    AccountService::verify_email(&db, &notifier, &query.token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Email verified successfully")))
}

/// POST /api/auth/change-password (PROTÉGÉE)
#[post("/change-password")]
pub async fn change_password(
    auth_user: AuthUser,
    body: web::Json<ChangePasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let tokens = AccountService::change_password(
        &db,
        &config,
        auth_user.user_id,
        &body.current_password,
        &body.new_password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        "Password changed successfully. Please login with your new password.",
        serde_json::json!({ "tokens": tokens }),
    )))
}

/// POST /api/auth/forgot-password (PUBLIC) - même réponse que l'email existe ou non
#[post("/forgot-password")]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    AccountService::forgot_password(&db, &config, &notifier, &body.email).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message(
        "If an account exists with this email, you will receive reset instructions.",
    )))
}

/// POST /api/auth/reset-password (PUBLIC)
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let (user, tokens) = AccountService::reset_password(&db, &config, &body.token, &body.password).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        "Password has been reset successfully",
        AuthPayload { user: UserInfo::from(&user), tokens },
    )))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(refresh_token)
        .service(verify_email)
        .service(change_password)
        .service(forgot_password)
        .service(reset_password);
}
