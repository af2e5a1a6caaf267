use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::ApiResponse;
use crate::services::notifications::Notifier;
use crate::services::profile_service::{ProfileService, ProfileUpdate, SetPinRequest};

/// GET /api/auth/profile - Soldes et totaux de l'utilisateur
#[get("/profile")]
pub async fn get_profile(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let profile = ProfileService::summary(&db, auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(profile)))
}

/// POST /api/auth/profile/update - first_name, last_name, phone_number
#[post("/profile/update")]
pub async fn update_profile(
    auth_user: AuthUser,
    body: web::Json<ProfileUpdate>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let profile = ProfileService::update(&db, auth_user.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message("Profile updated successfully", profile)))
}

/// POST /api/auth/transaction-pin/request-otp
#[post("/transaction-pin/request-otp")]
pub async fn request_pin_otp(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    ProfileService::request_pin_otp(&db, &config, &notifier, auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("OTP has been sent to your email")))
}

/// POST /api/auth/transaction-pin/set - otp, pin, confirm_pin
#[post("/transaction-pin/set")]
pub async fn set_transaction_pin(
    auth_user: AuthUser,
    body: web::Json<SetPinRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    ProfileService::set_transaction_pin(&db, &config, auth_user.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Transaction PIN set successfully")))
}

pub fn profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_profile)
        .service(update_profile)
        .service(request_pin_otp)
        .service(set_transaction_pin);
}
