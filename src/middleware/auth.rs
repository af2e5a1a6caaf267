use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::utils::jwt::{self, TokenType};

/// Infos de l'utilisateur authentifié (access token valide)
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub is_staff: bool,
}

/// Utilisateur authentifié ET staff (routes /api/admin)
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = authenticate(req).and_then(|user| {
            if user.is_staff {
                Ok(AdminUser(user))
            } else {
                tracing::warn!(user_id = user.user_id, path = %req.path(), "admin route refused");
                Err(AppError::Forbidden("Admin access required".to_string()))
            }
        });
        ready(result)
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let config = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| AppError::Token("Authentication is not configured".to_string()))?;

    // 1. Header Authorization
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    // 2. Format "Bearer <token>"
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization format (expected: Bearer <token>)".to_string()))?;

    // 3. Access token uniquement (un refresh token est refusé)
    let claims = jwt::verify_token(&config.auth, token, TokenType::Access)?;

    Ok(AuthUser {
        user_id: claims.sub,
        username: claims.username,
        is_staff: claims.is_staff,
    })
}
