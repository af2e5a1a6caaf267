use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::models::dto::TokenPair;
use crate::models::users;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub username: String,
    pub is_staff: bool,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,        // expiration timestamp
}

/// Génère un JWT (access ou refresh) pour un utilisateur
pub fn generate_token(
    auth: &AuthConfig,
    user: &users::Model,
    token_type: TokenType,
) -> Result<String, AppError> {
    let lifetime = match token_type {
        TokenType::Access => Duration::minutes(auth.access_ttl_minutes),
        TokenType::Refresh => Duration::days(auth.refresh_ttl_days),
    };

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(lifetime)
        .ok_or_else(|| AppError::Token("Failed to calculate expiration".to_string()))?
        .timestamp();

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        is_staff: user.is_staff,
        token_type,
        iat: now.timestamp(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
        .map_err(|e| AppError::Token(format!("Failed to generate token: {}", e)))
}

/// Génère la paire refresh + access renvoyée au login
pub fn issue_pair(auth: &AuthConfig, user: &users::Model) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        refresh: generate_token(auth, user, TokenType::Refresh)?,
        access: generate_token(auth, user, TokenType::Access)?,
    })
}

/// Vérifie et décode un JWT, en exigeant le type attendu
pub fn verify_token(
    auth: &AuthConfig,
    token: &str,
    expected: TokenType,
) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| AppError::Token(format!("Invalid token: {}", e)))?;

    if claims.token_type != expected {
        return Err(AppError::Token("Invalid token: wrong token type".to_string()));
    }

    Ok(claims)
}
