use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::Rng;
use base64::{Engine, engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD}};

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Nombre d'itérations par défaut (auth.password_iterations)
pub const DEFAULT_ITERATIONS: u32 = 260000;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

/// Longueur minimale d'un mot de passe
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash un mot de passe: PBKDF2-HMAC-SHA256, salt aléatoire de 16 bytes.
/// Format stocké: pbkdf2:sha256:iterations$salt$hash (base64 URL-safe sans padding)
pub fn hash_password(password: &str, iterations: u32) -> Result<String, AppError> {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut key)
        .map_err(|e| AppError::Password(e.to_string()))?;

    let salt_b64 = URL_SAFE_NO_PAD.encode(salt);
    let hash_b64 = URL_SAFE_NO_PAD.encode(key);

    Ok(format!("pbkdf2:sha256:{}${}${}", iterations, salt_b64, hash_b64))
}

/// Vérifie un mot de passe contre un hash stocké.
/// Un hash mal formé est une erreur, un mauvais mot de passe renvoie Ok(false).
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let invalid = || AppError::Password("Invalid hash format".to_string());

    let mut parts = stored_hash.split('$');
    let (header, salt_str, hash_str) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(s), Some(k), None) => (h, s, k),
        _ => return Err(invalid()),
    };

    let iterations = match header.split(':').collect::<Vec<_>>().as_slice() {
        ["pbkdf2", "sha256", iterations] => iterations.parse::<u32>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    let salt = decode_flexible(salt_str).ok_or_else(invalid)?;
    let expected_hash = decode_flexible(hash_str).ok_or_else(invalid)?;

    let mut computed = vec![0u8; expected_hash.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
        .map_err(|e| AppError::Password(e.to_string()))?;

    Ok(constant_time_eq(&computed, &expected_hash))
}

/// Comparaison en temps constant via HMAC (verify_slice)
fn constant_time_eq(computed: &[u8], expected: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(b"password-compare") else {
        return false;
    };
    mac.update(computed);
    let tag = mac.finalize().into_bytes();

    let Ok(mut check) = HmacSha256::new_from_slice(b"password-compare") else {
        return false;
    };
    check.update(expected);
    check.verify_slice(&tag).is_ok()
}

/// Décode le salt/hash: base64 URL-safe (format actuel), base64 standard ou hex
fn decode_flexible(input: &str) -> Option<Vec<u8>> {
    if input.len() == KEY_LENGTH * 2 && input.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(input).ok();
    }

    URL_SAFE_NO_PAD
        .decode(input)
        .or_else(|_| STANDARD.decode(input))
        .ok()
}
