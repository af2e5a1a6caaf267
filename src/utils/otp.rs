use chrono::{Duration, NaiveDateTime};
use rand::Rng;

pub const OTP_LENGTH: usize = 6;

/// Code à 6 chiffres (zéros de tête possibles)
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Vrai si l'OTP créé à `created_at` est plus vieux que `ttl_seconds`
pub fn is_expired(created_at: NaiveDateTime, now: NaiveDateTime, ttl_seconds: i64) -> bool {
    now - created_at > Duration::seconds(ttl_seconds)
}

/// Un PIN de transaction fait exactement 6 chiffres
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == OTP_LENGTH && pin.chars().all(|c| c.is_ascii_digit())
}
