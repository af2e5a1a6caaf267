use chrono::Utc;
use sea_orm::*;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::AppError;
use crate::models::contact_submissions;
use crate::services::notifications::Notifier;

pub struct ContactService;

pub const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 100, message = "This field is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "This field is required"))]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email_address: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub message: String,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits < MIN_PHONE_DIGITS {
        let mut error = ValidationError::new("phone");
        error.message = Some("Phone number must have at least 10 digits".into());
        return Err(error);
    }
    Ok(())
}

impl ContactService {
    /// Enregistre le message puis prévient la boîte contact (échec toléré)
    pub async fn submit(
        db: &DatabaseConnection,
        notifier: &Notifier,
        form: ContactForm,
    ) -> Result<contact_submissions::Model, AppError> {
        form.validate()?;

        let submission = contact_submissions::ActiveModel {
            first_name: Set(form.first_name.trim().to_string()),
            last_name: Set(form.last_name.trim().to_string()),
            email_address: Set(form.email_address.trim().to_string()),
            phone: Set(form.phone.trim().to_string()),
            message: Set(form.message),
            is_read: Set(false),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        tracing::info!(submission_id = submission.id, "contact form received");

        if let Err(e) = notifier.contact_submission(&submission).await {
            tracing::error!(error = %e, submission_id = submission.id, "contact notification failed");
        }

        Ok(submission)
    }
}
