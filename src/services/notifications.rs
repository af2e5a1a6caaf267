// ============================================================================
// NOTIFICATIONS EMAIL
// ============================================================================
//
// Emails utilisateur:
//   - vérification d'inscription, confirmation de dépôt, retrait approuvé,
//     OTP du PIN de transaction, reset du mot de passe
// Emails admin (échec toléré, seulement loggé):
//   - email vérifié, nouveau dépôt, nouveau retrait, formulaire de contact
//
// ============================================================================

use std::sync::Arc;

use crate::config::MailConfig;
use crate::error::AppError;
use crate::models::{contact_submissions, deposits, users, withdrawals};
use crate::services::mailer::{EmailMessage, Mailer};
use crate::utils::money::format_amount;

const BRAND: &str = "FG Premium Funds";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    mail: MailConfig,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, mail: MailConfig) -> Self {
        Notifier { mailer, mail }
    }

    async fn send(&self, to: &str, subject: String, body: String) -> Result<(), AppError> {
        self.mailer
            .send(EmailMessage {
                from: self.mail.from.clone(),
                to: vec![to.to_string()],
                subject,
                body,
            })
            .await
    }

    /// Envoi "fail silently": l'erreur est loggée, jamais propagée
    async fn send_quietly(&self, to: &str, subject: String, body: String) {
        if let Err(e) = self.send(to, subject, body).await {
            tracing::warn!(error = %e, to, "notification email failed");
        }
    }

    pub async fn verification_email(&self, user: &users::Model, token: &str) -> Result<(), AppError> {
        let url = format!("{}/verify-email?token={}", self.mail.frontend_url, token);
        self.send(
            &user.email,
            format!("Verify your {} account", BRAND),
            format!(
                "Hi {},\n\nPlease verify your email by clicking this link: {}",
                user.first_name, url
            ),
        )
        .await
    }

    pub async fn deposit_confirmed(&self, user: &users::Model, deposit: &deposits::Model) -> Result<(), AppError> {
        self.send(
            &user.email,
            format!("Deposit Confirmation - {}", BRAND),
            format!(
                "Your deposit of ${} has been confirmed.\n\nPayment: {}\nCredited to: {}\nTransaction ID: {}\nDate: {}",
                format_amount(deposit.amount),
                deposit.payment_type.label(),
                deposit.deposit_type.label(),
                deposit.transaction_id.as_deref().unwrap_or("N/A"),
                deposit.created_at.format(DATE_FORMAT),
            ),
        )
        .await
    }

    pub async fn withdrawal_approved(&self, user: &users::Model, withdrawal: &withdrawals::Model) -> Result<(), AppError> {
        self.send(
            &user.email,
            format!("Withdrawal Approved - {}", BRAND),
            format!(
                "Your withdrawal of ${} has been approved.\n\nPayment method: {}\nWallet address: {}\nTransaction ID: {}\nDate: {}",
                format_amount(withdrawal.amount),
                withdrawal.payment_method.label(),
                withdrawal.wallet_address,
                withdrawal.transaction_id.as_deref().unwrap_or("N/A"),
                withdrawal.updated_at.format(DATE_FORMAT),
            ),
        )
        .await
    }

    pub async fn pin_otp(&self, user: &users::Model, otp: &str, ttl_seconds: i64) -> Result<(), AppError> {
        self.send(
            &user.email,
            "Transaction PIN Setup - OTP Verification".to_string(),
            format!(
                "Your OTP for setting up transaction PIN is: {}\nThis code will expire in {} minutes.",
                otp,
                ttl_seconds / 60
            ),
        )
        .await
    }

    pub async fn password_reset(&self, user: &users::Model, token: &str, ttl_minutes: i64) -> Result<(), AppError> {
        let url = format!("{}/reset-password?token={}", self.mail.frontend_url, token);
        self.send(
            &user.email,
            format!("Reset Your Password - {}", BRAND),
            format!(
                "Click here to reset your password: {}\n\nThis link will expire in {} minutes.",
                url, ttl_minutes
            ),
        )
        .await
    }

    pub async fn admin_email_verified(&self, user: &users::Model, verified_at: chrono::NaiveDateTime) {
        self.send_quietly(
            &self.mail.admin,
            format!("New Email Verification - {}", BRAND),
            format!(
                "A user has verified their email address:\nUsername: {}\nEmail: {}\nTime: {}",
                user.username,
                user.email,
                verified_at.format(DATE_FORMAT)
            ),
        )
        .await
    }

    pub async fn admin_new_deposit(&self, user: &users::Model, deposit: &deposits::Model) {
        self.send_quietly(
            &self.mail.admin,
            format!("New Deposit Request - {}", BRAND),
            format!(
                "A new deposit has been initiated:\nUser: {}\nAmount: ${}\nPayment Type: {}\nDeposit Type: {}\nTransaction ID: {}\nTime: {}\n\nPlease review and approve this deposit in the admin panel.",
                user.username,
                format_amount(deposit.amount),
                deposit.payment_type.label(),
                deposit.deposit_type.label(),
                deposit.transaction_id.as_deref().unwrap_or("N/A"),
                deposit.created_at.format(DATE_FORMAT),
            ),
        )
        .await
    }

    pub async fn admin_new_withdrawal(&self, user: &users::Model, withdrawal: &withdrawals::Model) {
        self.send_quietly(
            &self.mail.admin,
            "New Withdrawal Request".to_string(),
            format!(
                "A new withdrawal has been requested:\nUser: {}\nAmount: ${}\nPayment Method: {}\nWallet Address: {}\nTime: {}",
                user.username,
                format_amount(withdrawal.amount),
                withdrawal.payment_method.label(),
                withdrawal.wallet_address,
                withdrawal.created_at.format(DATE_FORMAT),
            ),
        )
        .await
    }

    pub async fn contact_submission(&self, submission: &contact_submissions::Model) -> Result<(), AppError> {
        self.send(
            &self.mail.contact_inbox,
            format!(
                "New Contact Form Submission from {} {}",
                submission.first_name, submission.last_name
            ),
            format!(
                "Name: {} {}\nEmail: {}\nPhone: {}\n\nMessage:\n{}\n\nSubmission ID: {}\nTimestamp: {}",
                submission.first_name,
                submission.last_name,
                submission.email_address,
                submission.phone,
                submission.message,
                submission.id,
                submission.created_at.format(DATE_FORMAT),
            ),
        )
        .await
    }
}
