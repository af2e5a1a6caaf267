use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Transport des emails. L'implémentation est choisie au démarrage.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), AppError>;
}

/// Écrit les emails dans les logs au lieu de les envoyer.
///
/// Seul `Mailer` branché dans `main`: aucun transport SMTP n'est câblé,
/// les emails de vérification, de reset et d'OTP ne sont donc jamais livrés.
/// Un vrai transport s'ajoute en implémentant `Mailer`.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), AppError> {
        tracing::info!(
            from = %message.from,
            to = ?message.to,
            subject = %message.subject,
            "email sent"
        );
        tracing::debug!(body = %message.body, "email body");
        Ok(())
    }
}

/// Garde les emails en mémoire (tests, développement local)
#[derive(Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mailer qui échoue à chaque envoi
    pub fn failing() -> Self {
        MemoryMailer { outbox: Mutex::new(Vec::new()), fail: true }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.outbox.lock().map(|outbox| outbox.clone()).unwrap_or_default()
    }

    pub fn sent_to(&self, address: &str) -> Vec<EmailMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.to.iter().any(|to| to == address))
            .collect()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Mail("SMTP connection refused".to_string()));
        }
        self.outbox
            .lock()
            .map_err(|_| AppError::Mail("outbox poisoned".to_string()))?
            .push(message);
        Ok(())
    }
}
