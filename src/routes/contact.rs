use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::models::dto::ApiResponse;
use crate::services::contact_service::{ContactForm, ContactService};
use crate::services::notifications::Notifier;

/// POST /api/contact - Formulaire de contact (PUBLIC)
#[post("/contact")]
pub async fn submit_contact(
    body: web::Json<ContactForm>,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    let submission = ContactService::submit(&db, &notifier, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        "Thank you for your message. We will get back to you soon.",
        serde_json::json!({ "submission_id": submission.id }),
    )))
}
