use actix_web::{post, web, HttpResponse};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::deposits::DepositType;
use crate::models::dto::{ApiResponse, DepositResponse};
use crate::models::enums::PaymentMethod;
use crate::services::ledger_service::{LedgerService, NewDeposit};
use crate::services::notifications::Notifier;

// DTO pour une demande de dépôt
#[derive(Deserialize)]
pub struct CreateDepositRequest {
    pub amount: Decimal,
    pub payment_type: PaymentMethod,
    #[serde(default)]
    pub deposit_type: DepositType,
    /// Référence du justificatif déjà uploadé
    pub proof_of_payment: Option<String>,
    pub transaction_id: Option<String>,
}

/// POST /api/auth/deposits/create - Le solde est crédité à la validation admin
#[post("/deposits/create")]
pub async fn create_deposit(
    auth_user: AuthUser,
    body: web::Json<CreateDepositRequest>,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let deposit = LedgerService::create_deposit(
        &db,
        &notifier,
        auth_user.user_id,
        NewDeposit {
            amount: body.amount,
            payment_type: body.payment_type,
            deposit_type: body.deposit_type,
            proof_of_payment: body.proof_of_payment,
            transaction_id: body.transaction_id,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        "Deposit request submitted successfully",
        DepositResponse::from(&deposit),
    )))
}

pub fn deposit_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_deposit);
}
