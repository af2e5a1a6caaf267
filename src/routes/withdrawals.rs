use actix_web::{get, post, web, HttpResponse};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{ApiResponse, WithdrawalResponse};
use crate::models::enums::PaymentMethod;
use crate::services::history_service::HistoryService;
use crate::services::ledger_service::{LedgerService, NewWithdrawal};
use crate::services::notifications::Notifier;
use crate::utils::money::format_amount;

// DTO pour une demande de retrait
#[derive(Deserialize)]
pub struct CreateWithdrawalRequest {
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub wallet_address: String,
    pub transaction_pin: Option<String>,
}

/// GET /api/auth/withdrawals - Retraits de l'utilisateur, plus récent d'abord
#[get("/withdrawals")]
pub async fn list_withdrawals(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let withdrawals = HistoryService::withdrawals(&db, auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(withdrawals)))
}

/// POST /api/auth/withdrawals/create - PIN requis, avail_balance débité immédiatement
#[post("/withdrawals/create")]
pub async fn create_withdrawal(
    auth_user: AuthUser,
    body: web::Json<CreateWithdrawalRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let outcome = LedgerService::create_withdrawal(
        &db,
        &notifier,
        config.ledger.min_withdrawal,
        auth_user.user_id,
        NewWithdrawal {
            amount: body.amount,
            payment_method: body.payment_method,
            wallet_address: body.wallet_address,
            transaction_pin: body.transaction_pin,
        },
    )
    .await?;

    let avail_balance = outcome.change.map(|c| format_amount(c.new));

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        "Withdrawal request submitted successfully",
        serde_json::json!({
            "withdrawal": WithdrawalResponse::from(&outcome.withdrawal),
            "profile": { "avail_balance": avail_balance },
        }),
    )))
}

pub fn withdrawal_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_withdrawals).service(create_withdrawal);
}
