use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::AdminUser;
use crate::models::deposits::DepositStatus;
use crate::models::dto::{ApiResponse, DepositResponse, WalletAddressResponse, WithdrawalResponse};
use crate::models::wallet_addresses::WalletStatus;
use crate::models::withdrawals::WithdrawalStatus;
use crate::services::ledger_service::{EntryOutcome, LedgerEntry, LedgerService};
use crate::services::notifications::Notifier;
use crate::services::wallet_address_service::{NewWalletAddress, WalletAddressService};
use crate::utils::money::format_amount;

#[derive(Deserialize)]
pub struct DepositStatusRequest {
    pub status: DepositStatus,
    pub transaction_id: Option<String>,
}

#[derive(Deserialize)]
pub struct WithdrawalStatusRequest {
    pub status: WithdrawalStatus,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct WalletStatusRequest {
    pub status: WalletStatus,
}

/// POST /api/admin/deposits/{id}/status - "completed" crédite le solde une seule fois
#[post("/deposits/{id}/status")]
pub async fn set_deposit_status(
    admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<DepositStatusRequest>,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    let deposit_id = path.into_inner();
    let body = body.into_inner();
    tracing::info!(admin_id = admin.0.user_id, deposit_id, status = %body.status, "deposit status requested");

    let outcome = LedgerService::set_deposit_status(&db, &notifier, deposit_id, body.status, body.transaction_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(serde_json::json!({
        "deposit": DepositResponse::from(&outcome.deposit),
        "credited": outcome.credited.is_some(),
        "new_balance": outcome.credited.map(|c| format_amount(c.new)),
    }))))
}

/// POST /api/admin/withdrawals/{id}/status - "rejected" rembourse avail_balance
#[post("/withdrawals/{id}/status")]
pub async fn set_withdrawal_status(
    admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<WithdrawalStatusRequest>,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, AppError> {
    let withdrawal_id = path.into_inner();
    let body = body.into_inner();
    tracing::info!(admin_id = admin.0.user_id, withdrawal_id, status = %body.status, "withdrawal status requested");

    let outcome = LedgerService::set_withdrawal_status(
        &db,
        &notifier,
        withdrawal_id,
        body.status,
        body.transaction_id,
        body.notes,
    )
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(serde_json::json!({
        "withdrawal": WithdrawalResponse::from(&outcome.withdrawal),
        "refunded": outcome.change.is_some(),
    }))))
}

/// POST /api/admin/ledger/entries - Crédit / débit ADA, tax ou earnings
#[post("/ledger/entries")]
pub async fn post_entry(
    _admin: AdminUser,
    body: web::Json<LedgerEntry>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let outcome = LedgerService::post_entry(&db, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::data(entry_json(&outcome))))
}

/// POST /api/admin/ledger/adjustments - Correction de balance / avail_balance
#[post("/ledger/adjustments")]
pub async fn adjust_balance(
    _admin: AdminUser,
    body: web::Json<LedgerEntry>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let outcome = LedgerService::adjust_balance(&db, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::data(entry_json(&outcome))))
}

fn entry_json(outcome: &EntryOutcome) -> serde_json::Value {
    serde_json::json!({
        "field": outcome.change.field,
        "previous_balance": format_amount(outcome.change.previous),
        "new_balance": format_amount(outcome.change.new),
        "history_id": outcome.history.id,
        "description": outcome.history.description,
    })
}

/// POST /api/admin/wallets - Nouvelle adresse de dépôt
#[post("/wallets")]
pub async fn create_wallet(
    _admin: AdminUser,
    body: web::Json<NewWalletAddress>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let wallet = WalletAddressService::create(&db, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::data(WalletAddressResponse::from(&wallet))))
}

/// POST /api/admin/wallets/{id}/status - active / inactive / maintenance
#[post("/wallets/{id}/status")]
pub async fn set_wallet_status(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<WalletStatusRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let wallet = WalletAddressService::set_status(&db, path.into_inner(), body.status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(WalletAddressResponse::from(&wallet))))
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(set_deposit_status)
            .service(set_withdrawal_status)
            .service(post_entry)
            .service(adjust_balance)
            .service(create_wallet)
            .service(set_wallet_status),
    );
}
