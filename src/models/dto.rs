// Objets de réponse de l'API (enveloppe + vues des modèles)
use serde::Serialize;

use crate::models::enums::PaymentMethod;
use crate::models::transaction_history::{HistoryStatus, TransactionKind};
use crate::models::wallet_addresses::{Cryptocurrency, Network, WalletStatus};
use crate::models::withdrawals::WithdrawalStatus;
use crate::models::{deposits, earnings_transactions, transaction_history, users, wallet_addresses, withdrawals};
use crate::utils::money::{format_amount, format_dollars};

/// Enveloppe de succès: {"status": "success", "message": ..., "data": ...}
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        ApiResponse { status: "success", message: None, data: Some(data) }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        ApiResponse { status: "success", message: Some(message.into()), data: Some(data) }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse { status: "success", message: Some(message.into()), data: None }
    }
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&users::Model> for UserInfo {
    fn from(user: &users::Model) -> Self {
        UserInfo {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserInfo,
    pub tokens: TokenPair,
}

/// Vue du profil: tous les montants formatés "0.00"
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub balance: String,
    pub earnings: String,
    #[serde(rename = "ADA")]
    pub ada: String,
    pub avail_balance: String,
    #[serde(rename = "Tax_balance")]
    pub tax_balance: String,
    pub deposit: String,
    pub total_deposits: String,
    pub total_withdrawals: String,
    pub has_transaction_pin: bool,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct DepositResponse {
    pub id: i32,
    pub amount: String,
    pub payment_type: PaymentMethod,
    pub deposit_type: deposits::DepositType,
    pub status: deposits::DepositStatus,
    pub transaction_id: Option<String>,
}

impl From<&deposits::Model> for DepositResponse {
    fn from(d: &deposits::Model) -> Self {
        DepositResponse {
            id: d.id,
            amount: format_amount(d.amount),
            payment_type: d.payment_type,
            deposit_type: d.deposit_type,
            status: d.status,
            transaction_id: d.transaction_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WithdrawalResponse {
    pub id: i32,
    pub amount: String,
    pub payment_method: PaymentMethod,
    pub wallet_address: String,
    pub status: WithdrawalStatus,
    pub transaction_id: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl From<&withdrawals::Model> for WithdrawalResponse {
    fn from(w: &withdrawals::Model) -> Self {
        WithdrawalResponse {
            id: w.id,
            amount: format_amount(w.amount),
            payment_method: w.payment_method,
            wallet_address: w.wallet_address.clone(),
            status: w.status,
            transaction_id: w.transaction_id.clone(),
            created_at: w.created_at,
        }
    }
}

/// Ligne d'activité: {"amount": "$150.00", "time": "05 Mar, 14:30"}
#[derive(Debug, Serialize)]
pub struct ActivityItem {
    pub transaction_type: TransactionKind,
    pub amount: String,
    pub description: String,
    pub status: HistoryStatus,
    pub time: String,
}

impl From<&transaction_history::Model> for ActivityItem {
    fn from(row: &transaction_history::Model) -> Self {
        ActivityItem {
            transaction_type: row.transaction_type,
            amount: format_dollars(row.amount),
            description: row.description.clone(),
            status: row.status,
            time: row.created_at.format("%d %b, %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<ActivityItem>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

/// Point du graphique des gains: {"date": "05 Mar", "value": "25.00"}
#[derive(Debug, Serialize)]
pub struct EarningsPoint {
    pub date: String,
    pub value: String,
}

impl From<&earnings_transactions::Model> for EarningsPoint {
    fn from(row: &earnings_transactions::Model) -> Self {
        EarningsPoint {
            date: row.created_at.format("%d %b").to_string(),
            value: format_amount(row.amount),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WalletAddressResponse {
    pub id: i32,
    pub cryptocurrency: Cryptocurrency,
    pub network: Network,
    pub address: String,
    pub qr_code: Option<String>,
    pub status: WalletStatus,
    pub memo: Option<String>,
    pub description: String,
    pub is_default: bool,
}

impl From<&wallet_addresses::Model> for WalletAddressResponse {
    fn from(w: &wallet_addresses::Model) -> Self {
        WalletAddressResponse {
            id: w.id,
            cryptocurrency: w.cryptocurrency,
            network: w.network,
            address: w.address.clone(),
            qr_code: w.qr_code.clone(),
            status: w.status,
            memo: w.memo.clone(),
            description: w.description.clone(),
            is_default: w.is_default,
        }
    }
}
