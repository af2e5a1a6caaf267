use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;
use crate::models::wallet_addresses::{self, Cryptocurrency, Network, WalletStatus};

/// Adresses de dépôt gérées par l'admin et affichées aux utilisateurs
pub struct WalletAddressService;

#[derive(Debug, Deserialize, Validate)]
pub struct NewWalletAddress {
    pub cryptocurrency: Cryptocurrency,
    pub network: Network,
    #[validate(length(min = 1, max = 255, message = "Address is required"))]
    pub address: String,
    pub qr_code: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
}

impl WalletAddressService {
    pub async fn list_active(db: &DatabaseConnection) -> Result<Vec<wallet_addresses::Model>, AppError> {
        let wallets = wallet_addresses::Entity::find()
            .filter(wallet_addresses::Column::Status.eq(WalletStatus::Active))
            .order_by_asc(wallet_addresses::Column::Cryptocurrency)
            .order_by_asc(wallet_addresses::Column::Network)
            .all(db)
            .await?;
        Ok(wallets)
    }

    /// Crée une adresse. Une seule adresse par défaut par cryptomonnaie:
    /// les autres perdent leur flag dans la même transaction.
    pub async fn create(db: &DatabaseConnection, request: NewWalletAddress) -> Result<wallet_addresses::Model, AppError> {
        request.validate()?;

        let txn = db.begin().await?;

        let existing = wallet_addresses::Entity::find()
            .filter(wallet_addresses::Column::Cryptocurrency.eq(request.cryptocurrency))
            .filter(wallet_addresses::Column::Network.eq(request.network))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(duplicate_pair(request.cryptocurrency, request.network));
        }

        if request.is_default {
            wallet_addresses::Entity::update_many()
                .col_expr(wallet_addresses::Column::IsDefault, Expr::value(false))
                .filter(wallet_addresses::Column::Cryptocurrency.eq(request.cryptocurrency))
                .exec(&txn)
                .await?;
        }

        let (cryptocurrency, network) = (request.cryptocurrency, request.network);
        let now = Utc::now().naive_utc();
        let wallet = wallet_addresses::ActiveModel {
            cryptocurrency: Set(request.cryptocurrency),
            network: Set(request.network),
            address: Set(request.address.trim().to_string()),
            qr_code: Set(request.qr_code),
            status: Set(WalletStatus::Active),
            memo: Set(request.memo.filter(|m| !m.trim().is_empty())),
            description: Set(request.description),
            is_default: Set(request.is_default),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| unique_violation_as_conflict(e, cryptocurrency, network))?;

        txn.commit().await?;
        tracing::info!(wallet_id = wallet.id, wallet = %wallet.display_name(), "wallet address created");

        Ok(wallet)
    }

    pub async fn set_status(
        db: &DatabaseConnection,
        wallet_id: i32,
        status: WalletStatus,
    ) -> Result<wallet_addresses::Model, AppError> {
        let wallet = wallet_addresses::Entity::find_by_id(wallet_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Wallet address not found"))?;

        let mut active: wallet_addresses::ActiveModel = wallet.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now().naive_utc());
        let wallet = active.update(db).await?;

        tracing::info!(wallet_id, status = ?status, "wallet address status changed");
        Ok(wallet)
    }
}

fn duplicate_pair(cryptocurrency: Cryptocurrency, network: Network) -> AppError {
    AppError::Conflict(format!(
        "A wallet address already exists for {} on {}",
        cryptocurrency.label(),
        network.label()
    ))
}

/// Création concurrente: l'index unique (cryptocurrency, network) tranche
fn unique_violation_as_conflict(err: DbErr, cryptocurrency: Cryptocurrency, network: Network) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => duplicate_pair(cryptocurrency, network),
        _ => AppError::from(err),
    }
}
