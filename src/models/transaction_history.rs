// ============================================================================
// MODÈLE : TRANSACTION HISTORY
// ============================================================================
//
// Description:
//   Journal d'audit: une ligne par mouvement de solde.
//   previous_balance / new_balance concernent le solde touché par la ligne
//   (balance, avail_balance, ada, tax_balance ou earnings selon le type).
//
// Liaison avec la source:
//   - source_id    : id du dépôt / retrait qui a créé la ligne
//   - reference_id : identifiant externe de transaction (hash, référence virement)
//   La ligne d'un dépôt est retrouvée par (user_id, type, source_id), jamais
//   par reference_id qui peut être NULL.
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[sea_orm(string_value = "deposit")]
    Deposit,
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
    #[sea_orm(string_value = "ada_update")]
    AdaUpdate,
    #[sea_orm(string_value = "tax_update")]
    TaxUpdate,
    #[sea_orm(string_value = "earnings_update")]
    EarningsUpdate,
    #[sea_orm(string_value = "balance_update")]
    BalanceUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HistoryStatus::Pending => "pending",
            HistoryStatus::Completed => "completed",
            HistoryStatus::Failed => "failed",
            HistoryStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub transaction_type: TransactionKind,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub previous_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub new_balance: Decimal,
    pub status: HistoryStatus,
    pub description: String,
    pub reference_id: Option<String>,
    pub source_id: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
