use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;
use std::fmt;

use super::enums::PaymentMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DepositStatus::Pending => "pending",
            DepositStatus::Completed => "completed",
            DepositStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Solde crédité quand le dépôt est complété
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum DepositType {
    #[sea_orm(string_value = "tax")]
    Tax,
    #[sea_orm(string_value = "fund")]
    Fund,
    #[sea_orm(string_value = "ada")]
    Ada,
}

impl DepositType {
    pub fn label(&self) -> &'static str {
        match self {
            DepositType::Tax => "Tax",
            DepositType::Fund => "Balance",
            DepositType::Ada => "ADA",
        }
    }

    /// Nom du solde crédité, utilisé dans la description de l'historique
    pub fn balance_label(&self) -> &'static str {
        match self {
            DepositType::Tax => "Tax Balance",
            DepositType::Fund => "Balance",
            DepositType::Ada => "ADA Balance",
        }
    }
}

impl Default for DepositType {
    fn default() -> Self {
        DepositType::Fund
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deposits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub payment_type: PaymentMethod,
    pub deposit_type: DepositType,
    pub status: DepositStatus,
    pub transaction_id: Option<String>,
    pub proof_of_payment: Option<String>, // chemin / URL du justificatif
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
