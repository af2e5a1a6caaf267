use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::enums::EntryDirection;

/// Origine d'un gain
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum EarningsSource {
    #[sea_orm(string_value = "investment")]
    Investment,
    #[sea_orm(string_value = "referral")]
    Referral,
    #[sea_orm(string_value = "bonus")]
    Bonus,
    #[sea_orm(string_value = "other")]
    Other,
}

impl EarningsSource {
    pub fn label(&self) -> &'static str {
        match self {
            EarningsSource::Investment => "Investment Return",
            EarningsSource::Referral => "Referral Bonus",
            EarningsSource::Bonus => "Bonus",
            EarningsSource::Other => "Other",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "earnings_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub profile_id: i32,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    pub transaction_type: EntryDirection,
    pub description: String,
    pub source: EarningsSource,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ProfileId",
        to = "super::profiles::Column::Id",
        on_delete = "Cascade"
    )]
    Profile,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
