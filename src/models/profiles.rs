// ============================================================================
// MODÈLE : PROFILES
// ============================================================================
//
// Description:
//   Profil 1:1 avec users. Contient les soldes dénormalisés du compte.
//   Les soldes ne sont JAMAIS modifiés directement par les routes: toute
//   modification passe par LedgerService qui écrit la ligne d'historique
//   correspondante dans la même transaction SQL.
//
// Soldes:
//   - balance       : solde principal (dépôts "fund")
//   - earnings      : gains (investissement, parrainage, bonus)
//   - ada           : solde ADA (dépôts "ada")
//   - avail_balance : solde retirable (débité à la création d'un retrait)
//   - tax_balance   : solde taxes (dépôts "tax")
//   - deposit       : montant de dépôt affiché (géré par l'admin)
//
// PIN de transaction:
//   - transaction_pin : 6 chiffres, requis pour les retraits
//   - pin_otp / pin_otp_created : OTP envoyé par email, valide 600 secondes
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub phone_number: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub earnings: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub ada: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub avail_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub tax_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub deposit: Decimal,
    #[serde(skip_serializing)]
    pub transaction_pin: Option<String>,
    #[serde(skip_serializing)]
    pub pin_otp: Option<String>,
    #[serde(skip_serializing)]
    pub pin_otp_created: Option<DateTime>,
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

    #[sea_orm(has_many = "super::ada_transactions::Entity")]
    AdaTransactions,

    #[sea_orm(has_many = "super::tax_transactions::Entity")]
    TaxTransactions,

    #[sea_orm(has_many = "super::earnings_transactions::Entity")]
    EarningsTransactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::ada_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdaTransactions.def()
    }
}

impl Related<super::tax_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxTransactions.def()
    }
}

impl Related<super::earnings_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EarningsTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn has_transaction_pin(&self) -> bool {
        self.transaction_pin.as_deref().is_some_and(|pin| !pin.is_empty())
    }
}
