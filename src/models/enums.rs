// Énumérations partagées par les tables du ledger.
// Stockées en texte (string_value) pour rester lisibles dans la BD.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Moyen de paiement d'un dépôt ou d'un retrait
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "USDT")]
    Usdt,
    #[sea_orm(string_value = "BTC")]
    Btc,
    #[sea_orm(string_value = "BCH")]
    Bch,
    #[sea_orm(string_value = "ETH")]
    Eth,
    #[sea_orm(string_value = "WIRE")]
    Wire,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Usdt => "USDT (TRC-20)",
            PaymentMethod::Btc => "BTC",
            PaymentMethod::Bch => "BCH",
            PaymentMethod::Eth => "ETH",
            PaymentMethod::Wire => "Wire Transfer",
        }
    }
}

/// Sens d'une écriture sur un solde
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    #[sea_orm(string_value = "credit")]
    Credit,
    #[sea_orm(string_value = "debit")]
    Debit,
}

impl EntryDirection {
    /// Applique l'écriture à un solde
    pub fn apply(&self, balance: Decimal, amount: Decimal) -> Decimal {
        match self {
            EntryDirection::Credit => balance + amount,
            EntryDirection::Debit => balance - amount,
        }
    }
}

impl fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryDirection::Credit => write!(f, "credit"),
            EntryDirection::Debit => write!(f, "debit"),
        }
    }
}
