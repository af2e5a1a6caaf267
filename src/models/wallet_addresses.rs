// Adresses de dépôt gérées par l'admin et affichées aux utilisateurs.
// Contrainte: (cryptocurrency, network) unique, une seule adresse par défaut
// par cryptomonnaie (géré par WalletAddressService).

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum Cryptocurrency {
    #[sea_orm(string_value = "USDT")]
    Usdt,
    #[sea_orm(string_value = "BTC")]
    Btc,
    #[sea_orm(string_value = "BCH")]
    Bch,
    #[sea_orm(string_value = "ETH")]
    Eth,
    #[sea_orm(string_value = "BNB")]
    Bnb,
    #[sea_orm(string_value = "MATIC")]
    Matic,
    #[sea_orm(string_value = "SOL")]
    Sol,
}

impl Cryptocurrency {
    pub fn label(&self) -> &'static str {
        match self {
            Cryptocurrency::Usdt => "USDT",
            Cryptocurrency::Btc => "Bitcoin",
            Cryptocurrency::Bch => "Bitcoin Cash",
            Cryptocurrency::Eth => "Ethereum",
            Cryptocurrency::Bnb => "Binance Coin",
            Cryptocurrency::Matic => "Polygon",
            Cryptocurrency::Sol => "Solana",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum Network {
    #[sea_orm(string_value = "TRC20")]
    Trc20,
    #[sea_orm(string_value = "ERC20")]
    Erc20,
    #[sea_orm(string_value = "BEP20")]
    Bep20,
    #[sea_orm(string_value = "BITCOIN")]
    Bitcoin,
    #[sea_orm(string_value = "BCH")]
    Bch,
    #[sea_orm(string_value = "POLYGON")]
    Polygon,
    #[sea_orm(string_value = "SOLANA")]
    Solana,
}

impl Network {
    pub fn label(&self) -> &'static str {
        match self {
            Network::Trc20 => "TRON (TRC-20)",
            Network::Erc20 => "Ethereum (ERC-20)",
            Network::Bep20 => "BNB Smart Chain (BEP-20)",
            Network::Bitcoin => "Bitcoin Network",
            Network::Bch => "Bitcoin Cash Network",
            Network::Polygon => "Polygon Network",
            Network::Solana => "Solana Network",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum WalletStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cryptocurrency: Cryptocurrency,
    pub network: Network,
    pub address: String,
    pub qr_code: Option<String>,
    pub status: WalletStatus,
    pub memo: Option<String>, // memo/tag pour certaines cryptos
    pub description: String,
    pub is_default: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.cryptocurrency.label(), self.network.label())
    }
}
