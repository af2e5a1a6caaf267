// connexion BD + création du schéma

use sea_orm::sea_query::{Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::models::{
    ada_transactions, contact_submissions, deposits, earnings_transactions, email_verifications,
    password_reset_tokens, profiles, tax_transactions, transaction_history, users,
    wallet_addresses, withdrawals,
};

pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;

    if config.create_schema {
        create_schema(&db).await?;
    }

    Ok(db)
}

/// Crée les tables manquantes à partir des entités (ordre: parents d'abord)
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, users::Entity).await?;
    create_table(db, &schema, profiles::Entity).await?;
    create_table(db, &schema, deposits::Entity).await?;
    create_table(db, &schema, withdrawals::Entity).await?;
    create_table(db, &schema, transaction_history::Entity).await?;
    create_table(db, &schema, ada_transactions::Entity).await?;
    create_table(db, &schema, tax_transactions::Entity).await?;
    create_table(db, &schema, earnings_transactions::Entity).await?;
    create_table(db, &schema, wallet_addresses::Entity).await?;
    create_table(db, &schema, email_verifications::Entity).await?;
    create_table(db, &schema, password_reset_tokens::Entity).await?;
    create_table(db, &schema, contact_submissions::Entity).await?;

    // Une seule adresse par (cryptocurrency, network)
    let unique_wallet: IndexCreateStatement = Index::create()
        .name("idx_wallet_addresses_crypto_network")
        .table(wallet_addresses::Entity)
        .col(wallet_addresses::Column::Cryptocurrency)
        .col(wallet_addresses::Column::Network)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(db.get_database_backend().build(&unique_wallet)).await?;

    // Recherche de la ligne d'historique d'un dépôt / retrait
    let history_source: IndexCreateStatement = Index::create()
        .name("idx_transaction_history_source")
        .table(transaction_history::Entity)
        .col(transaction_history::Column::UserId)
        .col(transaction_history::Column::TransactionType)
        .col(transaction_history::Column::SourceId)
        .if_not_exists()
        .to_owned();
    db.execute(db.get_database_backend().build(&history_source)).await?;

    Ok(())
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    let mut statement: TableCreateStatement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(db.get_database_backend().build(&statement)).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_connection() -> DatabaseConnection {
    // Une seule connexion: chaque connexion ":memory:" est une base distincte
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("sqlite in-memory connection");
    create_schema(&db).await.expect("schema creation");
    db
}
