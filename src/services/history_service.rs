use sea_orm::*;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::dto::{ActivityItem, EarningsPoint, TransactionPage, WithdrawalResponse};
use crate::models::enums::EntryDirection;
use crate::models::{earnings_transactions, transaction_history, withdrawals};
use crate::services::ledger_service::load_profile;

pub struct HistoryService;

pub const RECENT_ACTIVITY_LIMIT: u64 = 5;
const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery { page: default_page(), page_size: default_page_size() }
    }
}

impl HistoryService {
    /// Les 5 dernières lignes d'historique
    pub async fn recent_activity(db: &DatabaseConnection, user_id: i32) -> Result<Vec<ActivityItem>, AppError> {
        let rows = transaction_history::Entity::find()
            .filter(transaction_history::Column::UserId.eq(user_id))
            .order_by_desc(transaction_history::Column::CreatedAt)
            .order_by_desc(transaction_history::Column::Id)
            .limit(RECENT_ACTIVITY_LIMIT)
            .all(db)
            .await?;

        Ok(rows.iter().map(ActivityItem::from).collect())
    }

    /// Historique paginé, plus récent d'abord
    pub async fn transactions(db: &DatabaseConnection, user_id: i32, query: PageQuery) -> Result<TransactionPage, AppError> {
        if query.page == 0 || query.page_size == 0 {
            return Err(AppError::validation("page and page_size must be positive"));
        }
        let page_size = query.page_size.min(MAX_PAGE_SIZE);

        let paginator = transaction_history::Entity::find()
            .filter(transaction_history::Column::UserId.eq(user_id))
            .order_by_desc(transaction_history::Column::CreatedAt)
            .order_by_desc(transaction_history::Column::Id)
            .paginate(db, page_size);

        let total = paginator.num_items().await?;
        // Au-delà de la dernière page (ou offset hors u64): liste vide
        let in_range = (query.page - 1)
            .checked_mul(page_size)
            .is_some_and(|offset| offset < total);
        let rows = if in_range {
            // fetch_page est indexé à partir de 0
            paginator.fetch_page(query.page - 1).await?
        } else {
            Vec::new()
        };

        Ok(TransactionPage {
            transactions: rows.iter().map(ActivityItem::from).collect(),
            total,
            page: query.page,
            total_pages: total.div_ceil(page_size),
        })
    }

    /// Crédits de gains, du plus ancien au plus récent (graphique)
    pub async fn earnings_history(db: &DatabaseConnection, user_id: i32) -> Result<Vec<EarningsPoint>, AppError> {
        let profile = load_profile(db, user_id).await?;

        let rows = earnings_transactions::Entity::find()
            .filter(earnings_transactions::Column::ProfileId.eq(profile.id))
            .filter(earnings_transactions::Column::TransactionType.eq(EntryDirection::Credit))
            .order_by_asc(earnings_transactions::Column::CreatedAt)
            .order_by_asc(earnings_transactions::Column::Id)
            .all(db)
            .await?;

        Ok(rows.iter().map(EarningsPoint::from).collect())
    }

    pub async fn withdrawals(db: &DatabaseConnection, user_id: i32) -> Result<Vec<WithdrawalResponse>, AppError> {
        let rows = withdrawals::Entity::find()
            .filter(withdrawals::Column::UserId.eq(user_id))
            .order_by_desc(withdrawals::Column::CreatedAt)
            .order_by_desc(withdrawals::Column::Id)
            .all(db)
            .await?;

        Ok(rows.iter().map(WithdrawalResponse::from).collect())
    }
}
