use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::ApiResponse;
use crate::services::history_service::{HistoryService, PageQuery};

/// GET /api/auth/earnings-history - Points du graphique des gains
#[get("/earnings-history")]
pub async fn earnings_history(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let points = HistoryService::earnings_history(&db, auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(points)))
}

/// GET /api/auth/recent-activity - 5 dernières opérations
#[get("/recent-activity")]
pub async fn recent_activity(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let items = HistoryService::recent_activity(&db, auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(items)))
}

/// GET /api/auth/transactions?page=1&page_size=10
#[get("/transactions")]
pub async fn all_transactions(
    auth_user: AuthUser,
    query: web::Query<PageQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let page = HistoryService::transactions(&db, auth_user.user_id, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(page)))
}

pub fn transaction_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(earnings_history)
        .service(recent_activity)
        .service(all_transactions);
}
