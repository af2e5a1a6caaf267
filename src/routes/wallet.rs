use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{ApiResponse, WalletAddressResponse};
use crate::services::wallet_address_service::WalletAddressService;

/// GET /api/auth/wallets - Adresses de dépôt actives
#[get("/wallets")]
pub async fn active_wallets(
    _auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let wallets = WalletAddressService::list_active(&db).await?;
    let data: Vec<WalletAddressResponse> = wallets.iter().map(WalletAddressResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::data(data)))
}

pub fn wallet_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(active_wallets);
}
