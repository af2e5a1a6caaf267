pub mod admin;
pub mod auth;
pub mod contact;
pub mod deposits;
pub mod health;
pub mod profile;
pub mod transactions;
pub mod wallet;
pub mod withdrawals;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .service(health::index)
            .service(health::home)
            .service(contact::submit_contact)
            .configure(admin::admin_routes)
            // Un seul scope /auth: actix ne passe pas au scope suivant
            .service(
                web::scope("/auth")
                    .configure(auth::auth_routes)
                    .configure(profile::profile_routes)
                    .configure(deposits::deposit_routes)
                    .configure(withdrawals::withdrawal_routes)
                    .configure(transactions::transaction_routes)
                    .configure(wallet::wallet_routes),
            ),
    );
}
