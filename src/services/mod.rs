pub mod account_service;
pub mod contact_service;
pub mod history_service;
pub mod ledger_service;
pub mod mailer;
pub mod notifications;
pub mod profile_service;
pub mod wallet_address_service;

#[cfg(test)]
pub(crate) mod test_support;
