// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table (SeaORM), créée par db::create_schema.
//
// Liste des modules:
//   - users : Utilisateurs (username/email uniques, is_staff pour l'admin)
//   - profiles : Profil 1:1 avec les soldes dénormalisés + PIN/OTP
//   - deposits : Demandes de dépôt (pending -> completed/failed)
//   - withdrawals : Demandes de retrait (pending -> processing -> completed/rejected)
//   - transaction_history : Journal d'audit des mouvements de solde
//   - ada_transactions / tax_transactions / earnings_transactions : sous-ledgers
//   - wallet_addresses : Adresses de dépôt crypto gérées par l'admin
//   - email_verifications : Confirmation d'inscription (token UUID)
//   - password_reset_tokens : Tokens de reset password (usage unique)
//   - contact_submissions : Formulaire de contact
//   - enums : Moyens de paiement, sens des écritures
//   - health : Health check API
//   - dto : Objets de réponse de l'API
//
// ============================================================================

pub mod enums;
pub mod users;
pub mod profiles;
pub mod deposits;
pub mod withdrawals;
pub mod transaction_history;
pub mod ada_transactions;
pub mod tax_transactions;
pub mod earnings_transactions;
pub mod wallet_addresses;
pub mod email_verifications;
pub mod password_reset_tokens;
pub mod contact_submissions;
pub mod health;
pub mod dto;
