// ============================================================================
// MODÈLE : EMAIL VERIFICATIONS
// ============================================================================
//
// Colonnes de la table email_verifications:
//   - id (INTEGER, PRIMARY KEY)
//   - user_id (INTEGER, UNIQUE, FK vers users) - une vérification par user
//   - token (VARCHAR, UNIQUE) - UUID v4
//   - is_verified (BOOLEAN, DEFAULT FALSE)
//   - created_at (TIMESTAMP)
//   - verified_at (TIMESTAMP, NULL tant que non vérifié)
//
// Workflow:
//   1. User s'inscrit via POST /api/auth/register
//   2. Backend crée user + profil + cette ligne dans la même transaction
//   3. Backend envoie l'email avec le lien {frontend_url}/verify-email?token=xxx
//   4. Frontend appelle GET /api/auth/verify-email?token=xxx
//   5. Backend met is_verified = true, verified_at = now, notifie l'admin
//
// Points d'attention:
//   - Un token déjà vérifié est refusé ("Invalid or expired verification token")
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "email_verifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,

    #[sea_orm(unique)]
    pub token: String,

    pub is_verified: bool,

    pub created_at: DateTime,

    pub verified_at: Option<DateTime>,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
