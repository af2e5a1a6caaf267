// ============================================================================
// MODÈLE : PASSWORD RESET TOKENS
// ============================================================================
//
// Colonnes de la table password_reset_tokens:
//   - id (INTEGER, PRIMARY KEY)
//   - user_id (INTEGER, FK vers users)
//   - token (VARCHAR, UNIQUE) - UUID v4
//   - expires_at (TIMESTAMP) - created_at + auth.reset_ttl_minutes
//   - used (BOOLEAN, DEFAULT FALSE)
//   - created_at (TIMESTAMP)
//
// Workflow:
//   1. POST /api/auth/forgot-password avec l'email
//   2. Si l'email existe: token inséré ici + email avec
//      {frontend_url}/reset-password?token=xxx (réponse identique sinon)
//   3. POST /api/auth/reset-password avec token + nouveau password
//   4. Backend vérifie: existe, pas expiré, pas utilisé
//   5. Backend change le password, met used = true, renvoie de nouveaux tokens
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    #[sea_orm(unique)]
    pub token: String,

    pub expires_at: DateTime,

    pub used: bool,

    pub created_at: DateTime,
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

impl Model {
    pub fn is_usable(&self, now: DateTime) -> bool {
        !self.used && now < self.expires_at
    }
}
