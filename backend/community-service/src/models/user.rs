use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role as issued by the auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Member,
    Admin,
}

/// Display projection of a user, resolved through the identity directory.
/// Never carries password or token material.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub fullname: String,
    pub username: String,
    pub avatar: Option<String>,
    pub email: String,
    pub role: Role,
}

/// The authenticated caller, extracted from the request by the auth
/// middleware. The core never validates credentials itself.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
