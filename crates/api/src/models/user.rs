//! User and address domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quickbite_core::{AddressId, Role, UserId};

/// A registered user of the platform.
///
/// Registration itself is owned by the identity collaborator; this service
/// only reads users and updates the mutable profile fields (name, phone).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the user holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: Option<String>,
}

/// A delivery address owned by exactly one user.
///
/// At most one of a user's addresses carries `is_default = true` at any time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    #[serde(skip)]
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub instructions: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Address payload for create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}
