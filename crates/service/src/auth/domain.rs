use std::fmt;

use models::user::{self, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration payload as received from the client.
///
/// Every field is optional so that missing and `null` values reach the
/// required-field check instead of failing deserialization; a value of the
/// wrong JSON type still fails. Unknown fields, `role` included, are dropped.
#[derive(Clone, Default, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Domain user (business view). Carries no credential material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<user::Model> for AuthUser {
    fn from(m: user::Model) -> Self {
        Self { id: m.id, name: m.name, email: m.email, role: m.role }
    }
}

/// Account to persist: validated fields plus the encoded password hash.
#[derive(Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}
