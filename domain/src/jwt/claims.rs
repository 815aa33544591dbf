//! Claim definitions for the platform's bearer tokens.

use entity::users::Role;
use entity::Id;
use serde::{Deserialize, Serialize};

/// The identity a bearer token carries: exactly the user's id, role and
/// email. There is no `exp` claim; tokens stay valid until the signing
/// secret rotates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    pub id: Id,
    pub role: Role,
    pub email: String,
}
