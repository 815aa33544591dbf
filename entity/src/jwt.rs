use uuid::Uuid;
use serde::Serialize;
use utoipa::ToSchema;

/// Represents a signed JSON Web Token handed back to a client.
/// Note: This struct does not have a corresponding entity in the database.
///
/// - `token`: the encoded JWT string.
/// - `user_id`: the id the token was issued for, carried alongside so
///   callers don't have to decode the token to learn its subject.
#[derive(Serialize, Debug, ToSchema)]
#[schema(as = jwt::Jwt)] // OpenAPI schema
pub struct Jwt {
    pub token: String,
    pub user_id: Uuid,
}
