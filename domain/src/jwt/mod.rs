//! Bearer-token issuance and verification for the domain layer.
//!
//! Tokens are signed with the configured secret and carry an
//! [`AuthClaims`] payload of `{id, role, email}`. Verification uses the same
//! secret; there is no expiry claim, so a token is valid until the secret is
//! rotated. Issuance happens only after the corresponding user row has been
//! persisted, so a token can never outrun its account.

use crate::error::{Error, EntityErrorKind};
use entity::users;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use service::config::Config;

// re-export the Jwt struct from the entity module
pub use entity::jwt::Jwt;

pub use claims::AuthClaims;

pub(crate) mod claims;

/// Signs a bearer token for a freshly registered or logged-in user.
pub fn generate_auth_token(config: &Config, user: &users::Model) -> Result<Jwt, Error> {
    let claims = AuthClaims {
        id: user.id,
        role: user.role,
        email: user.email.clone(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.token_secret().as_bytes()),
    )?;

    Ok(Jwt {
        token,
        user_id: user.id,
    })
}

/// Verifies a bearer token and returns its decoded identity.
/// Any signature or shape problem is an authentication failure.
pub fn verify_auth_token(config: &Config, token: &str) -> Result<AuthClaims, Error> {
    // No exp claim is issued, so expiry validation must be off or every
    // token would be rejected as missing one.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(config.token_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| {
        debug!("Bearer token rejected: {err:?}");
        Error::entity(EntityErrorKind::Unauthenticated)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind};
    use chrono::Utc;
    use clap::Parser;
    use entity::users::Role;
    use entity::Id;

    fn test_config(secret: &str) -> Config {
        Config::parse_from(["tutor_platform_rs"]).set_token_secret(secret.to_string())
    }

    fn test_user() -> users::Model {
        users::Model {
            id: Id::new_v4(),
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            role: Role::Teacher,
            password: "hashed".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn issued_token_round_trips_to_the_same_identity() {
        let config = test_config("s3cret");
        let user = test_user();

        let jwt = generate_auth_token(&config, &user).unwrap();
        let claims = verify_auth_token(&config, &jwt.token).unwrap();

        assert_eq!(claims.id, user.id);
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.email, user.email);
        assert_eq!(jwt.user_id, user.id);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let user = test_user();
        let jwt = generate_auth_token(&test_config("first"), &user).unwrap();

        let result = verify_auth_token(&test_config("second"), &jwt.token);

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Unauthenticated
            ))
        );
    }

    #[test]
    fn garbage_token_is_rejected() {
        let config = test_config("s3cret");

        assert!(verify_auth_token(&config, "not-a-token").is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = test_config("s3cret");
        let user = test_user();

        let jwt = generate_auth_token(&config, &user).unwrap();
        let mut tampered = jwt.token.clone();
        tampered.truncate(tampered.len() - 2);

        assert!(verify_auth_token(&config, &tampered).is_err());
    }
}
