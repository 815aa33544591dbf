use crate::error::{EntityErrorKind, Error};
use crate::jwt::{self, Jwt};
use crate::users;
use chrono::Utc;
use entity::users::Role;
use entity_api::mutate;
use log::*;
use password_auth::verify_password;
use sea_orm::{DatabaseConnection, IntoActiveModel};
use serde::Deserialize;
use service::config::Config;
use std::str::FromStr;
use utoipa::ToSchema;

pub use entity_api::user::{find_all_students, find_by_email, find_by_id, StudentRow};

use entity::Id;

/// The registration payload. `role` arrives as a plain string and is
/// validated here so an unknown role is a validation failure, not a
/// deserialization reject.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct Registration {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub role: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registers a new account and signs it in.
///
/// Fails with a validation error when email or password is missing or the
/// role isn't one of teacher/student; with a conflict error when the email is
/// already taken. Token issuance happens strictly after the row is persisted.
pub async fn register(
    db: &DatabaseConnection,
    config: &Config,
    registration: Registration,
) -> Result<(users::Model, Jwt), Error> {
    if registration.email.is_empty() || registration.password.is_empty() {
        return Err(Error::entity(EntityErrorKind::Invalid));
    }

    let role = Role::from_str(&registration.role)
        .map_err(|_| Error::entity(EntityErrorKind::Invalid))?;

    if find_by_email(db, &registration.email).await?.is_some() {
        info!("Registration rejected, email already taken");
        return Err(Error::entity(EntityErrorKind::Conflict));
    }

    let user = entity_api::user::create(
        db,
        users::Model {
            id: Id::default(),
            name: registration.name,
            email: registration.email,
            role,
            password: registration.password,
            created_at: Utc::now().into(),
        },
    )
    .await?;

    let token = jwt::generate_auth_token(config, &user)?;

    Ok((user, token))
}

/// Verifies credentials and signs the user in.
///
/// An unknown email is reported as not found, a failed hash comparison as an
/// authentication failure; the two stay distinct.
pub async fn login(
    db: &DatabaseConnection,
    config: &Config,
    credentials: Credentials,
) -> Result<(users::Model, Jwt), Error> {
    if credentials.email.is_empty() || credentials.password.is_empty() {
        return Err(Error::entity(EntityErrorKind::Invalid));
    }

    let user = find_by_email(db, &credentials.email)
        .await?
        .ok_or_else(|| Error::entity(EntityErrorKind::NotFound))?;

    if verify_password(&credentials.password, &user.password).is_err() {
        warn!("Login failed, password mismatch for {}", credentials.email);
        return Err(Error::entity(EntityErrorKind::Unauthenticated));
    }

    let token = jwt::generate_auth_token(config, &user)?;

    Ok((user, token))
}

/// Partially updates a user's own profile. Only the columns present in the
/// update map are touched.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: Id,
    params: impl mutate::IntoUpdateMap,
) -> Result<users::Model, Error> {
    let existing_user = find_by_id(db, user_id).await?;
    let update_map = params.into_update_map();
    if update_map.is_empty() {
        return Ok(existing_user);
    }
    let active_model = existing_user.into_active_model();
    Ok(
        mutate::update::<users::ActiveModel, users::Column>(db, active_model, update_map)
            .await?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn test_config() -> Config {
        Config::parse_from(["tutor_platform_rs"]).set_token_secret("test-secret".to_string())
    }

    // Validation short-circuits before any query runs, so a disconnected
    // database handle is enough for these.
    fn disconnected_db() -> DatabaseConnection {
        DatabaseConnection::Disconnected
    }

    #[tokio::test]
    async fn register_rejects_missing_password() {
        let db = disconnected_db();
        let result = register(
            &db,
            &test_config(),
            Registration {
                name: "No Password".to_string(),
                email: "nopass@example.com".to_string(),
                role: "student".to_string(),
                password: String::new(),
            },
        )
        .await;

        assert!(matches!(
            result.unwrap_err().error_kind,
            crate::error::DomainErrorKind::Internal(crate::error::InternalErrorKind::Entity(
                EntityErrorKind::Invalid
            ))
        ));
    }

    #[tokio::test]
    async fn register_rejects_unknown_role() {
        let db = disconnected_db();
        let result = register(
            &db,
            &test_config(),
            Registration {
                name: "Bad Role".to_string(),
                email: "badrole@example.com".to_string(),
                role: "admin".to_string(),
                password: "password123".to_string(),
            },
        )
        .await;

        assert!(matches!(
            result.unwrap_err().error_kind,
            crate::error::DomainErrorKind::Internal(crate::error::InternalErrorKind::Entity(
                EntityErrorKind::Invalid
            ))
        ));
    }

    #[tokio::test]
    async fn login_rejects_empty_credentials() {
        let db = disconnected_db();
        let result = login(
            &db,
            &test_config(),
            Credentials {
                email: String::new(),
                password: String::new(),
            },
        )
        .await;

        assert!(result.is_err());
    }
}
