use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::users::{ActiveModel, Column, Entity, Model};
use entity::{users::Role, Id};
use log::*;
use password_auth::generate_hash;
use sea_orm::{entity::prelude::*, ConnectionTrait, FromQueryResult, QuerySelect, Set};
use serde::Serialize;
use utoipa::ToSchema;

/// Inserts a new user row, hashing the supplied plaintext password on the way in.
pub async fn create(db: &impl ConnectionTrait, user_model: Model) -> Result<Model, Error> {
    debug!("New User Model to be inserted: {:?}", user_model.email);

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        name: Set(user_model.name),
        email: Set(user_model.email),
        role: Set(user_model.role),
        password: Set(generate_hash(user_model.password)),
        created_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.insert(db).await?)
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Directory row exposed to teachers picking students for a lesson.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct StudentRow {
    #[schema(value_type = Uuid)]
    pub id: Id,
    pub name: String,
    pub email: String,
}

pub async fn find_all_students(db: &impl ConnectionTrait) -> Result<Vec<StudentRow>, Error> {
    Ok(Entity::find()
        .select_only()
        .column(Column::Id)
        .column(Column::Name)
        .column(Column::Email)
        .filter(Column::Role.eq(Role::Student))
        .into_model::<StudentRow>()
        .all(db)
        .await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_user(role: Role) -> Model {
        let now = Utc::now();
        Model {
            id: Id::new_v4(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            role,
            password: generate_hash("correct horse battery staple"),
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_the_inserted_user() -> Result<(), Error> {
        let user_model = test_user(Role::Teacher);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model.clone()]])
            .into_connection();

        let user = create(&db, user_model.clone()).await?;

        assert_eq!(user.email, user_model.email);
        assert_eq!(user.role, Role::Teacher);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_email_returns_none_for_unknown_address() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_email(&db, "nobody@example.com").await?;

        assert!(result.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_returns_record_not_found_for_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
