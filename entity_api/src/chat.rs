use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::chats::{ActiveModel, Column, Entity, Model, Relation};
use entity::{users, users::Role, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, Condition, ConnectionTrait, FromQueryResult, JoinType, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;
use utoipa::ToSchema;

pub async fn create(db: &impl ConnectionTrait, chat_model: Model) -> Result<Model, Error> {
    debug!("New Chat Model to be inserted: {:?}", chat_model);

    let now = Utc::now();
    let chat_active_model: ActiveModel = ActiveModel {
        teacher_id: Set(chat_model.teacher_id),
        student_id: Set(chat_model.student_id),
        title: Set(chat_model.title),
        created_at: Set(now.into()),
        ..Default::default()
    };

    Ok(chat_active_model.insert(db).await?)
}

/// A chat row joined with the counterpart participant, shaped for listing.
/// For a teacher the partner is the student and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct ChatRow {
    #[schema(value_type = Uuid)]
    pub id: Id,
    pub title: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    #[schema(value_type = Uuid)]
    pub partner_id: Id,
    pub partner_name: String,
}

pub async fn list_for_user(
    db: &impl ConnectionTrait,
    user_id: Id,
    role: Role,
) -> Result<Vec<ChatRow>, Error> {
    let (own_column, partner_relation) = match role {
        Role::Teacher => (Column::TeacherId, Relation::Student),
        Role::Student => (Column::StudentId, Relation::Teacher),
    };

    Ok(Entity::find()
        .filter(own_column.eq(user_id))
        .join(JoinType::InnerJoin, partner_relation.def())
        .column_as(users::Column::Id, "partner_id")
        .column_as(users::Column::Name, "partner_name")
        .order_by_desc(Column::CreatedAt)
        .into_model::<ChatRow>()
        .all(db)
        .await?)
}

/// Finds a chat only if `user_id` is one of its two participants.
/// A chat that exists but belongs to other users is reported as not found.
pub async fn find_for_participant(
    db: &impl ConnectionTrait,
    chat_id: Id,
    user_id: Id,
) -> Result<Model, Error> {
    Entity::find_by_id(chat_id)
        .filter(
            Condition::any()
                .add(Column::TeacherId.eq(user_id))
                .add(Column::StudentId.eq(user_id)),
        )
        .one(db)
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

pub async fn delete_for_participant(
    db: &impl ConnectionTrait,
    chat_id: Id,
    user_id: Id,
) -> Result<(), Error> {
    let chat = find_for_participant(db, chat_id, user_id).await?;
    chat.delete(db).await?;
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn create_returns_a_new_chat_model() -> Result<(), Error> {
        let now = Utc::now();

        let chat_model = Model {
            id: Id::new_v4(),
            teacher_id: Id::new_v4(),
            student_id: Id::new_v4(),
            title: "Homework questions".to_string(),
            created_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![chat_model.clone()]])
            .into_connection();

        let chat = create(&db, chat_model.clone()).await?;

        assert_eq!(chat.title, chat_model.title);

        Ok(())
    }

    #[tokio::test]
    async fn find_for_participant_reports_not_found_for_non_member() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_for_participant(&db, Id::new_v4(), Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
