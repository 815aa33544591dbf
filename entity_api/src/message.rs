use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::messages::{ActiveModel, Column, Entity, Model, Relation};
use entity::{users, Id};
use sea_orm::{
    entity::prelude::*, ConnectionTrait, FromQueryResult, JoinType, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use utoipa::ToSchema;

/// A message joined with its sender's display name.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct MessageWithSender {
    #[schema(value_type = Uuid)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub chat_id: Id,
    #[schema(value_type = Uuid)]
    pub sender_id: Id,
    pub sender_name: String,
    pub content: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

pub async fn create(
    db: &impl ConnectionTrait,
    chat_id: Id,
    sender_id: Id,
    content: String,
) -> Result<Model, Error> {
    let now = Utc::now();
    let message_active_model: ActiveModel = ActiveModel {
        chat_id: Set(chat_id),
        sender_id: Set(sender_id),
        content: Set(content),
        created_at: Set(now.into()),
        ..Default::default()
    };

    Ok(message_active_model.insert(db).await?)
}

/// All messages in a chat, oldest first. Chat membership is checked by the
/// caller before this runs.
pub async fn list_for_chat(
    db: &impl ConnectionTrait,
    chat_id: Id,
) -> Result<Vec<MessageWithSender>, Error> {
    Ok(Entity::find()
        .filter(Column::ChatId.eq(chat_id))
        .join(JoinType::InnerJoin, Relation::Users.def())
        .column_as(users::Column::Name, "sender_name")
        .order_by_asc(Column::CreatedAt)
        .into_model::<MessageWithSender>()
        .all(db)
        .await?)
}

/// Deletes a message only if `sender_id` authored it. Zero rows affected is
/// reported as not found, which also covers someone else's message.
pub async fn delete_by_sender(
    db: &impl ConnectionTrait,
    message_id: Id,
    sender_id: Id,
) -> Result<(), Error> {
    let result = Entity::delete_many()
        .filter(Column::Id.eq(message_id))
        .filter(Column::SenderId.eq(sender_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        });
    }
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn create_returns_a_new_message_model() -> Result<(), Error> {
        let now = Utc::now();
        let message_model = Model {
            id: Id::new_v4(),
            chat_id: Id::new_v4(),
            sender_id: Id::new_v4(),
            content: "hi".to_string(),
            created_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![message_model.clone()]])
            .into_connection();

        let message = create(
            &db,
            message_model.chat_id,
            message_model.sender_id,
            message_model.content.clone(),
        )
        .await?;

        assert_eq!(message.content, "hi");

        Ok(())
    }

    #[tokio::test]
    async fn delete_by_sender_reports_not_found_when_nothing_matches() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete_by_sender(&db, Id::new_v4(), Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
