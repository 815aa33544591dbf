use crate::chats;
use crate::error::{EntityErrorKind, Error};
use crate::jwt::AuthClaims;
use chrono::Utc;
use entity::users::Role;
use entity::Id;
use sea_orm::DatabaseConnection;

pub use entity_api::chat::{delete_for_participant, find_for_participant, ChatRow};

/// Opens a chat between the caller and a counterpart. The caller's role
/// decides which side of the chat they occupy.
pub async fn create(
    db: &DatabaseConnection,
    claims: &AuthClaims,
    title: String,
    participant_id: Id,
) -> Result<chats::Model, Error> {
    if title.is_empty() {
        return Err(Error::entity(EntityErrorKind::Invalid));
    }

    let (teacher_id, student_id) = match claims.role {
        Role::Teacher => (claims.id, participant_id),
        Role::Student => (participant_id, claims.id),
    };

    let chat = entity_api::chat::create(
        db,
        chats::Model {
            id: Id::default(),
            teacher_id,
            student_id,
            title,
            created_at: Utc::now().into(),
        },
    )
    .await?;

    Ok(chat)
}

/// Lists the caller's chats joined with the counterpart's name, newest first.
pub async fn list(db: &DatabaseConnection, claims: &AuthClaims) -> Result<Vec<ChatRow>, Error> {
    Ok(entity_api::chat::list_for_user(db, claims.id, claims.role).await?)
}
