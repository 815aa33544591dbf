use crate::error::{EntityErrorKind, Error};
use entity::Id;
use sea_orm::DatabaseConnection;

pub use entity_api::message::{delete_by_sender, MessageWithSender};

/// Lists a chat's messages, oldest first. A caller who is not one of the
/// chat's two participants is rejected with a forbidden error. Membership,
/// not existence, is the thing being checked here.
pub async fn list_for_chat(
    db: &DatabaseConnection,
    chat_id: Id,
    requester_id: Id,
) -> Result<Vec<MessageWithSender>, Error> {
    require_membership(db, chat_id, requester_id).await?;
    Ok(entity_api::message::list_for_chat(db, chat_id).await?)
}

/// Posts a message into a chat the sender participates in and returns the
/// stored row joined with the sender's name, ready for both the HTTP response
/// and the realtime fan-out.
pub async fn post(
    db: &DatabaseConnection,
    chat_id: Id,
    sender_id: Id,
    content: String,
) -> Result<MessageWithSender, Error> {
    if content.is_empty() {
        return Err(Error::entity(EntityErrorKind::Invalid));
    }

    require_membership(db, chat_id, sender_id).await?;

    let message = entity_api::message::create(db, chat_id, sender_id, content).await?;
    let sender = entity_api::user::find_by_id(db, sender_id).await?;

    Ok(MessageWithSender {
        id: message.id,
        chat_id: message.chat_id,
        sender_id: message.sender_id,
        sender_name: sender.name,
        content: message.content,
        created_at: message.created_at,
    })
}

async fn require_membership(
    db: &DatabaseConnection,
    chat_id: Id,
    user_id: Id,
) -> Result<(), Error> {
    entity_api::chat::find_for_participant(db, chat_id, user_id)
        .await
        .map_err(|_| Error::entity(EntityErrorKind::Forbidden))?;
    Ok(())
}
