use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::message::CreateParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::events::DomainEvent;
use domain::{message as MessageApi, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;

/// GET all messages of a chat the authenticated user participates in
#[utoipa::path(
    get,
    path = "/messages/{chat_id}",
    params(
        ApiVersion,
        ("chat_id" = Id, Path, description = "Chat id to list messages for")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the chat's messages"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a participant of this chat"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(chat_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Messages for chat: {chat_id}");

    let messages =
        MessageApi::list_for_chat(app_state.db_conn_ref(), chat_id, claims.id).await?;

    Ok(Json(messages))
}

/// POST a message into a chat; fans out to the chat room after the write commits
#[utoipa::path(
    post,
    path = "/messages",
    params(ApiVersion),
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully posted the message"),
        (status = 400, description = "Empty content"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a participant of this chat"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Message in chat: {}", params.chat_id);

    let message = MessageApi::post(
        app_state.db_conn_ref(),
        params.chat_id,
        claims.id,
        params.content,
    )
    .await?;

    // Fire-and-forget fan-out to the chat room; delivery problems never
    // affect the HTTP response.
    app_state
        .event_publisher
        .publish(DomainEvent::MessagePosted {
            chat_id: message.chat_id,
            message: json!(message),
        })
        .await;

    Ok((StatusCode::CREATED, Json(message)))
}

/// DELETE one of the authenticated user's own messages
#[utoipa::path(
    delete,
    path = "/messages/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Message id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted the message"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Message not found or not yours"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Message by id: {id}");

    MessageApi::delete_by_sender(app_state.db_conn_ref(), id, claims.id).await?;

    Ok(Json(json!({"message": "Message deleted"})))
}
