use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::chat::CreateParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{chat as ChatApi, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;

/// GET all chats of the authenticated user, joined with the counterpart's name
#[utoipa::path(
    get,
    path = "/chats",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved all chats"),
        (status = 401, description = "Unauthorized"),
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
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Chats for user: {}", claims.id);

    let chats = ChatApi::list(app_state.db_conn_ref(), &claims).await?;

    Ok(Json(chats))
}

/// POST create a new chat with a counterpart
#[utoipa::path(
    post,
    path = "/chats",
    params(ApiVersion),
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully created a new chat"),
        (status = 401, description = "Unauthorized"),
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
    debug!("POST Create a new Chat: {params:?}");

    let chat = ChatApi::create(
        app_state.db_conn_ref(),
        &claims,
        params.title,
        params.participant_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(chat)))
}

/// GET a particular chat the authenticated user participates in
#[utoipa::path(
    get,
    path = "/chats/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Chat id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the chat"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Chat not found or not yours"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Chat by id: {id}");

    let chat = ChatApi::find_for_participant(app_state.db_conn_ref(), id, claims.id).await?;

    Ok(Json(chat))
}

/// DELETE a chat the authenticated user participates in
#[utoipa::path(
    delete,
    path = "/chats/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Chat id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted the chat"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Chat not found or not yours"),
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
    debug!("DELETE Chat by id: {id}");

    ChatApi::delete_for_participant(app_state.db_conn_ref(), id, claims.id).await?;

    Ok(Json(json!({"message": "Chat deleted"})))
}
