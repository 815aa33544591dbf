//! SSE HTTP handlers for the web layer.
//!
//! This module contains the Axum handler that establishes the long-lived
//! event stream plus the two control endpoints for joining and leaving chat
//! rooms. The core SSE infrastructure (Manager, ConnectionRegistry, event
//! types) lives in the `sse` crate to avoid circular dependencies.

use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::AppState;
use async_stream::stream;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use domain::Id;
use futures::Stream;
use log::*;
use std::convert::Infallible;
use tokio::sync::mpsc;

/// SSE handler that establishes a long-lived connection for real-time
/// updates. The connecting token is verified exactly like any other
/// authenticated request, and the connection is auto-joined to the user's
/// personal room.
pub(crate) async fn events(
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing SSE connection for user {}", claims.id);

    let (tx, mut rx) = mpsc::unbounded_channel();

    let connection_id = app_state
        .sse_manager
        .register_connection(claims.id.to_string(), tx);

    let manager = app_state.sse_manager.clone();
    let user_id = claims.id;

    // Events arrive from the channel; when the client goes away the channel
    // closes and the connection is unregistered.
    let stream = stream! {
        while let Some(event) = rx.recv().await {
            yield event;
        }

        debug!("SSE connection closed for user {user_id}, cleaning up");
        manager.unregister_connection(&connection_id);
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Control request subscribing the caller's connections to a chat room.
/// The original relay did not gate this on chat membership and neither does
/// this one.
pub(crate) async fn join_chat(
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(chat_id): Path<Id>,
) -> impl IntoResponse {
    app_state
        .sse_manager
        .join_chat(&claims.id.to_string(), &chat_id.to_string());

    StatusCode::NO_CONTENT
}

/// Control request unsubscribing the caller's connections from a chat room.
pub(crate) async fn leave_chat(
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(chat_id): Path<Id>,
) -> impl IntoResponse {
    app_state
        .sse_manager
        .leave_chat(&claims.id.to_string(), &chat_id.to_string());

    StatusCode::NO_CONTENT
}
