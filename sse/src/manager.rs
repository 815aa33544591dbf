use crate::connection::{ConnectionId, ConnectionRegistry, UserId};
use crate::message::{EventType, Message as SseMessage, Room};
use axum::response::sse::Event;
use log::*;
use std::sync::Arc;

pub struct Manager {
    registry: Arc<ConnectionRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Register a new connection and return its unique ID. The connection is
    /// auto-joined to the user's personal room.
    pub fn register_connection(
        &self,
        user_id: UserId,
        sender: tokio::sync::mpsc::UnboundedSender<Result<Event, std::convert::Infallible>>,
    ) -> ConnectionId {
        let connection_id = self.registry.register(user_id, sender);
        info!("Registered new SSE connection");
        connection_id
    }

    /// Unregister a connection by ID
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        info!("Unregistering SSE connection");
        self.registry.unregister(connection_id);
    }

    /// Subscribe all of a user's connections to a chat room.
    pub fn join_chat(&self, user_id: &UserId, chat_id: &str) {
        debug!("User {user_id} joining chat room {chat_id}");
        self.registry.join_room(user_id, &Room::chat(chat_id));
    }

    /// Unsubscribe all of a user's connections from a chat room.
    pub fn leave_chat(&self, user_id: &UserId, chat_id: &str) {
        debug!("User {user_id} leaving chat room {chat_id}");
        self.registry.leave_room(user_id, &Room::chat(chat_id));
    }

    /// Publish a message into its room. This never reports failure to the
    /// caller: serialization or send problems are logged and swallowed so the
    /// triggering request path is unaffected.
    pub fn send_message(&self, message: SseMessage) {
        let event_type = message.event.event_type();

        let event_data = match serde_json::to_string(&message.event) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize SSE event: {e}");
                return;
            }
        };

        let event = Event::default().event(event_type).data(event_data);

        self.registry.publish(&message.room, event);
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
