use crate::message::Room;
use axum::response::sse::Event;
use dashmap::DashMap;
use log::*;
use std::collections::HashSet;
use std::convert::Infallible;
use tokio::sync::mpsc::UnboundedSender;

// Type alias for user IDs (web layer converts domain::Id to String)
pub type UserId = String;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection information, including the rooms this connection belongs to
/// so that unregistering can clean the room index without a scan.
#[derive(Debug)]
pub struct ConnectionInfo {
    pub user_id: UserId,
    pub rooms: HashSet<Room>,
    pub sender: UnboundedSender<Result<Event, Infallible>>,
}

/// Connection registry with room and user indices for O(1) lookups.
pub struct ConnectionRegistry {
    /// Primary storage: lookup by connection_id for registration/cleanup - O(1)
    connections: DashMap<ConnectionId, ConnectionInfo>,

    /// Secondary index: connections of one user, used to apply join/leave
    /// control requests (which arrive with a user identity, not a
    /// connection id) - O(1)
    user_index: DashMap<UserId, HashSet<ConnectionId>>,

    /// Secondary index: members of one room, used for message routing - O(1)
    room_index: DashMap<Room, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_index: DashMap::new(),
            room_index: DashMap::new(),
        }
    }

    /// Register a new connection and auto-join it to the user's personal room.
    pub fn register(
        &self,
        user_id: UserId,
        sender: UnboundedSender<Result<Event, Infallible>>,
    ) -> ConnectionId {
        let connection_id = ConnectionId::new();
        let personal_room = Room::user(&user_id);

        self.connections.insert(
            connection_id.clone(),
            ConnectionInfo {
                user_id: user_id.clone(),
                rooms: HashSet::from([personal_room.clone()]),
                sender,
            },
        );

        self.user_index
            .entry(user_id)
            .or_default()
            .insert(connection_id.clone());

        self.room_index
            .entry(personal_room)
            .or_default()
            .insert(connection_id.clone());

        connection_id
    }

    /// Unregister a connection, removing it from every index - O(rooms joined)
    pub fn unregister(&self, connection_id: &ConnectionId) {
        if let Some((_, info)) = self.connections.remove(connection_id) {
            if let Some(mut entry) = self.user_index.get_mut(&info.user_id) {
                entry.remove(connection_id);
                if entry.is_empty() {
                    drop(entry); // Release lock before removal
                    self.user_index.remove(&info.user_id);
                }
            }

            for room in info.rooms {
                self.remove_from_room(&room, connection_id);
            }
        }
    }

    /// Join every connection of `user_id` to `room`.
    pub fn join_room(&self, user_id: &UserId, room: &Room) {
        let connection_ids: Vec<ConnectionId> = match self.user_index.get(user_id) {
            Some(ids) => ids.iter().cloned().collect(),
            None => return,
        };

        for connection_id in connection_ids {
            if let Some(mut info) = self.connections.get_mut(&connection_id) {
                if info.rooms.insert(room.clone()) {
                    self.room_index
                        .entry(room.clone())
                        .or_default()
                        .insert(connection_id.clone());
                }
            }
        }
    }

    /// Remove every connection of `user_id` from `room`.
    pub fn leave_room(&self, user_id: &UserId, room: &Room) {
        let connection_ids: Vec<ConnectionId> = match self.user_index.get(user_id) {
            Some(ids) => ids.iter().cloned().collect(),
            None => return,
        };

        for connection_id in connection_ids {
            if let Some(mut info) = self.connections.get_mut(&connection_id) {
                if info.rooms.remove(room) {
                    self.remove_from_room(room, &connection_id);
                }
            }
        }
    }

    /// Send an event to every member of a room - O(1) lookup + O(k) sends
    /// where k = room size. Send failures are logged, nothing more; delivery
    /// is at-most-once.
    pub fn publish(&self, room: &Room, event: Event) {
        if let Some(connection_ids) = self.room_index.get(room) {
            for conn_id in connection_ids.iter() {
                if let Some(info) = self.connections.get(conn_id) {
                    if let Err(e) = info.sender.send(Ok(event.clone())) {
                        warn!(
                            "Failed to send event to connection {} in room {}: {}. Connection will be cleaned up.",
                            conn_id.as_str(),
                            room,
                            e
                        );
                    }
                }
            }
        }
    }

    fn remove_from_room(&self, room: &Room, connection_id: &ConnectionId) {
        if let Some(mut entry) = self.room_index.get_mut(room) {
            entry.remove(connection_id);
            if entry.is_empty() {
                drop(entry); // Release lock before removal
                self.room_index.remove(room);
            }
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn connect(
        registry: &ConnectionRegistry,
        user_id: &str,
    ) -> (
        ConnectionId,
        mpsc::UnboundedReceiver<Result<Event, Infallible>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = registry.register(user_id.to_string(), tx);
        (connection_id, rx)
    }

    #[tokio::test]
    async fn register_auto_joins_the_personal_room() {
        let registry = ConnectionRegistry::new();
        let (_conn, mut rx) = connect(&registry, "alice");

        registry.publish(&Room::user("alice"), Event::default().data("ping"));

        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn publish_only_reaches_room_members() {
        let registry = ConnectionRegistry::new();
        let (_a, mut rx_a) = connect(&registry, "alice");
        let (_b, mut rx_b) = connect(&registry, "bob");

        registry.join_room(&"alice".to_string(), &Room::chat("1"));
        registry.publish(&Room::chat("1"), Event::default().data("hello"));

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn leave_room_stops_delivery() {
        let registry = ConnectionRegistry::new();
        let (_a, mut rx) = connect(&registry, "alice");

        let room = Room::chat("1");
        registry.join_room(&"alice".to_string(), &room);
        registry.leave_room(&"alice".to_string(), &room);

        registry.publish(&room, Event::default().data("gone"));

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unregister_cleans_every_index() {
        let registry = ConnectionRegistry::new();
        let (conn, mut rx) = connect(&registry, "alice");

        registry.join_room(&"alice".to_string(), &Room::chat("1"));
        registry.unregister(&conn);

        registry.publish(&Room::user("alice"), Event::default().data("x"));
        registry.publish(&Room::chat("1"), Event::default().data("y"));

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn join_room_covers_every_connection_of_the_user() {
        let registry = ConnectionRegistry::new();
        let (_first, mut rx_first) = connect(&registry, "alice");
        let (_second, mut rx_second) = connect(&registry, "alice");

        registry.join_room(&"alice".to_string(), &Room::chat("9"));
        registry.publish(&Room::chat("9"), Event::default().data("both"));

        assert!(rx_first.try_recv().is_ok());
        assert!(rx_second.try_recv().is_ok());
    }
}
