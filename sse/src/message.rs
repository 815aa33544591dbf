use serde::Serialize;
use serde_json::Value;

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A grade was assigned or overwritten; sent to the student's personal room.
    #[serde(rename = "grade_updated")]
    GradeUpdated {
        lesson_id: String,
        grade: i32,
        feedback: String,
    },

    /// A chat message was posted; sent to the chat's shared room. The payload
    /// is the full message row (id, chat_id, sender_id, sender_name, content,
    /// created_at) as serialized by the domain layer.
    #[serde(rename = "new_message")]
    NewMessage(Value),
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::GradeUpdated { .. } => "grade_updated",
            Event::NewMessage(_) => "new_message",
        }
    }
}

/// A logical broadcast group identified by a string key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Room(String);

impl Room {
    /// The personal room every connection is auto-joined to.
    pub fn user(user_id: &str) -> Self {
        Self(format!("user_{user_id}"))
    }

    /// The shared room for one chat's participants.
    pub fn chat(chat_id: &str) -> Self {
        Self(format!("chat_{chat_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub event: Event,
    pub room: Room,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_keys_follow_the_wire_format() {
        assert_eq!(Room::user("42").as_str(), "user_42");
        assert_eq!(Room::chat("7").as_str(), "chat_7");
    }

    #[test]
    fn grade_updated_serializes_flat_payload() {
        let event = Event::GradeUpdated {
            lesson_id: "abc".to_string(),
            grade: 5,
            feedback: "nice".to_string(),
        };

        let value: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "grade_updated");
        assert_eq!(value["data"]["lesson_id"], "abc");
        assert_eq!(value["data"]["grade"], 5);
    }

    #[test]
    fn new_message_carries_the_row_as_its_payload() {
        let row = serde_json::json!({
            "id": "m1",
            "chat_id": "c1",
            "sender_id": "u1",
            "sender_name": "Ada",
            "content": "hi",
            "created_at": "2025-09-01T10:00:00Z",
        });

        let event = Event::NewMessage(row.clone());
        let value: Value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "new_message");
        assert_eq!(value["data"], row);
    }
}
