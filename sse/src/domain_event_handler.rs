use crate::message::{Event as SseEvent, Message as SseMessage, Room};
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Handles domain events by converting them to SSE messages and publishing
/// them into the matching room.
///
/// The domain layer decides the routing target (which student, which chat)
/// and encodes it in the event; this handler only translates and relays.
pub struct SseDomainEventHandler {
    sse_manager: Arc<Manager>,
}

impl SseDomainEventHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::GradeAssigned {
                lesson_id,
                student_id,
                grade,
                feedback,
            } => {
                debug!("Handling GradeAssigned event for student {student_id}");

                self.sse_manager.send_message(SseMessage {
                    event: SseEvent::GradeUpdated {
                        lesson_id: lesson_id.to_string(),
                        grade: *grade,
                        feedback: feedback.clone(),
                    },
                    room: Room::user(&student_id.to_string()),
                });
            }

            DomainEvent::MessagePosted { chat_id, message } => {
                debug!("Handling MessagePosted event for chat {chat_id}");

                self.sse_manager.send_message(SseMessage {
                    event: SseEvent::NewMessage(message.clone()),
                    room: Room::chat(&chat_id.to_string()),
                });
            }
        }
    }
}
