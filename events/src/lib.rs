//! Event system infrastructure for the tutor platform.
//!
//! This crate provides the event system that enables loose coupling between
//! domain logic and infrastructure concerns (like SSE notifications).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON values.
//!
//! Publishing is a one-way outbound port: `publish` never returns an error to
//! the caller, so a failed notification can never affect the triggering HTTP
//! request. Handlers log their own failures.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// Domain events that represent business-level changes in the system.
/// These events are emitted after a database write commits successfully.
///
/// Events carry the ids needed for room routing; the domain layer decides who
/// is notified, the transport only routes.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// Emitted when a teacher assigns or overwrites a grade.
    /// Routed to the graded student's personal room.
    GradeAssigned {
        lesson_id: Id,
        student_id: Id,
        grade: i32,
        feedback: String,
    },
    /// Emitted when a chat participant posts a message.
    /// Routed to the chat's shared room. The full message row is carried as
    /// serialized JSON so subscribers can render it without a follow-up read.
    MessagePosted { chat_id: Id, message: Value },
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers are called sequentially and cannot fail the publish: whatever
    /// goes wrong inside a handler stays inside the handler.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        seen: AtomicUsize,
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _event: &DomainEvent) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn publish_reaches_every_registered_handler() {
        let first = Arc::new(CountingHandler {
            seen: AtomicUsize::new(0),
        });
        let second = Arc::new(CountingHandler {
            seen: AtomicUsize::new(0),
        });

        let publisher = EventPublisher::new()
            .with_handler(first.clone())
            .with_handler(second.clone());

        publisher
            .publish(DomainEvent::GradeAssigned {
                lesson_id: Id::new_v4(),
                student_id: Id::new_v4(),
                grade: 5,
                feedback: String::new(),
            })
            .await;

        assert_eq!(first.seen.load(Ordering::SeqCst), 1);
        assert_eq!(second.seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn publish_without_handlers_is_a_no_op() {
        let publisher = EventPublisher::new();

        publisher
            .publish(DomainEvent::MessagePosted {
                chat_id: Id::new_v4(),
                message: serde_json::json!({"content": "hi"}),
            })
            .await;
    }
}
