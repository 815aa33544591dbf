//! Server-Sent Events (SSE) infrastructure for real-time updates.
//!
//! This crate provides the realtime relay for the tutor platform: after a
//! database write commits, the server pushes an event into a logical room and
//! every connection subscribed to that room receives it.
//!
//! # Architecture
//!
//! - **Rooms**: A room is a string key. Two kinds exist: `user_<id>` (one per
//!   account, auto-joined at connect time) and `chat_<id>` (joined and left
//!   explicitly via control requests).
//! - **Room-indexed registry**: DashMap indices give O(1) lookups for
//!   connection management and room routing.
//! - **At-most-once, best-effort**: Events are ephemeral. An offline user
//!   misses the event and sees fresh data on the next page load. A failed
//!   send is logged and never surfaces to the write that triggered it.
//! - **Ordering**: Within one connection's room, delivery follows publish
//!   order on the server side only; nothing is guaranteed across rooms.
//!
//! # Message Flow
//!
//! 1. Client establishes the SSE connection (bearer token, verified exactly
//!    like any other authenticated request)
//! 2. Connection is registered and auto-joined to its personal room
//! 3. Client joins/leaves chat rooms via the two control endpoints
//! 4. When a write commits (e.g. a grade is assigned), the domain event
//!    handler converts it to an SSE event and publishes it to the target room
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry with room indexing and type-safe ConnectionId
//! - `manager`: High-level room routing (delegates to ConnectionRegistry)
//! - `message`: Wire event and room definitions
//! - `domain_event_handler`: bridges `events::DomainEvent` to SSE rooms

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;

pub use manager::Manager;
