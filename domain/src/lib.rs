pub use entity::{chats, enrollments, files, grades, lessons, messages, users, Id};

// Re-exported so upper layers can reach the event system through the domain
// boundary without a direct dependency.
pub use events;

pub mod chat;
pub mod error;
pub mod file;
pub mod grade;
pub mod jwt;
pub mod lesson;
pub mod message;
pub mod user;
