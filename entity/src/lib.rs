use uuid::Uuid;

pub mod chats;
pub mod enrollments;
pub mod files;
pub mod grades;
pub mod jwt;
pub mod lessons;
pub mod messages;
pub mod users;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
