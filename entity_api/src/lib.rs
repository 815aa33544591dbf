pub use entity::{chats, enrollments, files, grades, jwt, lessons, messages, users, Id};

pub mod chat;
pub mod enrollment;
pub mod error;
pub mod file;
pub mod grade;
pub mod lesson;
pub mod message;
pub mod mutate;
pub mod user;
