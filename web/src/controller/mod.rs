pub(crate) mod auth_controller;
pub(crate) mod chat_controller;
pub(crate) mod file_controller;
pub(crate) mod health_check_controller;
pub(crate) mod lesson_controller;
pub(crate) mod message_controller;
