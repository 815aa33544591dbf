use domain::events::EventPublisher;
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::sync::Arc;

pub use error::{Error, Result};

pub(crate) mod controller;
pub(crate) mod error;
pub(crate) mod extractors;
pub(crate) mod middleware;
pub(crate) mod params;
pub(crate) mod protect;
pub mod router;
pub(crate) mod sse_handler;

/// Application state shared by every handler: the infrastructure state from
/// the service layer plus the realtime manager and the domain event
/// publisher. Constructed once at startup and injected into the router.
#[derive(Clone)]
pub struct AppState {
    service_state: service::AppState,
    pub sse_manager: Arc<sse::Manager>,
    pub event_publisher: EventPublisher,
}

impl AppState {
    pub fn new(
        service_state: service::AppState,
        sse_manager: Arc<sse::Manager>,
        event_publisher: EventPublisher,
    ) -> Self {
        Self {
            service_state,
            sse_manager,
            event_publisher,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.service_state.db_conn_ref()
    }

    pub fn config(&self) -> &Config {
        &self.service_state.config
    }
}
