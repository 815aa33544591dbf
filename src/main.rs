use axum::http::{header, HeaderValue, Method};
use events::EventPublisher;
use log::*;
use migration::{Migrator, MigratorTrait};
use service::config::Config;
use service::logging::Logger;
use sse::domain_event_handler::SseDomainEventHandler;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!("Starting tutor platform backend");

    let db = service::init_database(&config)
        .await
        .expect("Failed to connect to the database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to apply database migrations");

    let db = Arc::new(db);

    // The realtime relay: domain events fan out into SSE rooms. A failed
    // notification is the notifier's problem, never the request's.
    let sse_manager = Arc::new(sse::Manager::new());
    let event_publisher = EventPublisher::new()
        .with_handler(Arc::new(SseDomainEventHandler::new(sse_manager.clone())));

    let app_state = web::AppState::new(
        service::AppState::new(config.clone(), &db),
        sse_manager,
        event_publisher,
    );

    let router = web::router::define_routes(app_state).layer(cors_layer(&config));

    let interface = config.interface.as_deref().unwrap_or("127.0.0.1");
    let listen_addr = format!("{}:{}", interface, config.port);

    info!("Server starting... listening for connections on http://{listen_addr}");

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .expect("Failed to bind server address");

    axum::serve(listener, router)
        .await
        .expect("Server stopped unexpectedly");
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|err| {
                    warn!("Ignoring unparseable CORS origin {origin}: {err}");
                    err
                })
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-version"),
        ])
}
