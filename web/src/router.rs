use crate::{
    controller::health_check_controller, middleware::auth::require_auth, params, protect,
    sse_handler, AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::controller::{
    auth_controller, chat_controller, file_controller, lesson_controller, message_controller,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Tutor Platform API"
        ),
        paths(
            auth_controller::register,
            auth_controller::login,
            auth_controller::profile,
            auth_controller::update_profile,
            chat_controller::index,
            chat_controller::create,
            chat_controller::read,
            chat_controller::delete,
            message_controller::index,
            message_controller::create,
            message_controller::delete,
            lesson_controller::index,
            lesson_controller::create,
            lesson_controller::read,
            lesson_controller::update,
            lesson_controller::update_homework,
            lesson_controller::delete,
            lesson_controller::students_index,
            lesson_controller::grade,
            lesson_controller::student_grades,
            lesson_controller::lesson_grades,
            file_controller::upload,
            file_controller::index,
            file_controller::download,
            file_controller::delete,
        ),
        components(
            schemas(
                domain::users::Model,
                domain::chats::Model,
                domain::messages::Model,
                domain::lessons::Model,
                domain::enrollments::Model,
                domain::grades::Model,
                domain::files::Model,
                domain::user::Registration,
                domain::user::Credentials,
                params::user::UpdateProfileParams,
                params::chat::CreateParams,
                params::message::CreateParams,
                params::lesson::CreateParams,
                params::lesson::UpdateParams,
                params::lesson::HomeworkParams,
                params::lesson::GradeParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "tutor_platform", description = "Tutoring Platform API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our bearer-token authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token returned from /auth/register or /auth/login",
                        ))
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(auth_routes(app_state.clone()))
        .merge(chat_routes(app_state.clone()))
        .merge(message_routes(app_state.clone()))
        .merge(lesson_routes(app_state.clone()))
        .merge(file_routes(app_state.clone()))
        .merge(events_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn auth_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(
            // Registration and login issue the tokens everything else requires.
            Router::new()
                .route("/auth/register", post(auth_controller::register))
                .route("/auth/login", post(auth_controller::login)),
        )
        .merge(
            Router::new()
                .route("/auth/profile", get(auth_controller::profile))
                .route("/auth/profile", put(auth_controller::update_profile))
                .route_layer(from_fn_with_state(app_state.clone(), require_auth)),
        )
        .with_state(app_state)
}

fn chat_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/chats", get(chat_controller::index))
        .route("/chats", post(chat_controller::create))
        .route("/chats/:id", get(chat_controller::read))
        .route("/chats/:id", delete(chat_controller::delete))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn message_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/messages/:chat_id", get(message_controller::index))
        .route("/messages", post(message_controller::create))
        .route("/messages/:id", delete(message_controller::delete))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

pub fn lesson_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/lessons", get(lesson_controller::index))
        .route(
            "/lessons/grades/student/:student_id",
            get(lesson_controller::student_grades),
        )
        .route("/lessons/:id", get(lesson_controller::read))
        .merge(
            // Mutations, grading and the student directory are teacher-only.
            Router::new()
                .route("/lessons", post(lesson_controller::create))
                .route("/lessons/:id", put(lesson_controller::update))
                .route(
                    "/lessons/:id/homework",
                    put(lesson_controller::update_homework),
                )
                .route("/lessons/:id", delete(lesson_controller::delete))
                .route(
                    "/lessons/students/all",
                    get(lesson_controller::students_index),
                )
                .route("/lessons/:id/grade", post(lesson_controller::grade))
                .route("/lessons/:id/grades", get(lesson_controller::lesson_grades))
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::lessons::teacher_only,
                )),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn file_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/files/lesson/:lesson_id", get(file_controller::index))
        .route("/files/download/:file_id", get(file_controller::download))
        .merge(
            Router::new()
                .route("/files/upload/:lesson_id", post(file_controller::upload))
                .route("/files/:file_id", delete(file_controller::delete))
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::files::teacher_only,
                )),
        )
        // The cap is enforced again in the domain layer; this bound just
        // keeps oversized bodies from being buffered in full.
        .layer(DefaultBodyLimit::max(
            domain::file::MAX_FILE_SIZE + 1024 * 1024,
        ))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn events_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events", get(sse_handler::events))
        .route("/events/join_chat/:chat_id", post(sse_handler::join_chat))
        .route("/events/leave_chat/:chat_id", post(sse_handler::leave_chat))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use clap::Parser;
    use domain::events::EventPublisher;
    use sea_orm::DatabaseConnection;
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        let config = Config::parse_from(["tutor_platform_rs"])
            .set_token_secret("router-test-secret".to_string());
        let db = Arc::new(DatabaseConnection::Disconnected);
        AppState::new(
            service::AppState::new(config, &db),
            Arc::new(sse::Manager::default()),
            EventPublisher::default(),
        )
    }

    fn teacher_token(app_state: &AppState, role: domain::users::Role) -> String {
        let user = domain::users::Model {
            id: domain::Id::new_v4(),
            name: "Router Test".to_string(),
            email: "router@example.com".to_string(),
            role,
            password: "hashed".to_string(),
            created_at: chrono::Utc::now().into(),
        };
        domain::jwt::generate_auth_token(app_state.config(), &user)
            .unwrap()
            .token
    }

    #[tokio::test]
    async fn health_check_needs_no_token() {
        let app = define_routes(test_app_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_reject_anonymous_requests() {
        for uri in ["/chats", "/lessons", "/messages/not-even-parsed", "/events"] {
            let app = define_routes(test_app_state());
            let response = app
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn students_cannot_create_lessons() {
        let app_state = test_app_state();
        let token = teacher_token(&app_state, domain::users::Role::Student);
        let app = define_routes(app_state);

        let request = Request::builder()
            .uri("/lessons")
            .method("POST")
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"title":"t","date":"2025-01-01","duration":30,"studentIds":[]}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn students_cannot_list_the_student_directory() {
        let app_state = test_app_state();
        let token = teacher_token(&app_state, domain::users::Role::Student);
        let app = define_routes(app_state);

        let request = Request::builder()
            .uri("/lessons/students/all")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
