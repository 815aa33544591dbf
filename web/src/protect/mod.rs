//! This module provides protection mechanisms for various resources in the web application.
//!
//! It includes submodules for authorizing access to resources. Each submodule contains the
//! necessary logic to protect the corresponding routes, ensuring that only authorized users
//! can reach their handlers. Role checks live here as route layers; ownership checks stay in
//! the domain layer where they deliberately read as not-found.

pub(crate) mod files;
pub(crate) mod lessons;

use crate::AppState;
use axum::{
    async_trait, extract::Request, http::StatusCode, middleware::Next, response::IntoResponse,
};
use domain::jwt::AuthClaims;
use domain::users::Role;
use domain::Id;

/// Trait representing a single authorization rule.
///
/// Implementors answer **"is the authenticated user allowed to proceed?"**.
/// The rule receives:
/// * shared application state (`AppState`)
/// * the authenticated identity ([`AuthClaims`])
/// * any additional [`Id`] parameters supplied by the caller.
#[async_trait]
pub trait Check: Send + Sync {
    async fn eval(&self, app: &AppState, claims: &AuthClaims, args: Vec<Id>) -> bool;
}

/// Pairs a [`Check`] implementation with the concrete arguments that the rule
/// should receive when evaluated.
pub(crate) struct Predicate {
    predicate: Box<dyn Check>,
    args: Vec<Id>,
}

impl Predicate {
    pub(crate) fn new<C: Check + 'static>(predicate: C, args: Vec<Id>) -> Self {
        Self {
            predicate: Box::new(predicate),
            args,
        }
    }

    pub(crate) async fn check(&self, app_state: &AppState, claims: &AuthClaims) -> bool {
        self.predicate
            .eval(app_state, claims, self.args.clone())
            .await
    }
}

/// Axum middleware that enforces one or more [`Predicate`]s.
///
/// Each predicate is evaluated in the order supplied; if any rule returns
/// `false` the request is aborted with **403 FORBIDDEN**. When all rules
/// pass the wrapped handler (`next`) is executed.
pub(crate) async fn authorize(
    app_state: &AppState,
    claims: AuthClaims,
    request: Request,
    next: Next,
    checks: Vec<Predicate>,
) -> impl IntoResponse {
    for check in checks {
        if !check.check(app_state, &claims).await {
            return crate::error::error_response(StatusCode::FORBIDDEN, "forbidden");
        }
    }
    next.run(request).await
}

pub struct UserIsTeacher;

#[async_trait]
impl Check for UserIsTeacher {
    async fn eval(&self, _app_state: &AppState, claims: &AuthClaims, _args: Vec<Id>) -> bool {
        claims.role == Role::Teacher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> AuthClaims {
        AuthClaims {
            id: Id::new_v4(),
            role,
            email: "someone@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn user_is_teacher_accepts_teachers_only() {
        use clap::Parser;
        use domain::events::EventPublisher;
        use sea_orm::DatabaseConnection;
        use service::config::Config;
        use std::sync::Arc;

        let config = Config::parse_from(["tutor_platform_rs"]);
        let db = Arc::new(DatabaseConnection::Disconnected);
        let app_state = AppState::new(
            service::AppState::new(config, &db),
            Arc::new(sse::Manager::default()),
            EventPublisher::default(),
        );

        assert!(
            UserIsTeacher
                .eval(&app_state, &claims(Role::Teacher), vec![])
                .await
        );
        assert!(
            !UserIsTeacher
                .eval(&app_state, &claims(Role::Student), vec![])
                .await
        );
    }
}
