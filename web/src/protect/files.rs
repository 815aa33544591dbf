use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::protect::{authorize, Predicate, UserIsTeacher};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};

/// Uploading and deleting lesson files is teacher-only; listing and
/// downloading are visibility-gated in the domain queries instead.
pub(crate) async fn teacher_only(
    State(app_state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(UserIsTeacher, vec![])];
    authorize(&app_state, claims, request, next, checks).await
}
