use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::protect::{authorize, Predicate, UserIsTeacher};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};

/// Lesson mutations, grading and the student directory are teacher-only.
/// Ownership of the individual lesson is checked further down, in the domain
/// layer, where a miss deliberately reads as not-found.
pub(crate) async fn teacher_only(
    State(app_state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(UserIsTeacher, vec![])];
    authorize(&app_state, claims, request, next, checks).await
}
