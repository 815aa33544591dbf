use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::lesson::{CreateParams, GradeParams, HomeworkParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::events::DomainEvent;
use domain::users::Role;
use domain::{grade as GradeApi, lesson as LessonApi, user as UserApi, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;

/// GET all lessons visible to the authenticated user: a teacher sees their
/// own lessons with enrollment head-counts, a student the lessons they are
/// enrolled in.
#[utoipa::path(
    get,
    path = "/lessons",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved all lessons"),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Lessons for user: {}", claims.id);

    let payload = match claims.role {
        Role::Teacher => json!(LessonApi::list_for_teacher(app_state.db_conn_ref(), claims.id).await?),
        Role::Student => json!(LessonApi::list_for_student(app_state.db_conn_ref(), claims.id).await?),
    };

    Ok(Json(payload))
}

/// POST create a new lesson together with its enrollment set
#[utoipa::path(
    post,
    path = "/lessons",
    params(ApiVersion),
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully created a new lesson"),
        (status = 400, description = "Missing fields or empty studentIds"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden for students"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Lesson: {:?}", params.title);

    let created = LessonApi::create(
        app_state.db_conn_ref(),
        claims.id,
        params.title,
        params.description,
        params.date,
        params.duration,
        params.homework_text,
        params.student_ids,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET a particular lesson. A teacher gets their own lesson with the student
/// roster (statuses and grades included); a student gets a lesson they are
/// enrolled in. Anything else is not found.
#[utoipa::path(
    get,
    path = "/lessons/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Lesson id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the lesson"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Lesson not found or not accessible"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Lesson by id: {id}");

    let payload = match claims.role {
        Role::Teacher => {
            let lesson =
                LessonApi::find_for_teacher(app_state.db_conn_ref(), id, claims.id).await?;
            let students = LessonApi::students(app_state.db_conn_ref(), id).await?;

            let mut payload = json!(lesson);
            payload["students"] = json!(students);
            payload
        }
        Role::Student => {
            json!(LessonApi::find_for_student(app_state.db_conn_ref(), id, claims.id).await?)
        }
    };

    Ok(Json(payload))
}

/// PUT update a lesson's fields and optionally re-sync its enrollment set
#[utoipa::path(
    put,
    path = "/lessons/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Lesson id to update")
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated the lesson"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden for students"),
        (status = 404, description = "Lesson not found or not yours"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Lesson with id: {id}");

    let (update_map, student_ids) = params.into_parts();
    let lesson = LessonApi::update(
        app_state.db_conn_ref(),
        id,
        claims.id,
        update_map,
        student_ids,
    )
    .await?;

    Ok(Json(lesson))
}

/// PUT set or overwrite a lesson's homework text
#[utoipa::path(
    put,
    path = "/lessons/{id}/homework",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Lesson id to update homework for")
    ),
    request_body = HomeworkParams,
    responses(
        (status = 200, description = "Successfully updated the homework"),
        (status = 400, description = "Empty homework text"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden for students"),
        (status = 404, description = "Lesson not found or not yours"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_homework(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<HomeworkParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update homework for Lesson: {id}");

    LessonApi::update_homework(app_state.db_conn_ref(), id, claims.id, params.homework_text)
        .await?;

    Ok(Json(json!({"message": "Homework updated"})))
}

/// DELETE a lesson and its enrollments in one transaction
#[utoipa::path(
    delete,
    path = "/lessons/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Lesson id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted the lesson"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden for students"),
        (status = 404, description = "Lesson not found or not yours"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Lesson by id: {id}");

    LessonApi::delete_with_dependents(app_state.db_conn_ref(), id, claims.id).await?;

    Ok(Json(json!({"message": "Lesson deleted"})))
}

/// GET the student directory, for picking students when creating a lesson
#[utoipa::path(
    get,
    path = "/lessons/students/all",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved all student accounts"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden for students"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn students_index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_claims): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all student accounts");

    let students = UserApi::find_all_students(app_state.db_conn_ref()).await?;

    Ok(Json(students))
}

/// POST assign or overwrite a student's grade for a lesson; notifies the
/// graded student's personal room after the write commits
#[utoipa::path(
    post,
    path = "/lessons/{id}/grade",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Lesson id to grade")
    ),
    request_body = GradeParams,
    responses(
        (status = 200, description = "Successfully stored the grade"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden for students"),
        (status = 404, description = "Lesson not yours or student not enrolled"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn grade(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<GradeParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Grade student {} for lesson {id}", params.student_id);

    let grade = GradeApi::set_grade(
        app_state.db_conn_ref(),
        id,
        claims.id,
        params.student_id,
        params.grade,
        params.feedback,
    )
    .await?;

    // Fire-and-forget notification to the graded student's personal room.
    app_state
        .event_publisher
        .publish(DomainEvent::GradeAssigned {
            lesson_id: grade.lesson_id,
            student_id: grade.student_id,
            grade: grade.grade,
            feedback: grade.feedback.clone().unwrap_or_default(),
        })
        .await;

    Ok(Json(grade))
}

/// GET a student's grade sheet. Students may only read their own; a teacher
/// sees the grades they gave for their own lessons.
#[utoipa::path(
    get,
    path = "/lessons/grades/student/{student_id}",
    params(
        ApiVersion,
        ("student_id" = Id, Path, description = "Student id to list grades for")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the grades"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students may only read their own grades"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn student_grades(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(student_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Grades for student: {student_id}");

    let grades =
        GradeApi::list_for_student(app_state.db_conn_ref(), &claims, student_id).await?;

    Ok(Json(grades))
}

/// GET every grade for one of the teacher's own lessons
#[utoipa::path(
    get,
    path = "/lessons/{id}/grades",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Lesson id to list grades for")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the lesson's grades"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden for students"),
        (status = 404, description = "Lesson not found or not yours"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn lesson_grades(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Grades for lesson: {id}");

    let grades = GradeApi::list_for_lesson(app_state.db_conn_ref(), id, claims.id).await?;

    Ok(Json(grades))
}
