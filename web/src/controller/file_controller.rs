use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::{AppState, Error};
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use domain::error::{EntityErrorKind, Error as DomainError};
use domain::{file as FileApi, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;

/// POST upload a PDF for one of the teacher's own lessons (multipart `file`
/// field, capped at 10 MiB)
#[utoipa::path(
    post,
    path = "/files/upload/{lesson_id}",
    params(
        ApiVersion,
        ("lesson_id" = Id, Path, description = "Lesson id to attach the file to")
    ),
    responses(
        (status = 201, description = "Successfully stored the file"),
        (status = 400, description = "Missing file field, wrong type or too large"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden for students"),
        (status = 404, description = "Lesson not found or not yours"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(lesson_id): Path<Id>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Upload file for lesson: {lesson_id}");

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| invalid(format!("Malformed multipart body: {err}")))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or("upload.pdf").to_string();
            let mime_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| invalid(format!("Could not read file field: {err}")))?;
            upload = Some((original_name, mime_type, bytes.to_vec()));
            break;
        }
    }

    let (original_name, mime_type, bytes) =
        upload.ok_or_else(|| invalid("No file was uploaded".to_string()))?;

    let file = FileApi::store(
        app_state.db_conn_ref(),
        app_state.config(),
        lesson_id,
        claims.id,
        original_name,
        mime_type,
        bytes,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(file)))
}

/// GET the files attached to a lesson the requester can see
#[utoipa::path(
    get,
    path = "/files/lesson/{lesson_id}",
    params(
        ApiVersion,
        ("lesson_id" = Id, Path, description = "Lesson id to list files for")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the lesson's files"),
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
    Path(lesson_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Files for lesson: {lesson_id}");

    let files = FileApi::list_for_lesson(app_state.db_conn_ref(), lesson_id, &claims).await?;

    Ok(Json(files))
}

/// GET download a stored file the requester can see
#[utoipa::path(
    get,
    path = "/files/download/{file_id}",
    params(
        ApiVersion,
        ("file_id" = Id, Path, description = "File id to download")
    ),
    responses(
        (status = 200, description = "File contents as an attachment"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found or not accessible"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(file_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Download file: {file_id}");

    let (file, bytes) = FileApi::retrieve(
        app_state.db_conn_ref(),
        app_state.config(),
        file_id,
        &claims,
    )
    .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&file.mime_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    let disposition = format!("attachment; filename=\"{}\"", file.original_name);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or(HeaderValue::from_static("attachment")),
    );

    Ok((headers, bytes))
}

/// DELETE a file the teacher uploaded themselves
#[utoipa::path(
    delete,
    path = "/files/{file_id}",
    params(
        ApiVersion,
        ("file_id" = Id, Path, description = "File id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted the file"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden for students"),
        (status = 404, description = "File not found or not yours"),
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
    Path(file_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE File by id: {file_id}");

    FileApi::delete(
        app_state.db_conn_ref(),
        app_state.config(),
        file_id,
        claims.id,
    )
    .await?;

    Ok(Json(json!({"message": "File deleted"})))
}

fn invalid(detail: String) -> Error {
    warn!("{detail}");
    Error::from(DomainError {
        source: None,
        error_kind: domain::error::DomainErrorKind::Internal(
            domain::error::InternalErrorKind::Entity(EntityErrorKind::Invalid),
        ),
    })
}
