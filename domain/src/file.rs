use crate::error::{EntityErrorKind, Error};
use crate::files;
use crate::jwt::AuthClaims;
use chrono::Utc;
use entity::Id;
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub use entity_api::file::FileWithUploader;

/// Only PDFs may be attached to lessons.
pub const ALLOWED_MIME_TYPE: &str = "application/pdf";

/// Uploads are capped at 10 MiB.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Stores an uploaded lesson file on local disk and records its metadata.
///
/// The lesson must belong to the uploading teacher (not found otherwise).
/// Only `application/pdf` up to [`MAX_FILE_SIZE`] is accepted. The on-disk
/// name is a generated token, decoupled from the caller's original name.
pub async fn store(
    db: &DatabaseConnection,
    config: &Config,
    lesson_id: Id,
    uploader_id: Id,
    original_name: String,
    mime_type: String,
    bytes: Vec<u8>,
) -> Result<files::Model, Error> {
    entity_api::lesson::find_owned(db, lesson_id, uploader_id).await?;

    if mime_type != ALLOWED_MIME_TYPE {
        return Err(Error::entity(EntityErrorKind::Invalid));
    }
    if bytes.is_empty() || bytes.len() > MAX_FILE_SIZE {
        return Err(Error::entity(EntityErrorKind::Invalid));
    }

    let extension = Path::new(&original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("pdf");
    let filename = format!("{}.{extension}", Uuid::new_v4());

    tokio::fs::create_dir_all(&config.uploads_dir).await?;
    tokio::fs::write(stored_path(config, &filename), &bytes).await?;

    let file = entity_api::file::create(
        db,
        files::Model {
            id: Id::default(),
            lesson_id,
            filename,
            original_name,
            mime_type,
            size: bytes.len() as i64,
            uploaded_by: uploader_id,
            created_at: Utc::now().into(),
        },
    )
    .await?;

    Ok(file)
}

/// Lists a lesson's files with the caller's visibility (own lessons for
/// teachers, enrolled lessons for students).
pub async fn list_for_lesson(
    db: &DatabaseConnection,
    lesson_id: Id,
    claims: &AuthClaims,
) -> Result<Vec<FileWithUploader>, Error> {
    Ok(entity_api::file::list_for_lesson(db, lesson_id, claims.id, claims.role).await?)
}

/// Reads a file's bytes for download, gated on the same visibility rules.
/// A metadata row whose stored file has vanished from disk also reads as
/// not found.
pub async fn retrieve(
    db: &DatabaseConnection,
    config: &Config,
    file_id: Id,
    claims: &AuthClaims,
) -> Result<(files::Model, Vec<u8>), Error> {
    let file = entity_api::file::find_for_requester(db, file_id, claims.id, claims.role).await?;

    let bytes = tokio::fs::read(stored_path(config, &file.filename))
        .await
        .map_err(|err| {
            warn!("Stored file {} missing from disk: {err}", file.filename);
            Error::entity(EntityErrorKind::NotFound)
        })?;

    Ok((file, bytes))
}

/// Deletes a file's metadata row (uploader-only) and best-effort unlinks the
/// stored file; a failed unlink is logged, never surfaced.
pub async fn delete(
    db: &DatabaseConnection,
    config: &Config,
    file_id: Id,
    uploader_id: Id,
) -> Result<(), Error> {
    let file = entity_api::file::delete_by_uploader(db, file_id, uploader_id).await?;

    if let Err(err) = tokio::fs::remove_file(stored_path(config, &file.filename)).await {
        warn!("Could not remove stored file {}: {err}", file.filename);
    }

    Ok(())
}

fn stored_path(config: &Config, filename: &str) -> PathBuf {
    Path::new(&config.uploads_dir).join(filename)
}
