use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::files::{ActiveModel, Column, Entity, Model, Relation};
use entity::{enrollments, lessons, users, users::Role, Id};
use sea_orm::{
    entity::prelude::*, ConnectionTrait, FromQueryResult, JoinType, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use utoipa::ToSchema;

pub async fn create(db: &impl ConnectionTrait, file_model: Model) -> Result<Model, Error> {
    let now = Utc::now();
    let file_active_model: ActiveModel = ActiveModel {
        lesson_id: Set(file_model.lesson_id),
        filename: Set(file_model.filename),
        original_name: Set(file_model.original_name),
        mime_type: Set(file_model.mime_type),
        size: Set(file_model.size),
        uploaded_by: Set(file_model.uploaded_by),
        created_at: Set(now.into()),
        ..Default::default()
    };

    Ok(file_active_model.insert(db).await?)
}

/// File metadata joined with the uploader's display name.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct FileWithUploader {
    #[schema(value_type = Uuid)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub lesson_id: Id,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    #[schema(value_type = Uuid)]
    pub uploaded_by: Id,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub uploaded_by_name: String,
}

/// Lists a lesson's files gated on the requester: teachers see files of their
/// own lessons, students see files of lessons they are enrolled in. An
/// inaccessible lesson simply yields an empty list, like the original joins.
pub async fn list_for_lesson(
    db: &impl ConnectionTrait,
    lesson_id: Id,
    requester_id: Id,
    role: Role,
) -> Result<Vec<FileWithUploader>, Error> {
    let mut query = Entity::find()
        .filter(Column::LessonId.eq(lesson_id))
        .join(JoinType::InnerJoin, Relation::Users.def())
        .column_as(users::Column::Name, "uploaded_by_name")
        .join(JoinType::InnerJoin, Relation::Lessons.def());

    query = match role {
        Role::Teacher => query.filter(lessons::Column::TeacherId.eq(requester_id)),
        Role::Student => query
            .join(JoinType::InnerJoin, lessons::Relation::Enrollments.def())
            .filter(enrollments::Column::StudentId.eq(requester_id)),
    };

    Ok(query
        .order_by_desc(Column::CreatedAt)
        .into_model::<FileWithUploader>()
        .all(db)
        .await?)
}

/// Finds one file row with the same visibility gate as [`list_for_lesson`].
/// Used for downloads; inaccessible and nonexistent are both not found.
pub async fn find_for_requester(
    db: &impl ConnectionTrait,
    file_id: Id,
    requester_id: Id,
    role: Role,
) -> Result<Model, Error> {
    let mut query = Entity::find_by_id(file_id).join(JoinType::InnerJoin, Relation::Lessons.def());

    query = match role {
        Role::Teacher => query.filter(lessons::Column::TeacherId.eq(requester_id)),
        Role::Student => query
            .join(JoinType::InnerJoin, lessons::Relation::Enrollments.def())
            .filter(enrollments::Column::StudentId.eq(requester_id)),
    };

    query.one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Deletes a file row only if `uploader_id` uploaded it, returning the
/// removed metadata so the caller can unlink the stored file.
pub async fn delete_by_uploader(
    db: &impl ConnectionTrait,
    file_id: Id,
    uploader_id: Id,
) -> Result<Model, Error> {
    let file = Entity::find_by_id(file_id)
        .filter(Column::UploadedBy.eq(uploader_id))
        .one(db)
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })?;

    file.clone().delete(db).await?;
    Ok(file)
}
