use crate::error::{EntityErrorKind, Error};
use crate::lessons;
use chrono::Utc;
use entity::Id;
use entity_api::mutate::UpdateMap;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

pub use entity_api::enrollment::EnrolledStudent;
pub use entity_api::lesson::{
    delete_with_dependents, find_for_student, find_for_teacher, list_for_student,
    list_for_teacher, LessonForStudent, LessonWithEnrollmentCount,
};

/// A created lesson with its enrolled student ids echoed back. The ids are
/// not re-read from storage.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedLesson {
    #[serde(flatten)]
    pub lesson: lessons::Model,
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub student_ids: Vec<Id>,
}

/// Creates a lesson together with its full enrollment set in one transaction.
/// An empty `student_ids` is a validation failure before anything is written.
pub async fn create(
    db: &DatabaseConnection,
    teacher_id: Id,
    title: String,
    description: Option<String>,
    date: String,
    duration: i32,
    homework_text: Option<String>,
    student_ids: Vec<Id>,
) -> Result<CreatedLesson, Error> {
    if title.is_empty() || date.is_empty() {
        return Err(Error::entity(EntityErrorKind::Invalid));
    }
    if student_ids.is_empty() {
        return Err(Error::entity(EntityErrorKind::Invalid));
    }

    let lesson = entity_api::lesson::create_with_enrollments(
        db,
        lessons::Model {
            id: Id::default(),
            teacher_id,
            title,
            description,
            date,
            duration,
            homework_text,
            created_at: Utc::now().into(),
        },
        &student_ids,
    )
    .await?;

    Ok(CreatedLesson {
        lesson,
        student_ids,
    })
}

/// Updates a lesson's fields (replace-if-provided) and optionally re-syncs
/// its enrollment set. Ownership failure and nonexistence both read as not
/// found.
pub async fn update(
    db: &DatabaseConnection,
    lesson_id: Id,
    teacher_id: Id,
    update_map: UpdateMap,
    student_ids: Option<Vec<Id>>,
) -> Result<lessons::Model, Error> {
    Ok(entity_api::lesson::update_with_enrollments(
        db,
        lesson_id,
        teacher_id,
        update_map,
        student_ids,
    )
    .await?)
}

/// Overwrites a lesson's homework text. Empty text is a validation failure.
pub async fn update_homework(
    db: &DatabaseConnection,
    lesson_id: Id,
    teacher_id: Id,
    homework_text: String,
) -> Result<(), Error> {
    if homework_text.is_empty() {
        return Err(Error::entity(EntityErrorKind::Invalid));
    }

    Ok(entity_api::lesson::update_homework(db, lesson_id, teacher_id, homework_text).await?)
}

/// The roster shown on a teacher's lesson detail view.
pub async fn students(
    db: &DatabaseConnection,
    lesson_id: Id,
) -> Result<Vec<EnrolledStudent>, Error> {
    Ok(entity_api::enrollment::students_for_lesson(db, lesson_id).await?)
}
