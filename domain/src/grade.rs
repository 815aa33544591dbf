use crate::error::{EntityErrorKind, Error};
use crate::grades;
use crate::jwt::AuthClaims;
use entity::users::Role;
use entity::Id;
use sea_orm::DatabaseConnection;

pub use entity_api::grade::{GradeWithLesson, GradeWithStudent};

/// Assigns (or overwrites) a student's grade for a lesson.
///
/// The lesson must belong to the grading teacher and the student must hold an
/// enrollment for it; either check failing reads as not found. The write
/// itself is a single atomic upsert keyed on the (lesson, student) unique
/// constraint, so concurrent submissions for the same pair cleanly overwrite
/// instead of colliding.
pub async fn set_grade(
    db: &DatabaseConnection,
    lesson_id: Id,
    teacher_id: Id,
    student_id: Id,
    grade: i32,
    feedback: Option<String>,
) -> Result<grades::Model, Error> {
    entity_api::lesson::find_owned(db, lesson_id, teacher_id).await?;

    entity_api::enrollment::find_by_lesson_and_student(db, lesson_id, student_id)
        .await?
        .ok_or_else(|| Error::entity(EntityErrorKind::NotFound))?;

    Ok(entity_api::grade::upsert(db, lesson_id, student_id, grade, feedback).await?)
}

/// A student's grade sheet. Students may only read their own; teachers see
/// the grades they gave for their own lessons.
pub async fn list_for_student(
    db: &DatabaseConnection,
    claims: &AuthClaims,
    student_id: Id,
) -> Result<Vec<GradeWithLesson>, Error> {
    match claims.role {
        Role::Student if claims.id != student_id => {
            Err(Error::entity(EntityErrorKind::Forbidden))
        }
        Role::Student => Ok(entity_api::grade::list_for_student(db, student_id, None).await?),
        Role::Teacher => {
            Ok(entity_api::grade::list_for_student(db, student_id, Some(claims.id)).await?)
        }
    }
}

/// Every grade for one of the teacher's own lessons.
pub async fn list_for_lesson(
    db: &DatabaseConnection,
    lesson_id: Id,
    teacher_id: Id,
) -> Result<Vec<GradeWithStudent>, Error> {
    entity_api::lesson::find_owned(db, lesson_id, teacher_id).await?;
    Ok(entity_api::grade::list_for_lesson(db, lesson_id).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind};
    use crate::{enrollments, lessons};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_lesson(teacher_id: Id) -> lessons::Model {
        lessons::Model {
            id: Id::new_v4(),
            teacher_id,
            title: "Geometry".to_string(),
            description: None,
            date: "2025-10-01T09:00:00".to_string(),
            duration: 45,
            homework_text: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn set_grade_rejects_a_student_without_an_enrollment() {
        let teacher_id = Id::new_v4();
        let lesson = test_lesson(teacher_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // Lesson ownership lookup succeeds, enrollment lookup is empty;
            // nothing is ever written.
            .append_query_results(vec![vec![lesson.clone()]])
            .append_query_results(vec![Vec::<enrollments::Model>::new()])
            .into_connection();

        let result = set_grade(&db, lesson.id, teacher_id, Id::new_v4(), 5, None).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }

    #[tokio::test]
    async fn set_grade_rejects_a_lesson_owned_by_someone_else() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<lessons::Model>::new()])
            .into_connection();

        let result = set_grade(&db, Id::new_v4(), Id::new_v4(), Id::new_v4(), 4, None).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }
}
