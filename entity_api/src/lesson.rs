use super::error::{EntityApiErrorKind, Error};
use super::mutate::{self, UpdateMap};
use chrono::Utc;
use entity::enrollments::{self, STATUS_ENROLLED};
use entity::lessons::{ActiveModel, Column, Entity, Model, Relation};
use entity::{files, grades, users, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, sea_query::Expr, ConnectionTrait, FromQueryResult, IntoActiveModel,
    JoinType, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Creates a lesson and its full enrollment set as one atomic unit.
///
/// The lesson row and one enrollment per student id are written inside a
/// single transaction, awaited linearly; the commit is the sole atomicity
/// boundary. Any failed insert drops the transaction, rolling back every
/// statement that came before it.
pub async fn create_with_enrollments(
    db: &impl TransactionTrait,
    lesson_model: Model,
    student_ids: &[Id],
) -> Result<Model, Error> {
    debug!(
        "New Lesson Model to be inserted with {} enrollment(s): {:?}",
        student_ids.len(),
        lesson_model
    );

    let txn = db.begin().await?;
    let now = Utc::now();

    let lesson_active_model: ActiveModel = ActiveModel {
        teacher_id: Set(lesson_model.teacher_id),
        title: Set(lesson_model.title),
        description: Set(lesson_model.description),
        date: Set(lesson_model.date),
        duration: Set(lesson_model.duration),
        homework_text: Set(lesson_model.homework_text),
        created_at: Set(now.into()),
        ..Default::default()
    };

    let lesson = lesson_active_model.insert(&txn).await?;

    for student_id in student_ids {
        enrollments::ActiveModel {
            lesson_id: Set(lesson.id),
            student_id: Set(*student_id),
            status: Set(STATUS_ENROLLED.to_string()),
            enrolled_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    Ok(lesson)
}

/// Updates a lesson's fields and, when `student_ids` is provided, replaces its
/// entire enrollment set inside the same transaction.
///
/// This is a destructive re-sync, not a diff: every existing enrollment is
/// deleted and the new set inserted with a fresh `enrolled_at` and the default
/// status. `student_ids: None` leaves enrollments untouched. Ownership failure
/// and nonexistence are indistinguishable to the caller.
pub async fn update_with_enrollments(
    db: &impl TransactionTrait,
    lesson_id: Id,
    teacher_id: Id,
    update_map: UpdateMap,
    student_ids: Option<Vec<Id>>,
) -> Result<Model, Error> {
    let txn = db.begin().await?;

    let existing = Entity::find_by_id(lesson_id)
        .filter(Column::TeacherId.eq(teacher_id))
        .one(&txn)
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })?;

    let lesson = if update_map.is_empty() {
        existing
    } else {
        mutate::update::<ActiveModel, Column>(&txn, existing.into_active_model(), update_map)
            .await?
    };

    if let Some(student_ids) = student_ids {
        enrollments::Entity::delete_many()
            .filter(enrollments::Column::LessonId.eq(lesson_id))
            .exec(&txn)
            .await?;

        let now = Utc::now();
        for student_id in student_ids {
            enrollments::ActiveModel {
                lesson_id: Set(lesson_id),
                student_id: Set(student_id),
                status: Set(STATUS_ENROLLED.to_string()),
                enrolled_at: Set(now.into()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    Ok(lesson)
}

/// Deletes a lesson and its dependent rows (enrollments, grades, file
/// metadata) in one transaction. The ownership predicate sits on the final
/// lesson delete; zero rows there rolls everything back and reports not found.
pub async fn delete_with_dependents(
    db: &impl TransactionTrait,
    lesson_id: Id,
    teacher_id: Id,
) -> Result<(), Error> {
    let txn = db.begin().await?;

    enrollments::Entity::delete_many()
        .filter(enrollments::Column::LessonId.eq(lesson_id))
        .exec(&txn)
        .await?;

    grades::Entity::delete_many()
        .filter(grades::Column::LessonId.eq(lesson_id))
        .exec(&txn)
        .await?;

    files::Entity::delete_many()
        .filter(files::Column::LessonId.eq(lesson_id))
        .exec(&txn)
        .await?;

    let result = Entity::delete_many()
        .filter(Column::Id.eq(lesson_id))
        .filter(Column::TeacherId.eq(teacher_id))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        });
    }

    txn.commit().await?;
    Ok(())
}

/// Finds a lesson only if it belongs to `teacher_id`.
pub async fn find_owned(
    db: &impl ConnectionTrait,
    lesson_id: Id,
    teacher_id: Id,
) -> Result<Model, Error> {
    Entity::find_by_id(lesson_id)
        .filter(Column::TeacherId.eq(teacher_id))
        .one(db)
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

/// Overwrites a lesson's homework text, gated on ownership in the predicate.
pub async fn update_homework(
    db: &impl ConnectionTrait,
    lesson_id: Id,
    teacher_id: Id,
    homework_text: String,
) -> Result<(), Error> {
    let result = Entity::update_many()
        .col_expr(Column::HomeworkText, Expr::value(homework_text))
        .filter(Column::Id.eq(lesson_id))
        .filter(Column::TeacherId.eq(teacher_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        });
    }
    Ok(())
}

/// A lesson row with its enrollment head-count, the teacher-facing list shape.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct LessonWithEnrollmentCount {
    #[schema(value_type = Uuid)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub teacher_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub duration: i32,
    pub homework_text: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub enrolled_students: i64,
}

/// A lesson row as a student sees it: with the teacher's name and the
/// student's own enrollment status.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct LessonForStudent {
    #[schema(value_type = Uuid)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub teacher_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub duration: i32,
    pub homework_text: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub teacher_name: String,
    pub enrollment_status: String,
}

pub async fn list_for_teacher(
    db: &impl ConnectionTrait,
    teacher_id: Id,
) -> Result<Vec<LessonWithEnrollmentCount>, Error> {
    Ok(Entity::find()
        .filter(Column::TeacherId.eq(teacher_id))
        .join(JoinType::LeftJoin, Relation::Enrollments.def())
        .column_as(enrollments::Column::StudentId.count(), "enrolled_students")
        .group_by(Column::Id)
        .order_by_desc(Column::Date)
        .into_model::<LessonWithEnrollmentCount>()
        .all(db)
        .await?)
}

pub async fn list_for_student(
    db: &impl ConnectionTrait,
    student_id: Id,
) -> Result<Vec<LessonForStudent>, Error> {
    Ok(Entity::find()
        .join(JoinType::InnerJoin, Relation::Enrollments.def())
        .filter(enrollments::Column::StudentId.eq(student_id))
        .join(JoinType::InnerJoin, Relation::Users.def())
        .column_as(users::Column::Name, "teacher_name")
        .column_as(enrollments::Column::Status, "enrollment_status")
        .order_by_desc(Column::Date)
        .into_model::<LessonForStudent>()
        .all(db)
        .await?)
}

/// Teacher-scoped single-lesson read with head-count. Not-owned and
/// nonexistent lessons are indistinguishable.
pub async fn find_for_teacher(
    db: &impl ConnectionTrait,
    lesson_id: Id,
    teacher_id: Id,
) -> Result<LessonWithEnrollmentCount, Error> {
    Entity::find_by_id(lesson_id)
        .filter(Column::TeacherId.eq(teacher_id))
        .join(JoinType::LeftJoin, Relation::Enrollments.def())
        .column_as(enrollments::Column::StudentId.count(), "enrolled_students")
        .group_by(Column::Id)
        .into_model::<LessonWithEnrollmentCount>()
        .one(db)
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

/// Student-scoped single-lesson read; only lessons the student is enrolled in
/// are visible.
pub async fn find_for_student(
    db: &impl ConnectionTrait,
    lesson_id: Id,
    student_id: Id,
) -> Result<LessonForStudent, Error> {
    Entity::find_by_id(lesson_id)
        .join(JoinType::InnerJoin, Relation::Enrollments.def())
        .filter(enrollments::Column::StudentId.eq(student_id))
        .join(JoinType::InnerJoin, Relation::Users.def())
        .column_as(users::Column::Name, "teacher_name")
        .column_as(enrollments::Column::Status, "enrollment_status")
        .into_model::<LessonForStudent>()
        .one(db)
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_lesson(teacher_id: Id) -> Model {
        let now = Utc::now();
        Model {
            id: Id::new_v4(),
            teacher_id,
            title: "Linear equations".to_string(),
            description: Some("Intro".to_string()),
            date: "2025-09-01T10:00:00".to_string(),
            duration: 60,
            homework_text: None,
            created_at: now.into(),
        }
    }

    fn test_enrollment(lesson_id: Id, student_id: Id) -> enrollments::Model {
        let now = Utc::now();
        enrollments::Model {
            id: Id::new_v4(),
            lesson_id,
            student_id,
            status: STATUS_ENROLLED.to_string(),
            enrolled_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_with_enrollments_inserts_one_row_per_student() -> Result<(), Error> {
        let teacher_id = Id::new_v4();
        let lesson_model = test_lesson(teacher_id);
        let student_ids = vec![Id::new_v4(), Id::new_v4()];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![lesson_model.clone()]])
            .append_query_results(vec![vec![test_enrollment(
                lesson_model.id,
                student_ids[0],
            )]])
            .append_query_results(vec![vec![test_enrollment(
                lesson_model.id,
                student_ids[1],
            )]])
            .into_connection();

        let lesson = create_with_enrollments(&db, lesson_model.clone(), &student_ids).await?;

        assert_eq!(lesson.id, lesson_model.id);
        assert_eq!(lesson.teacher_id, teacher_id);

        Ok(())
    }

    #[tokio::test]
    async fn update_with_enrollments_reports_not_found_for_foreign_lesson() {
        // The ownership filter comes back empty, so nothing else runs.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = update_with_enrollments(
            &db,
            Id::new_v4(),
            Id::new_v4(),
            UpdateMap::new(),
            None,
        )
        .await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn update_with_enrollments_leaves_enrollments_alone_when_ids_absent() -> Result<(), Error>
    {
        let teacher_id = Id::new_v4();
        let lesson_model = test_lesson(teacher_id);

        // Only the ownership lookup runs; no enrollment delete/insert results
        // are queued, so any attempt to touch them would fail the mock.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![lesson_model.clone()]])
            .into_connection();

        let lesson = update_with_enrollments(
            &db,
            lesson_model.id,
            teacher_id,
            UpdateMap::new(),
            None,
        )
        .await?;

        assert_eq!(lesson.id, lesson_model.id);

        Ok(())
    }

    #[tokio::test]
    async fn delete_with_dependents_reports_not_found_for_foreign_lesson() {
        let no_rows = MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // enrollments, grades, files, then the guarded lesson delete
            .append_exec_results(vec![no_rows.clone(), no_rows.clone(), no_rows.clone(), no_rows])
            .into_connection();

        let result = delete_with_dependents(&db, Id::new_v4(), Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
