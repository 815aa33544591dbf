use super::error::Error;
use chrono::Utc;
use entity::grades::{ActiveModel, Column, Entity, Model, Relation};
use entity::{lessons, users, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, sea_query::OnConflict, ConnectionTrait, FromQueryResult, JoinType,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Writes a grade for a (lesson, student) pair as a single atomic upsert
/// keyed on the pair's unique constraint. A second submission for the same
/// pair overwrites grade, feedback and timestamp instead of failing, even
/// when two submissions race.
pub async fn upsert(
    db: &impl ConnectionTrait,
    lesson_id: Id,
    student_id: Id,
    grade: i32,
    feedback: Option<String>,
) -> Result<Model, Error> {
    debug!("Upserting grade {grade} for lesson {lesson_id}, student {student_id}");

    let now = Utc::now();
    let grade_active_model = ActiveModel {
        lesson_id: Set(lesson_id),
        student_id: Set(student_id),
        grade: Set(grade),
        feedback: Set(feedback),
        created_at: Set(now.into()),
        ..Default::default()
    };

    Ok(Entity::insert(grade_active_model)
        .on_conflict(
            OnConflict::columns([Column::LessonId, Column::StudentId])
                .update_columns([Column::Grade, Column::Feedback, Column::CreatedAt])
                .to_owned(),
        )
        .exec_with_returning(db)
        .await?)
}

/// A grade joined with its lesson and the grading teacher's name.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct GradeWithLesson {
    #[schema(value_type = Uuid)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub lesson_id: Id,
    #[schema(value_type = Uuid)]
    pub student_id: Id,
    pub grade: i32,
    pub feedback: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub lesson_title: String,
    pub lesson_date: String,
    pub teacher_name: String,
}

/// A student's grades, newest lesson first. With `grading_teacher_id` set the
/// list is limited to lessons that teacher owns (the teacher-side view);
/// without it the student sees every grade of theirs.
pub async fn list_for_student(
    db: &impl ConnectionTrait,
    student_id: Id,
    grading_teacher_id: Option<Id>,
) -> Result<Vec<GradeWithLesson>, Error> {
    let mut query = Entity::find()
        .filter(Column::StudentId.eq(student_id))
        .join(JoinType::InnerJoin, Relation::Lessons.def())
        .join(JoinType::InnerJoin, lessons::Relation::Users.def())
        .column_as(lessons::Column::Title, "lesson_title")
        .column_as(lessons::Column::Date, "lesson_date")
        .column_as(users::Column::Name, "teacher_name")
        .order_by_desc(lessons::Column::Date);

    if let Some(teacher_id) = grading_teacher_id {
        query = query.filter(lessons::Column::TeacherId.eq(teacher_id));
    }

    Ok(query.into_model::<GradeWithLesson>().all(db).await?)
}

/// A grade joined with the graded student's identity.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct GradeWithStudent {
    #[schema(value_type = Uuid)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub lesson_id: Id,
    #[schema(value_type = Uuid)]
    pub student_id: Id,
    pub grade: i32,
    pub feedback: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub student_name: String,
    pub student_email: String,
}

/// Every grade for one lesson, ordered by student name. Lesson ownership is
/// checked by the caller.
pub async fn list_for_lesson(
    db: &impl ConnectionTrait,
    lesson_id: Id,
) -> Result<Vec<GradeWithStudent>, Error> {
    Ok(Entity::find()
        .filter(Column::LessonId.eq(lesson_id))
        .join(JoinType::InnerJoin, Relation::Users.def())
        .column_as(users::Column::Name, "student_name")
        .column_as(users::Column::Email, "student_email")
        .order_by_asc(users::Column::Name)
        .into_model::<GradeWithStudent>()
        .all(db)
        .await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn upsert_issues_a_single_on_conflict_statement() -> Result<(), Error> {
        let now = Utc::now();
        let grade_model = Model {
            id: Id::new_v4(),
            lesson_id: Id::new_v4(),
            student_id: Id::new_v4(),
            grade: 5,
            feedback: Some("well done".to_string()),
            created_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![grade_model.clone()]])
            .into_connection();

        let grade = upsert(
            &db,
            grade_model.lesson_id,
            grade_model.student_id,
            5,
            grade_model.feedback.clone(),
        )
        .await?;

        assert_eq!(grade.grade, 5);

        // One round trip: the conflict handling lives in the statement itself,
        // not in a query-before-write.
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log[0]).contains("ON CONFLICT"));

        Ok(())
    }
}
