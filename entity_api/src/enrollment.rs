use super::error::Error;
use entity::enrollments::{Column, Entity, Model, Relation};
use entity::{grades, users, Id};
use sea_orm::{
    entity::prelude::*, ConnectionTrait, FromQueryResult, JoinType, QuerySelect,
};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

pub async fn find_by_lesson_and_student(
    db: &impl ConnectionTrait,
    lesson_id: Id,
    student_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::LessonId.eq(lesson_id))
        .filter(Column::StudentId.eq(student_id))
        .one(db)
        .await?)
}

#[derive(Debug, Clone, FromQueryResult)]
struct EnrolledStudentRow {
    id: Id,
    name: String,
    email: String,
    status: String,
}

/// An enrolled student with their grade for the lesson, if one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EnrolledStudent {
    #[schema(value_type = Uuid)]
    pub id: Id,
    pub name: String,
    pub email: String,
    pub status: String,
    pub grade: Option<i32>,
    pub feedback: Option<String>,
}

/// The roster for a lesson: every enrolled student joined with their user row
/// and, where present, their grade and feedback.
pub async fn students_for_lesson(
    db: &impl ConnectionTrait,
    lesson_id: Id,
) -> Result<Vec<EnrolledStudent>, Error> {
    let rows = Entity::find()
        .filter(Column::LessonId.eq(lesson_id))
        .join(JoinType::InnerJoin, Relation::Users.def())
        .select_only()
        .column(users::Column::Id)
        .column(users::Column::Name)
        .column(users::Column::Email)
        .column(Column::Status)
        .into_model::<EnrolledStudentRow>()
        .all(db)
        .await?;

    let lesson_grades: HashMap<Id, grades::Model> = grades::Entity::find()
        .filter(grades::Column::LessonId.eq(lesson_id))
        .all(db)
        .await?
        .into_iter()
        .map(|grade| (grade.student_id, grade))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let grade = lesson_grades.get(&row.id);
            EnrolledStudent {
                id: row.id,
                name: row.name,
                email: row.email,
                status: row.status,
                grade: grade.map(|g| g.grade),
                feedback: grade.and_then(|g| g.feedback.clone()),
            }
        })
        .collect())
}
