//! Seeds a development database with a teacher, two students and one lesson.
//! Run with: cargo run --bin seed_db

use chrono::Utc;
use entity_api::{lessons, users, Id};
use log::*;
use migration::{Migrator, MigratorTrait};
use service::config::Config;
use service::logging::Logger;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let db = service::init_database(&config)
        .await
        .expect("Failed to connect to the database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to apply database migrations");

    let now = Utc::now();

    let teacher = entity_api::user::create(
        &db,
        users::Model {
            id: Id::default(),
            name: "Nina Petrova".to_string(),
            email: "nina.petrova@example.com".to_string(),
            role: users::Role::Teacher,
            password: "password".to_string(),
            created_at: now.into(),
        },
    )
    .await
    .expect("Failed to seed teacher");

    let mut student_ids = Vec::new();
    for (name, email) in [
        ("Ivan Smirnov", "ivan.smirnov@example.com"),
        ("Maria Ivanova", "maria.ivanova@example.com"),
    ] {
        let student = entity_api::user::create(
            &db,
            users::Model {
                id: Id::default(),
                name: name.to_string(),
                email: email.to_string(),
                role: users::Role::Student,
                password: "password".to_string(),
                created_at: now.into(),
            },
        )
        .await
        .expect("Failed to seed student");
        student_ids.push(student.id);
    }

    let lesson = entity_api::lesson::create_with_enrollments(
        &db,
        lessons::Model {
            id: Id::default(),
            teacher_id: teacher.id,
            title: "Introduction to fractions".to_string(),
            description: Some("First lesson of the term".to_string()),
            date: "2025-09-01T10:00:00".to_string(),
            duration: 60,
            homework_text: None,
            created_at: now.into(),
        },
        &student_ids,
    )
    .await
    .expect("Failed to seed lesson");

    info!(
        "Seeded teacher {}, {} students and lesson {}",
        teacher.email,
        student_ids.len(),
        lesson.id
    );
}
