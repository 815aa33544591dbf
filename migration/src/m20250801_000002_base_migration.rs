use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE TYPE tutor_platform.role AS ENUM ('teacher', 'student')")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TYPE tutor_platform.role OWNER TO tutor")
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS tutor_platform.users (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    name VARCHAR(255) NOT NULL DEFAULT '',
                    email VARCHAR(255) NOT NULL UNIQUE,
                    role tutor_platform.role NOT NULL,
                    password TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS tutor_platform.chats (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    teacher_id UUID NOT NULL REFERENCES tutor_platform.users(id),
                    student_id UUID NOT NULL REFERENCES tutor_platform.users(id),
                    title VARCHAR(255) NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS tutor_platform.messages (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    chat_id UUID NOT NULL REFERENCES tutor_platform.chats(id) ON DELETE CASCADE,
                    sender_id UUID NOT NULL REFERENCES tutor_platform.users(id),
                    content TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS tutor_platform.lessons (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    teacher_id UUID NOT NULL REFERENCES tutor_platform.users(id),
                    title VARCHAR(255) NOT NULL,
                    description TEXT,
                    date TEXT NOT NULL,
                    duration INTEGER NOT NULL,
                    homework_text TEXT,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS tutor_platform.enrollments (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    lesson_id UUID NOT NULL REFERENCES tutor_platform.lessons(id),
                    student_id UUID NOT NULL REFERENCES tutor_platform.users(id),
                    status VARCHAR(50) NOT NULL DEFAULT 'enrolled',
                    enrolled_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    UNIQUE(lesson_id, student_id)
                )
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS tutor_platform.grades (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    lesson_id UUID NOT NULL REFERENCES tutor_platform.lessons(id),
                    student_id UUID NOT NULL REFERENCES tutor_platform.users(id),
                    grade INTEGER NOT NULL,
                    feedback TEXT,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    UNIQUE(lesson_id, student_id)
                )
            "#,
            )
            .await?;

        for table in ["users", "chats", "messages", "lessons", "enrollments", "grades"] {
            manager
                .get_connection()
                .execute_unprepared(&format!(
                    "ALTER TABLE tutor_platform.{table} OWNER TO tutor"
                ))
                .await?;
        }

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_messages_chat_created
                 ON tutor_platform.messages(chat_id, created_at)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_enrollments_student
                 ON tutor_platform.enrollments(student_id)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_lessons_teacher
                 ON tutor_platform.lessons(teacher_id)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in ["grades", "enrollments", "lessons", "messages", "chats", "users"] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP TABLE IF EXISTS tutor_platform.{table}"))
                .await?;
        }

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS tutor_platform.role")
            .await?;

        Ok(())
    }
}
