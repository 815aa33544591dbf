use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Metadata for uploaded lesson files. `filename` is the generated
        // on-disk token; `original_name` is whatever the uploader called it.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS tutor_platform.files (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    lesson_id UUID NOT NULL REFERENCES tutor_platform.lessons(id),
                    filename VARCHAR(255) NOT NULL,
                    original_name VARCHAR(255) NOT NULL,
                    mime_type VARCHAR(100) NOT NULL,
                    size BIGINT NOT NULL,
                    uploaded_by UUID NOT NULL REFERENCES tutor_platform.users(id),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE tutor_platform.files OWNER TO tutor")
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_files_lesson
                 ON tutor_platform.files(lesson_id)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS tutor_platform.files")
            .await?;

        Ok(())
    }
}
