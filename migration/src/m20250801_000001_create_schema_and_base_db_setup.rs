use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the platform's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS tutor_platform;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO tutor_platform, public;")
            .await?;

        // Grant the base DB user that executes all platform queries
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    GRANT ALL PRIVILEGES ON DATABASE tutor TO tutor;
                    GRANT ALL ON SCHEMA tutor_platform TO tutor;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA tutor_platform GRANT ALL ON TABLES TO tutor;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA tutor_platform GRANT ALL ON SEQUENCES TO tutor;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA tutor_platform GRANT ALL ON FUNCTIONS TO tutor;
                END $$;
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Revoke default privileges first
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA tutor_platform REVOKE ALL ON FUNCTIONS FROM tutor;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA tutor_platform REVOKE ALL ON SEQUENCES FROM tutor;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA tutor_platform REVOKE ALL ON TABLES FROM tutor;
                    REVOKE ALL ON SCHEMA tutor_platform FROM tutor;
                    REVOKE ALL PRIVILEGES ON DATABASE tutor FROM tutor;
                END $$;
            "#,
            )
            .await?;

        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS tutor_platform CASCADE;")
            .await?;

        Ok(())
    }
}
