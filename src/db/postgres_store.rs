// src/db/postgres_store.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use validator::ValidationError;

use crate::{
    common::{error::AppError, validation::rule_violation},
    db::{ProjectWrite, TrackingStore},
    models::{allocation::Allocation, project::Project, resource::Resource},
};

// PostgreSQL-backed store. Uniqueness and ON DELETE SET NULL live in the schema.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Turns constraint violations into errors the caller can act on.
fn map_write_error(e: sqlx::Error, what: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::conflict(what);
        }
        if db_err.is_foreign_key_violation() {
            return AppError::not_found("Referenced project or resource");
        }
        if db_err.is_check_violation() {
            let mut err = ValidationError::new("check_violation");
            err.message = Some(
                format!("Rejected by constraint {}.", db_err.constraint().unwrap_or("unknown")).into(),
            );
            return rule_violation("billable_days", err);
        }
    }
    AppError::DatabaseError(e)
}

fn expect_one_row(rows_affected: u64, what: &str) -> Result<(), AppError> {
    if rows_affected == 0 {
        return Err(AppError::not_found(what));
    }
    Ok(())
}

// Row writes shared by the pool-level methods and `save_project`.

async fn insert_project<'e, E>(executor: E, p: &Project) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO projects
            (id, project_name, project_type, year, month, present_day,
             billable_days, non_billable_days, billable_hours, non_billable_hours,
             is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(p.id)
    .bind(&p.project_name)
    .bind(p.project_type)
    .bind(p.year)
    .bind(p.month)
    .bind(p.present_day)
    .bind(p.billable_days)
    .bind(p.non_billable_days)
    .bind(p.billable_hours)
    .bind(p.non_billable_hours)
    .bind(p.is_active)
    .bind(p.created_at)
    .bind(p.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_write_error(e, "Project for this period"))?;
    Ok(())
}

async fn update_project<'e, E>(executor: E, p: &Project) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        UPDATE projects SET
            project_name = $2,
            project_type = $3,
            year = $4,
            month = $5,
            present_day = $6,
            billable_days = $7,
            non_billable_days = $8,
            billable_hours = $9,
            non_billable_hours = $10,
            is_active = $11,
            updated_at = $12
        WHERE id = $1
        "#,
    )
    .bind(p.id)
    .bind(&p.project_name)
    .bind(p.project_type)
    .bind(p.year)
    .bind(p.month)
    .bind(p.present_day)
    .bind(p.billable_days)
    .bind(p.non_billable_days)
    .bind(p.billable_hours)
    .bind(p.non_billable_hours)
    .bind(p.is_active)
    .bind(p.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_write_error(e, "Project for this period"))?;

    expect_one_row(result.rows_affected(), "Project")
}

async fn insert_allocation<'e, E>(executor: E, a: &Allocation) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO project_resources
            (id, project_id, resource_id, present_day, billable_days, billable_hours,
             non_billable_days, non_billable_hours, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(a.id)
    .bind(a.project_id)
    .bind(a.resource_id)
    .bind(a.present_day)
    .bind(a.billable_days)
    .bind(a.billable_hours)
    .bind(a.non_billable_days)
    .bind(a.non_billable_hours)
    .bind(a.created_at)
    .bind(a.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_write_error(e, "Allocation for this resource"))?;
    Ok(())
}

#[async_trait]
impl TrackingStore for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // --- Resources ---

    async fn insert_resource(&self, r: &Resource) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO resources
                (id, resource_name, year, month, working_days, present_day, present_hours, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(r.id)
        .bind(&r.resource_name)
        .bind(r.year)
        .bind(r.month)
        .bind(r.working_days)
        .bind(r.present_day)
        .bind(r.present_hours)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Resource for this period"))?;
        Ok(())
    }

    async fn find_resource(&self, id: Uuid) -> Result<Option<Resource>, AppError> {
        let resource = sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(resource)
    }

    async fn list_resources(&self) -> Result<Vec<Resource>, AppError> {
        let resources = sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources ORDER BY resource_name, year, month",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(resources)
    }

    async fn update_resource(&self, r: &Resource) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE resources SET
                resource_name = $2,
                year = $3,
                month = $4,
                working_days = $5,
                present_day = $6,
                present_hours = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(r.id)
        .bind(&r.resource_name)
        .bind(r.year)
        .bind(r.month)
        .bind(r.working_days)
        .bind(r.present_day)
        .bind(r.present_hours)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Resource for this period"))?;

        expect_one_row(result.rows_affected(), "Resource")
    }

    async fn delete_resource(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Projects ---

    async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        insert_project(&self.pool, project).await
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    async fn update_project(&self, project: &Project) -> Result<(), AppError> {
        update_project(&self.pool, project).await
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn save_project(&self, write: &ProjectWrite) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if write.is_new {
            insert_project(&mut *tx, &write.project).await?;
        } else {
            update_project(&mut *tx, &write.project).await?;
        }

        for id in &write.removed_allocations {
            sqlx::query("DELETE FROM project_resources WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        for allocation in &write.added_allocations {
            insert_allocation(&mut *tx, allocation).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // --- Allocations ---

    async fn insert_allocation(&self, allocation: &Allocation) -> Result<(), AppError> {
        insert_allocation(&self.pool, allocation).await
    }

    async fn find_allocation(&self, id: Uuid) -> Result<Option<Allocation>, AppError> {
        let allocation =
            sqlx::query_as::<_, Allocation>("SELECT * FROM project_resources WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(allocation)
    }

    async fn find_allocation_for(
        &self,
        project_id: Uuid,
        resource_id: Uuid,
    ) -> Result<Option<Allocation>, AppError> {
        let allocation = sqlx::query_as::<_, Allocation>(
            "SELECT * FROM project_resources WHERE project_id = $1 AND resource_id = $2",
        )
        .bind(project_id)
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(allocation)
    }

    async fn list_project_allocations(&self, project_id: Uuid) -> Result<Vec<Allocation>, AppError> {
        let allocations = sqlx::query_as::<_, Allocation>(
            "SELECT * FROM project_resources WHERE project_id = $1 ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(allocations)
    }

    async fn list_allocations(&self) -> Result<Vec<Allocation>, AppError> {
        let allocations =
            sqlx::query_as::<_, Allocation>("SELECT * FROM project_resources ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(allocations)
    }

    async fn update_allocation(&self, a: &Allocation) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE project_resources SET
                project_id = $2,
                resource_id = $3,
                present_day = $4,
                billable_days = $5,
                billable_hours = $6,
                non_billable_days = $7,
                non_billable_hours = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(a.id)
        .bind(a.project_id)
        .bind(a.resource_id)
        .bind(a.present_day)
        .bind(a.billable_days)
        .bind(a.billable_hours)
        .bind(a.non_billable_days)
        .bind(a.non_billable_hours)
        .bind(a.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Allocation for this resource"))?;

        expect_one_row(result.rows_affected(), "Allocation")
    }

    async fn delete_allocation(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM project_resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
