//! Database repository for project, assignment and position-level operations.
//!
//! Members live in `MemberStore`; everything here is single-statement CRUD.

use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Assignment, CreateAssignmentRequest, CreateProjectRequest, MonthlyWeights, Project,
    ProjectStatus, ProjectType, Role, UpdateAssignmentRequest, UpdateProjectRequest,
};

/// Database repository for projects, assignments and position levels.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== PROJECT OPERATIONS ====================

    /// List all projects.
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, code, client, type, order_amount, start_date, end_date, status FROM projects ORDER BY start_date, id"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(project_from_row).collect()
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, code, client, type, order_amount, start_date, end_date, status FROM projects WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(project_from_row).transpose()
    }

    /// Create a new project with a generated ID.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, AppError> {
        let project = Project {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name.clone(),
            code: request.code.clone(),
            client: request.client.clone(),
            project_type: request.project_type,
            order_amount: request.order_amount,
            start_date: request.start_date.clone(),
            end_date: request.end_date.clone(),
            status: request.status,
        };

        self.write_project("INSERT INTO projects (name, code, client, type, order_amount, start_date, end_date, status, id) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)", &project)
            .await?;

        Ok(project)
    }

    /// Update a project. Returns `None` when it does not exist.
    pub async fn update_project(
        &self,
        id: &str,
        request: &UpdateProjectRequest,
    ) -> Result<Option<Project>, AppError> {
        let Some(existing) = self.get_project(id).await? else {
            return Ok(None);
        };

        let project = Project {
            id: existing.id,
            name: request.name.clone().unwrap_or(existing.name),
            code: request.code.clone().unwrap_or(existing.code),
            client: request.client.clone().unwrap_or(existing.client),
            project_type: request.project_type.unwrap_or(existing.project_type),
            order_amount: request.order_amount.unwrap_or(existing.order_amount),
            start_date: request.start_date.clone().unwrap_or(existing.start_date),
            end_date: request.end_date.clone().unwrap_or(existing.end_date),
            status: request.status.unwrap_or(existing.status),
        };

        self.write_project("UPDATE projects SET name = ?, code = ?, client = ?, type = ?, order_amount = ?, start_date = ?, end_date = ?, status = ? WHERE id = ?", &project)
            .await?;

        Ok(Some(project))
    }

    /// Delete a project. Deleting a missing project is not an error.
    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn write_project(&self, sql: &str, project: &Project) -> Result<(), AppError> {
        sqlx::query(sql)
            .bind(&project.name)
            .bind(&project.code)
            .bind(&project.client)
            .bind(project.project_type.as_str())
            .bind(project.order_amount)
            .bind(&project.start_date)
            .bind(&project.end_date)
            .bind(project.status.as_str())
            .bind(&project.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== ASSIGNMENT OPERATIONS ====================

    /// List all assignments.
    pub async fn list_assignments(&self) -> Result<Vec<Assignment>, AppError> {
        let rows = sqlx::query(
            "SELECT id, project_id, member_id, member_name, role, start_date, end_date, input_ratio, monthly_weights FROM assignments ORDER BY project_id, start_date, id"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(assignment_from_row).collect()
    }

    /// Get an assignment by ID.
    pub async fn get_assignment(&self, id: &str) -> Result<Option<Assignment>, AppError> {
        let row = sqlx::query(
            "SELECT id, project_id, member_id, member_name, role, start_date, end_date, input_ratio, monthly_weights FROM assignments WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(assignment_from_row).transpose()
    }

    /// Create a new assignment with a generated ID.
    pub async fn create_assignment(
        &self,
        request: &CreateAssignmentRequest,
    ) -> Result<Assignment, AppError> {
        let assignment = Assignment {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: request.project_id.clone(),
            member_id: request.member_id.clone(),
            member_name: request.member_name.clone(),
            role: request.role,
            start_date: request.start_date.clone(),
            end_date: request.end_date.clone(),
            input_ratio: request.input_ratio,
            monthly_weights: request.monthly_weights.clone(),
        };

        self.write_assignment("INSERT INTO assignments (project_id, member_id, member_name, role, start_date, end_date, input_ratio, monthly_weights, id) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)", &assignment)
            .await?;

        Ok(assignment)
    }

    /// Update an assignment. Returns `None` when it does not exist.
    pub async fn update_assignment(
        &self,
        id: &str,
        request: &UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>, AppError> {
        let Some(existing) = self.get_assignment(id).await? else {
            return Ok(None);
        };

        let assignment = Assignment {
            id: existing.id,
            project_id: request.project_id.clone().unwrap_or(existing.project_id),
            member_id: request.member_id.clone().unwrap_or(existing.member_id),
            member_name: request.member_name.clone().unwrap_or(existing.member_name),
            role: request.role.unwrap_or(existing.role),
            start_date: request.start_date.clone().unwrap_or(existing.start_date),
            end_date: request.end_date.clone().unwrap_or(existing.end_date),
            input_ratio: request.input_ratio.unwrap_or(existing.input_ratio),
            monthly_weights: request
                .monthly_weights
                .clone()
                .unwrap_or(existing.monthly_weights),
        };

        self.write_assignment("UPDATE assignments SET project_id = ?, member_id = ?, member_name = ?, role = ?, start_date = ?, end_date = ?, input_ratio = ?, monthly_weights = ? WHERE id = ?", &assignment)
            .await?;

        Ok(Some(assignment))
    }

    /// Delete an assignment. Deleting a missing assignment is not an error.
    pub async fn delete_assignment(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM assignments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn write_assignment(&self, sql: &str, assignment: &Assignment) -> Result<(), AppError> {
        let weights_json = serde_json::to_string(&assignment.monthly_weights)?;

        sqlx::query(sql)
            .bind(&assignment.project_id)
            .bind(&assignment.member_id)
            .bind(&assignment.member_name)
            .bind(assignment.role.as_str())
            .bind(&assignment.start_date)
            .bind(&assignment.end_date)
            .bind(assignment.input_ratio)
            .bind(&weights_json)
            .bind(&assignment.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== POSITION LEVELS ====================

    /// List position level names in catalog order.
    pub async fn list_position_levels(&self) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar("SELECT name FROM position_levels ORDER BY sort_order")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }
}

// Helper functions for row conversion

fn project_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Project, AppError> {
    let type_str: String = row.get("type");
    let status_str: String = row.get("status");

    Ok(Project {
        id: row.get("id"),
        name: row.get("name"),
        code: row.get("code"),
        client: row.get("client"),
        project_type: ProjectType::from_str(&type_str)
            .ok_or_else(|| AppError::Internal(format!("Unknown project type {}", type_str)))?,
        order_amount: row.get("order_amount"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        status: ProjectStatus::from_str(&status_str)
            .ok_or_else(|| AppError::Internal(format!("Unknown project status {}", status_str)))?,
    })
}

fn assignment_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Assignment, AppError> {
    let role_str: String = row.get("role");
    let weights_str: String = row.get("monthly_weights");

    Ok(Assignment {
        id: row.get("id"),
        project_id: row.get("project_id"),
        member_id: row.get("member_id"),
        member_name: row.get("member_name"),
        role: Role::from_str(&role_str)
            .ok_or_else(|| AppError::Internal(format!("Unknown role {}", role_str)))?,
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        input_ratio: row.get("input_ratio"),
        monthly_weights: parse_weights(&weights_str)?,
    })
}

fn parse_weights(s: &str) -> Result<MonthlyWeights, AppError> {
    serde_json::from_str(s).map_err(|e| {
        tracing::error!("Unreadable monthly_weights {:?}: {}", s, e);
        AppError::Internal(format!("Unreadable monthly weights: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"), 5)
            .await
            .expect("Failed to init DB");
        (Repository::new(pool), temp_dir)
    }

    fn new_project() -> CreateProjectRequest {
        CreateProjectRequest {
            name: "Test Project".to_string(),
            code: "TEST-2026".to_string(),
            client: "Test Client".to_string(),
            project_type: ProjectType::External,
            order_amount: 100000,
            start_date: "2026-01-01".to_string(),
            end_date: "2026-12-31".to_string(),
            status: ProjectStatus::Planning,
        }
    }

    #[tokio::test]
    async fn test_project_partial_update() {
        let (repo, _dir) = repo().await;
        let created = repo.create_project(&new_project()).await.unwrap();

        let request = UpdateProjectRequest {
            name: Some("Updated Project Name".to_string()),
            status: Some(ProjectStatus::OnHold),
            ..Default::default()
        };
        let updated = repo
            .update_project(&created.id, &request)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Updated Project Name");
        assert_eq!(updated.code, "TEST-2026");
        assert_eq!(updated.status, ProjectStatus::OnHold);

        let stored = repo.get_project(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ProjectStatus::OnHold);

        assert!(repo
            .update_project("missing", &request)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_project_delete_is_idempotent() {
        let (repo, _dir) = repo().await;
        let created = repo.create_project(&new_project()).await.unwrap();

        repo.delete_project(&created.id).await.unwrap();
        repo.delete_project(&created.id).await.unwrap();
        assert!(repo.get_project(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_assignment_weights_persist() {
        let (repo, _dir) = repo().await;
        let mut weights = MonthlyWeights::new();
        weights.insert("2026-02".to_string(), 0.5);
        weights.insert("2026-03".to_string(), 0.5);

        let created = repo
            .create_assignment(&CreateAssignmentRequest {
                project_id: "p3".to_string(),
                member_id: "m5".to_string(),
                member_name: "Jung Tae-woo".to_string(),
                role: Role::TA,
                start_date: "2026-02-01".to_string(),
                end_date: "2026-03-31".to_string(),
                input_ratio: 0.5,
                monthly_weights: weights.clone(),
            })
            .await
            .unwrap();

        let stored = repo.get_assignment(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.monthly_weights, weights);
        assert_eq!(stored.role, Role::TA);

        let request = UpdateAssignmentRequest {
            role: Some(Role::PL),
            ..Default::default()
        };
        let updated = repo
            .update_assignment(&created.id, &request)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, Role::PL);
        assert_eq!(updated.monthly_weights, weights);
    }

    #[tokio::test]
    async fn test_corrupt_weights_are_reported() {
        let (repo, _dir) = repo().await;
        sqlx::query(
            "INSERT INTO assignments (id, project_id, member_id, member_name, role, start_date, end_date, input_ratio, monthly_weights) VALUES ('a9', 'p1', 'm1', 'Kim', 'DEV', '2026-01-01', '2026-01-31', 1.0, 'not json')"
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let err = repo.get_assignment("a9").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(repo.list_assignments().await.is_err());
    }
}
