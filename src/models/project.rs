//! Project model.

use serde::{Deserialize, Serialize};

/// Commercial classification of a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectType {
    External,
    Internal,
    Other,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::External => "External",
            ProjectType::Internal => "Internal",
            ProjectType::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "External" => Some(ProjectType::External),
            "Internal" => Some(ProjectType::Internal),
            "Other" => Some(ProjectType::Other),
            _ => None,
        }
    }
}

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectStatus {
    Planning,
    Active,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Planning" => Some(ProjectStatus::Planning),
            "Active" => Some(ProjectStatus::Active),
            "Completed" => Some(ProjectStatus::Completed),
            "On Hold" => Some(ProjectStatus::OnHold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub code: String,
    pub client: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub order_amount: i64,
    pub start_date: String,
    pub end_date: String,
    pub status: ProjectStatus,
}

/// Request body for creating a new project. The id is generated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub client: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    #[serde(default)]
    pub order_amount: i64,
    pub start_date: String,
    pub end_date: String,
    pub status: ProjectStatus,
}

/// Request body for updating an existing project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default, rename = "type")]
    pub project_type: Option<ProjectType>,
    #[serde(default)]
    pub order_amount: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_hold_status_wire_name() {
        let status: ProjectStatus = serde_json::from_str("\"On Hold\"").unwrap();
        assert_eq!(status, ProjectStatus::OnHold);
        assert_eq!(ProjectStatus::from_str(status.as_str()), Some(status));
    }

    #[test]
    fn test_project_type_key() {
        let request: CreateProjectRequest = serde_json::from_value(serde_json::json!({
            "name": "Test Project",
            "type": "External",
            "start_date": "2026-01-01",
            "end_date": "2026-12-31",
            "status": "Planning"
        }))
        .unwrap();
        assert_eq!(request.project_type, ProjectType::External);
        assert_eq!(request.order_amount, 0);
    }
}
