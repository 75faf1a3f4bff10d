//! Member model and its request bodies.

use serde::{Deserialize, Deserializer, Serialize};

/// A staff member who can be assigned to projects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub join_date: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_number: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Soft-delete marker
    #[serde(default)]
    pub deleted: bool,
    pub updated_at: String,
}

/// Request body for creating (or reviving) a member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemberRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub join_date: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub employee_number: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Request body for updating an existing member.
///
/// Absent fields are left untouched. The nullable columns distinguish an absent
/// key (`None`) from an explicit `null` (`Some(None)`), which clears the column.
/// `skills` replaces the whole skill set when present, so an empty list clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub join_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub note: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub employee_number: Option<Option<String>>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

impl UpdateMemberRequest {
    /// Whether any column of the member row is being overwritten.
    pub fn has_fields(&self) -> bool {
        self.name.is_some()
            || self.position.is_some()
            || self.join_date.is_some()
            || self.note.is_some()
            || self.employee_number.is_some()
    }
}

/// Only called for keys that appear in the body, so `null` becomes `Some(None)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// The mutable columns of a member row.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberFields {
    pub name: String,
    pub position: String,
    pub join_date: Option<String>,
    pub note: Option<String>,
    pub employee_number: Option<String>,
}

impl MemberFields {
    /// Overlay the fields present in `request` onto the current values.
    pub fn merged(current: &Member, request: &UpdateMemberRequest) -> Self {
        Self {
            name: request.name.clone().unwrap_or_else(|| current.name.clone()),
            position: request
                .position
                .clone()
                .unwrap_or_else(|| current.position.clone()),
            join_date: overlay(&request.join_date, &current.join_date),
            note: overlay(&request.note, &current.note),
            employee_number: overlay(&request.employee_number, &current.employee_number),
        }
    }
}

fn overlay(requested: &Option<Option<String>>, current: &Option<String>) -> Option<String> {
    match requested {
        Some(value) => value.clone(),
        None => current.clone(),
    }
}

impl From<&CreateMemberRequest> for MemberFields {
    fn from(request: &CreateMemberRequest) -> Self {
        Self {
            name: request.name.clone(),
            position: request.position.clone(),
            join_date: request.join_date.clone(),
            note: request.note.clone(),
            employee_number: request.employee_number.clone(),
        }
    }
}

/// Which member rows a read may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadScope {
    /// Only rows whose soft-delete marker is clear
    #[default]
    ActiveOnly,
    /// Active and soft-deleted rows alike
    IncludeDeleted,
}

impl ReadScope {
    pub fn from_flag(include_deleted: bool) -> Self {
        if include_deleted {
            ReadScope::IncludeDeleted
        } else {
            ReadScope::ActiveOnly
        }
    }
}
