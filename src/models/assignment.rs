//! Assignment model linking a member to a project.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Role a member plays on a project.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    PM,
    PL,
    AA,
    TA,
    DA,
    UA,
    DEV,
    DES,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PM => "PM",
            Role::PL => "PL",
            Role::AA => "AA",
            Role::TA => "TA",
            Role::DA => "DA",
            Role::UA => "UA",
            Role::DEV => "DEV",
            Role::DES => "DES",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PM" => Some(Role::PM),
            "PL" => Some(Role::PL),
            "AA" => Some(Role::AA),
            "TA" => Some(Role::TA),
            "DA" => Some(Role::DA),
            "UA" => Some(Role::UA),
            "DEV" => Some(Role::DEV),
            "DES" => Some(Role::DES),
            _ => None,
        }
    }
}

/// Effort weight per calendar month, keyed by `YYYY-MM`.
pub type MonthlyWeights = BTreeMap<String, f64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub project_id: String,
    pub member_id: String,
    pub member_name: String,
    pub role: Role,
    pub start_date: String,
    pub end_date: String,
    pub input_ratio: f64,
    #[serde(default)]
    pub monthly_weights: MonthlyWeights,
}

/// Request body for creating a new assignment. The id is generated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub project_id: String,
    pub member_id: String,
    #[serde(default)]
    pub member_name: String,
    pub role: Role,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub input_ratio: f64,
    #[serde(default)]
    pub monthly_weights: MonthlyWeights,
}

/// Request body for updating an existing assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub member_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub input_ratio: Option<f64>,
    #[serde(default)]
    pub monthly_weights: Option<MonthlyWeights>,
}
