// src/models/navigation.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::permission::{ModuleId, PermissionKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub module: ModuleId,

    #[schema(example = "Employees")]
    pub label: String,

    #[schema(example = "/hrm/employees")]
    pub path: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[schema(no_recursion)]
    pub children: Vec<NavItem>,
}

impl NavItem {
    pub fn leaf(module: &str, label: &str, path: &str) -> Self {
        Self {
            module: ModuleId::new(module),
            label: label.to_string(),
            path: path.to_string(),
            children: Vec::new(),
        }
    }

    pub fn group(module: &str, label: &str, path: &str, children: Vec<NavItem>) -> Self {
        Self { children, ..Self::leaf(module, label, path) }
    }
}

/// A guarded front-end route and the permission it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequirement {
    pub path: &'static str,
    pub module: &'static str,
    pub kind: PermissionKind,
}

#[derive(Debug, Deserialize, Validate, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RouteQuery {
    #[validate(length(min = 1, message = "Path is required."))]
    pub path: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteDecision {
    pub path: String,
    pub allowed: bool,
    // Where the front-end should go instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}
