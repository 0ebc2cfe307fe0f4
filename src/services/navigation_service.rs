// src/services/navigation_service.rs

use crate::{
    models::{
        navigation::{NavItem, RouteDecision, RouteRequirement},
        permission::{ModuleId, PermissionKind},
    },
    services::permission_service::PermissionEngine,
};

pub const FALLBACK_ROUTE: &str = "/dashboard";

/// Guarded routes. Longer paths come first so the most specific match wins.
const ROUTE_REQUIREMENTS: &[RouteRequirement] = &[
    RouteRequirement { path: "/hrm/employees/new", module: "hrm_employees", kind: PermissionKind::IsCreate },
    RouteRequirement { path: "/hrm/employees/edit", module: "hrm_employees", kind: PermissionKind::IsEdit },
    RouteRequirement { path: "/hrm/employees", module: "hrm_employees", kind: PermissionKind::IsActive },
    RouteRequirement { path: "/hrm/attendance", module: "hrm_attendance", kind: PermissionKind::IsActive },
    RouteRequirement { path: "/hrm/leaves", module: "hrm_leaves", kind: PermissionKind::IsActive },
    RouteRequirement { path: "/hrm/payroll", module: "hrm_payroll", kind: PermissionKind::IsActive },
    RouteRequirement { path: "/users/groups/new", module: "user_management_groups", kind: PermissionKind::IsCreate },
    RouteRequirement { path: "/users/groups", module: "user_management_groups", kind: PermissionKind::IsActive },
    RouteRequirement { path: "/users/new", module: "user_management_users", kind: PermissionKind::IsCreate },
    RouteRequirement { path: "/users", module: "user_management_users", kind: PermissionKind::IsActive },
];

/// The sidebar as the front-end knows it.
#[derive(Debug, Clone)]
pub struct NavigationCatalog {
    items: Vec<NavItem>,
}

impl Default for NavigationCatalog {
    fn default() -> Self {
        Self::new(vec![
            NavItem::leaf("dashboard", "Dashboard", "/dashboard"),
            NavItem::group(
                "hrm",
                "HRM",
                "/hrm",
                vec![
                    NavItem::leaf("hrm_employees", "Employees", "/hrm/employees"),
                    NavItem::leaf("hrm_attendance", "Attendance", "/hrm/attendance"),
                    NavItem::leaf("hrm_leaves", "Leaves", "/hrm/leaves"),
                    NavItem::leaf("hrm_payroll", "Payroll", "/hrm/payroll"),
                ],
            ),
            NavItem::group(
                "user_management",
                "User Management",
                "/users",
                vec![
                    NavItem::leaf("user_management_users", "Users", "/users"),
                    NavItem::leaf("user_management_groups", "Groups", "/users/groups"),
                ],
            ),
            NavItem::leaf("logout", "Logout", "/logout"),
        ])
    }
}

impl NavigationCatalog {
    pub fn new(items: Vec<NavItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Everything starts hidden; an item shows up only when the engine says
    /// the module (or one of its descendants) is reachable.
    pub fn visible_items(&self, engine: &PermissionEngine<'_>) -> Vec<NavItem> {
        filter_items(&self.items, engine)
    }
}

fn filter_items(items: &[NavItem], engine: &PermissionEngine<'_>) -> Vec<NavItem> {
    items
        .iter()
        .filter(|item| engine.has_any_permission(&item.module))
        .map(|item| NavItem {
            children: filter_items(&item.children, engine),
            ..item.clone()
        })
        .collect()
}

/// Most specific guarded route for `path`, matching whole path segments.
pub fn route_requirement(path: &str) -> Option<&'static RouteRequirement> {
    let path = path.trim_end_matches('/');
    ROUTE_REQUIREMENTS.iter().find(|req| {
        path == req.path
            || path
                .strip_prefix(req.path)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

pub fn check_route(path: &str, engine: &PermissionEngine<'_>) -> RouteDecision {
    let allowed = match route_requirement(path) {
        Some(req) => engine.has_permission(&ModuleId::new(req.module), req.kind),
        None => true,
    };

    if !allowed {
        tracing::warn!("Route {} denied, redirecting to {}", path, FALLBACK_ROUTE);
    }

    RouteDecision {
        path: path.to_string(),
        allowed,
        redirect: (!allowed).then(|| FALLBACK_ROUTE.to_string()),
    }
}
