// src/services/permission_service.rs

use crate::models::{
    permission::{ModuleId, PermissionKind, PermissionSet, Subject},
    session::SessionContext,
};

/// Sections every signed-in user can reach.
pub const UNIVERSAL_MODULES: [&str; 2] = ["dashboard", "logout"];

pub fn is_admin(subject: &Subject) -> bool {
    subject.is_admin()
}

/// Evaluates checks for one subject against one permission snapshot.
/// Nothing is cached: every call looks at the snapshot it was built from.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEngine<'a> {
    subject: Option<&'a Subject>,
    permissions: &'a PermissionSet,
}

impl<'a> PermissionEngine<'a> {
    pub fn new(subject: Option<&'a Subject>, permissions: &'a PermissionSet) -> Self {
        Self { subject, permissions }
    }

    pub fn for_session(session: &'a SessionContext) -> Self {
        Self::new(Some(&session.subject), &session.permissions)
    }

    pub fn is_admin(&self) -> bool {
        self.subject.is_some_and(is_admin)
    }

    /// Exact check on one module. An inactive record grants nothing.
    pub fn has_permission(&self, module: &ModuleId, kind: PermissionKind) -> bool {
        if self.is_admin() {
            return true;
        }
        self.permissions
            .get(module)
            .is_some_and(|record| record.grants(kind))
    }

    /// Visibility check: the module itself or any descendant is active.
    pub fn has_any_permission(&self, module: &ModuleId) -> bool {
        if self.is_admin() {
            return true;
        }
        if UNIVERSAL_MODULES.contains(&module.as_str()) {
            return true;
        }
        if self.permissions.get(module).is_some_and(|record| record.is_active) {
            return true;
        }
        self.permissions
            .descendants(module)
            .any(|(_, record)| record.is_active)
    }
}

/// Group permission editor: returns the set with one flag changed and the
/// touched record reconciled.
pub fn reconcile(permissions: &PermissionSet, module: &ModuleId, kind: PermissionKind, value: bool) -> PermissionSet {
    tracing::debug!("Setting {} on {} to {}", kind, module, value);
    permissions.with_flag(module, kind, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::permission::PermissionRecord;
    use proptest::prelude::*;

    fn admin() -> Subject {
        Subject { is_admin: true, username: "root".into(), ..Default::default() }
    }

    fn staff() -> Subject {
        Subject { username: "staff".into(), ..Default::default() }
    }

    fn sample() -> PermissionSet {
        PermissionSet::new()
            .with("hrm_employees", PermissionRecord { is_active: true, is_create: true, ..Default::default() })
            .with("hrm_leaves", PermissionRecord { is_active: false, is_create: true, is_edit: true, is_delete: true })
            .with("user_management_groups", PermissionRecord::default())
    }

    #[test]
    fn admin_bypasses_everything() {
        let empty = PermissionSet::new();
        let subject = admin();
        let engine = PermissionEngine::new(Some(&subject), &empty);
        assert!(engine.has_permission(&"payroll_runs".into(), PermissionKind::IsDelete));
        assert!(engine.has_any_permission(&"does_not_exist".into()));
    }

    #[test]
    fn universal_modules_need_no_record() {
        let empty = PermissionSet::new();
        let engine = PermissionEngine::new(None, &empty);
        assert!(engine.has_any_permission(&"dashboard".into()));
        assert!(engine.has_any_permission(&"logout".into()));
        assert!(!engine.has_any_permission(&"hrm".into()));
        assert!(!engine.has_permission(&"dashboard".into(), PermissionKind::IsActive));
    }

    #[test]
    fn inactive_records_grant_nothing() {
        let set = sample();
        let subject = staff();
        let engine = PermissionEngine::new(Some(&subject), &set);
        for kind in [PermissionKind::IsActive, PermissionKind::IsCreate, PermissionKind::IsEdit, PermissionKind::IsDelete] {
            assert!(!engine.has_permission(&"hrm_leaves".into(), kind));
        }
        assert!(engine.has_permission(&"hrm_employees".into(), PermissionKind::IsCreate));
        assert!(!engine.has_permission(&"hrm_employees".into(), PermissionKind::IsEdit));
        assert!(!engine.has_permission(&"missing".into(), PermissionKind::IsActive));
    }

    #[test]
    fn active_descendant_makes_parent_visible() {
        let active = PermissionSet::new().with("hrm_employees", PermissionRecord::view_only());
        assert!(PermissionEngine::new(None, &active).has_any_permission(&"hrm".into()));

        let inactive = PermissionSet::new().with("hrm_employees", PermissionRecord::default());
        assert!(!PermissionEngine::new(None, &inactive).has_any_permission(&"hrm".into()));
    }

    #[test]
    fn sibling_prefixes_do_not_leak() {
        let set = PermissionSet::new().with("hrmx_reports", PermissionRecord::full_access());
        assert!(!PermissionEngine::new(None, &set).has_any_permission(&"hrm".into()));
    }

    #[test]
    fn checks_follow_the_current_snapshot() {
        let before = PermissionSet::new();
        let after = reconcile(&before, &"hrm_employees".into(), PermissionKind::IsCreate, true);
        assert!(!PermissionEngine::new(None, &before).has_any_permission(&"hrm_employees".into()));
        let engine = PermissionEngine::new(None, &after);
        assert!(engine.has_permission(&"hrm_employees".into(), PermissionKind::IsActive));
        assert!(engine.has_permission(&"hrm_employees".into(), PermissionKind::IsCreate));
    }

    #[test]
    fn deactivating_clears_actions() {
        let set = PermissionSet::new().with("hrm_employees", PermissionRecord::full_access());
        let set = reconcile(&set, &"hrm_employees".into(), PermissionKind::IsActive, false);
        let engine = PermissionEngine::new(None, &set);
        assert!(!engine.has_permission(&"hrm_employees".into(), PermissionKind::IsEdit));
        assert_eq!(set.get(&"hrm_employees".into()), Some(&PermissionRecord::default()));
    }

    proptest! {
        #[test]
        fn admin_sees_any_module(module in "[a-z]{1,8}(_[a-z]{1,8}){0,3}") {
            let empty = PermissionSet::new();
            let subject = admin();
            prop_assert!(PermissionEngine::new(Some(&subject), &empty).has_any_permission(&ModuleId::new(module)));
        }

        #[test]
        fn inactive_gates_all_kinds(create in any::<bool>(), edit in any::<bool>(), delete in any::<bool>()) {
            let set = PermissionSet::new().with(
                "payroll",
                PermissionRecord { is_active: false, is_create: create, is_edit: edit, is_delete: delete },
            );
            let engine = PermissionEngine::new(None, &set);
            for kind in [PermissionKind::IsActive, PermissionKind::IsCreate, PermissionKind::IsEdit, PermissionKind::IsDelete] {
                prop_assert!(!engine.has_permission(&"payroll".into(), kind));
            }
        }
    }
}
