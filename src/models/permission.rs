// src/models/permission.rs

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Separator between the segments of a hierarchical module id
/// (`hrm_employees_view` is a child of `hrm_employees`, which is a child of `hrm`).
pub const MODULE_SEPARATOR: char = '_';

// --- Module ---

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(MODULE_SEPARATOR)
    }

    /// `hrm_employees` -> `hrm`; top-level modules have no parent.
    pub fn parent(&self) -> Option<ModuleId> {
        self.0
            .rsplit_once(MODULE_SEPARATOR)
            .map(|(parent, _)| ModuleId::new(parent))
            .filter(|parent| !parent.0.is_empty())
    }

    /// Every key that starts with this prefix is a descendant.
    pub fn descendant_prefix(&self) -> String {
        format!("{}{}", self.0, MODULE_SEPARATOR)
    }

    pub fn is_descendant_of(&self, ancestor: &ModuleId) -> bool {
        self.0.starts_with(&ancestor.descendant_prefix())
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// --- Record ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PermissionKind {
    #[default]
    IsActive,
    IsCreate,
    IsEdit,
    IsDelete,
}

impl PermissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::IsActive => "isActive",
            PermissionKind::IsCreate => "isCreate",
            PermissionKind::IsEdit => "isEdit",
            PermissionKind::IsDelete => "isDelete",
        }
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionRecord {
    pub is_active: bool,
    pub is_create: bool,
    pub is_edit: bool,
    pub is_delete: bool,
}

impl PermissionRecord {
    pub fn full_access() -> Self {
        Self { is_active: true, is_create: true, is_edit: true, is_delete: true }
    }

    pub fn view_only() -> Self {
        Self { is_active: true, ..Self::default() }
    }

    /// The raw stored flag, ignoring activation.
    pub fn flag(&self, kind: PermissionKind) -> bool {
        match kind {
            PermissionKind::IsActive => self.is_active,
            PermissionKind::IsCreate => self.is_create,
            PermissionKind::IsEdit => self.is_edit,
            PermissionKind::IsDelete => self.is_delete,
        }
    }

    /// Activation gates every other flag.
    pub fn grants(&self, kind: PermissionKind) -> bool {
        self.is_active && self.flag(kind)
    }

    pub fn has_actions(&self) -> bool {
        self.is_create || self.is_edit || self.is_delete
    }

    /// Edits one flag and keeps the record consistent:
    /// granting an action activates the module, deactivating clears every action,
    /// and revoking an action leaves the explicit activation alone.
    pub fn with_flag(mut self, kind: PermissionKind, value: bool) -> Self {
        match (kind, value) {
            (PermissionKind::IsActive, true) => self.is_active = true,
            (PermissionKind::IsActive, false) => self = Self::default(),
            (PermissionKind::IsCreate, v) => self.is_create = v,
            (PermissionKind::IsEdit, v) => self.is_edit = v,
            (PermissionKind::IsDelete, v) => self.is_delete = v,
        }
        if self.has_actions() {
            self.is_active = true;
        }
        self
    }
}

// --- Set ---

/// Permissions of one session, keyed by module id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<ModuleId, PermissionRecord>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tolerant parse of the login payload. Anything that is not an object
    /// (or a JSON string holding one) becomes the empty set; malformed records
    /// are skipped.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(entries) => {
                let mut set = Self::new();
                for (module, raw) in entries {
                    match serde_json::from_value::<PermissionRecord>(raw.clone()) {
                        Ok(record) => {
                            set.0.insert(ModuleId::new(module.as_str()), record);
                        }
                        Err(e) => {
                            tracing::warn!("Skipping malformed permission record '{}': {}", module, e);
                        }
                    }
                }
                set
            }
            Value::String(raw) => Self::from_json_str(raw),
            Value::Null => Self::new(),
            other => {
                tracing::warn!("Permission payload is not an object ({}), denying everything", kind_of(other));
                Self::new()
            }
        }
    }

    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::String(_)) => {
                tracing::warn!("Permission payload is a doubly encoded string, denying everything");
                Self::new()
            }
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::warn!("Permission payload could not be parsed, denying everything: {}", e);
                Self::new()
            }
        }
    }

    pub fn get(&self, module: &ModuleId) -> Option<&PermissionRecord> {
        self.0.get(module)
    }

    pub fn insert(&mut self, module: impl Into<ModuleId>, record: PermissionRecord) {
        self.0.insert(module.into(), record);
    }

    pub fn with(mut self, module: &str, record: PermissionRecord) -> Self {
        self.insert(module, record);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, &PermissionRecord)> {
        self.0.iter()
    }

    /// Records strictly below `module` in the hierarchy. The map is ordered, so
    /// all keys sharing the `module_` prefix form one contiguous range.
    pub fn descendants<'a>(
        &'a self,
        module: &ModuleId,
    ) -> impl Iterator<Item = (&'a ModuleId, &'a PermissionRecord)> + use<'a> {
        let prefix = module.descendant_prefix();
        let start = ModuleId::new(prefix.clone());
        self.0
            .range(start..)
            .take_while(move |(key, _)| key.as_str().starts_with(&prefix))
    }

    /// Returns a copy with one flag edited through `PermissionRecord::with_flag`.
    pub fn with_flag(&self, module: &ModuleId, kind: PermissionKind, value: bool) -> Self {
        let mut next = self.clone();
        let current = next.0.get(module).copied().unwrap_or_default();
        next.0.insert(module.clone(), current.with_flag(kind, value));
        next
    }
}

impl FromIterator<(ModuleId, PermissionRecord)> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = (ModuleId, PermissionRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// Never fails: a broken payload degrades to "no permissions".
impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// --- Subject ---

/// The signed-in user as reported by the login service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(default)]
    pub is_admin: bool,

    #[serde(default)]
    pub is_administrator: bool,

    #[serde(default)]
    #[schema(example = "Fatima Khan")]
    pub name: String,

    #[validate(length(min = 1, message = "Username is required."))]
    #[schema(example = "fkhan")]
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "fatima.khan@example.com")]
    pub email: Option<String>,
}

impl Subject {
    pub fn is_admin(&self) -> bool {
        self.is_admin || self.is_administrator
    }
}
