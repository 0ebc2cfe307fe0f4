// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::{
        permission::{ModuleId, PermissionKind},
        session::SessionContext,
    },
    services::permission_service::PermissionEngine,
};

/// A permission a handler needs before it runs.
pub trait PermissionDef: Send + Sync + 'static {
    fn module() -> &'static str;
    /// `None` accepts any permission on the module or one of its descendants.
    fn kind() -> Option<PermissionKind>;
}

/// Extractor that rejects with 403 unless the session grants `T`.
/// Must sit behind `auth_guard`.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<SessionContext>()
            .ok_or(AppError::SessionNotFound)?;

        let module = ModuleId::new(T::module());
        let kind = T::kind();

        let engine = PermissionEngine::for_session(session);
        let granted = match kind {
            Some(kind) => engine.has_permission(&module, kind),
            None => engine.has_any_permission(&module),
        };

        if !granted {
            let kind = kind.map(|k| k.as_str()).unwrap_or("any");
            tracing::warn!(
                "'{}' was denied {} on {}",
                session.subject.username,
                kind,
                module
            );
            return Err(AppError::Forbidden {
                module: module.to_string(),
                kind: kind.to_string(),
            });
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// PERMISSIONS USED BY THE API
// ---

pub struct PermEmployeesAccess;
impl PermissionDef for PermEmployeesAccess {
    fn module() -> &'static str { "hrm_employees" }
    fn kind() -> Option<PermissionKind> { None }
}

pub struct PermEmployeesCreate;
impl PermissionDef for PermEmployeesCreate {
    fn module() -> &'static str { "hrm_employees" }
    fn kind() -> Option<PermissionKind> { Some(PermissionKind::IsCreate) }
}

pub struct PermGroupsEdit;
impl PermissionDef for PermGroupsEdit {
    fn module() -> &'static str { "user_management_groups" }
    fn kind() -> Option<PermissionKind> { Some(PermissionKind::IsEdit) }
}
