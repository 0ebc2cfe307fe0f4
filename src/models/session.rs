// src/models/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::permission::{PermissionSet, Subject};

/// Everything the permission engine needs about one signed-in user.
/// Created on login, dropped on logout or when its token is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub id: Uuid,
    pub subject: Subject,
    pub permissions: PermissionSet,
    pub opened_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// The login service's response, forwarded by the front-end
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionPayload {
    #[validate(nested)]
    pub user: Subject,

    // Kept raw: a broken permission payload must not reject the login
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"hrm_employees": {"isActive": true, "isCreate": true, "isEdit": false, "isDelete": false}}))]
    pub permissions: Value,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub user: Subject,
    pub is_admin: bool,
    #[schema(value_type = Object)]
    pub permissions: PermissionSet,
    pub expires_at: DateTime<Utc>,
}

impl From<&SessionContext> for SessionSnapshot {
    fn from(ctx: &SessionContext) -> Self {
        Self {
            user: ctx.subject.clone(),
            is_admin: ctx.subject.is_admin(),
            permissions: ctx.permissions.clone(),
            expires_at: ctx.expires_at,
        }
    }
}

// Claims carried by the session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // session id
    pub exp: usize,
    pub iat: usize,
}
