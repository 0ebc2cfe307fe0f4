// src/config.rs

use std::env;

use anyhow::Context;

use crate::services::{
    employee_service::EmployeeService,
    navigation_service::NavigationCatalog,
    session_service::{SessionService, SessionStore},
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SESSION_TTL_HOURS: i64 = 8;
const DEFAULT_CURRENCY_CODE: &str = "AED";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub currency_code: String,
}

impl AppConfig {
    /// Reads the process environment. `.env` is loaded by the caller.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let session_ttl_hours = match env::var("SESSION_TTL_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .with_context(|| format!("SESSION_TTL_HOURS must be a positive integer, got '{}'", raw))?,
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            jwt_secret,
            session_ttl_hours,
            currency_code: env::var("CURRENCY_CODE").unwrap_or_else(|_| DEFAULT_CURRENCY_CODE.to_string()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub session_service: SessionService,
    pub employee_service: EmployeeService,
    pub navigation: NavigationCatalog,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let session_service = SessionService::new(
            SessionStore::new(),
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.session_ttl_hours),
        );
        let employee_service = EmployeeService::new(config.currency_code.clone());

        Self {
            config,
            session_service,
            employee_service,
            navigation: NavigationCatalog::default(),
        }
    }
}
