// tests/api.rs

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use hrms_backend::{
    build_router,
    config::{AppConfig, AppState},
};

fn app() -> Router {
    build_router(AppState::new(AppConfig {
        bind_addr: "127.0.0.1:0".into(),
        jwt_secret: "integration-secret".into(),
        session_ttl_hours: 1,
        currency_code: "AED".into(),
    }))
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn login(app: &Router, user: Value, permissions: Value) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/session/login",
        None,
        Some(json!({ "user": user, "permissions": permissions })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

async fn login_as_hr(app: &Router) -> String {
    login(
        app,
        json!({ "username": "hr.officer", "name": "HR Officer" }),
        json!({
            "hrm_employees": { "isActive": true, "isCreate": false, "isEdit": false, "isDelete": false },
            "hrm_leaves": { "isActive": true }
        }),
    )
    .await
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(&app(), Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/salary/apply"].is_object());
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/api/navigation", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/session/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_a_missing_username() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/session/login",
        None,
        Some(json!({ "user": { "username": "" }, "permissions": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].is_object());
}

#[tokio::test]
async fn malformed_permissions_still_open_a_session() {
    let app = app();
    let token = login(&app, json!({ "username": "guest" }), json!("{not json")).await;

    let (status, body) = send(&app, Method::GET, "/api/session/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissions"], json!({}));
    assert_eq!(body["isAdmin"], json!(false));

    let (_, items) = send(&app, Method::GET, "/api/navigation", Some(&token), None).await;
    let labels: Vec<&str> = items.as_array().unwrap().iter().map(|i| i["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["Dashboard", "Logout"]);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = app();
    let token = login_as_hr(&app).await;

    let (status, _) = send(&app, Method::POST, "/api/session/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/session/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn permission_check_reports_both_answers() {
    let app = app();
    let token = login_as_hr(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/permissions/check?module=hrm&kind=isActive", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasPermission"], json!(false));
    assert_eq!(body["hasAnyPermission"], json!(true));

    let (_, body) = send(&app, Method::GET, "/api/permissions/check?module=hrm_employees&kind=isCreate", Some(&token), None).await;
    assert_eq!(body["hasPermission"], json!(false));
}

#[tokio::test]
async fn route_check_redirects_to_dashboard() {
    let app = app();
    let token = login_as_hr(&app).await;

    let (_, body) = send(&app, Method::GET, "/api/navigation/route?path=/hrm/employees/new", Some(&token), None).await;
    assert_eq!(body["allowed"], json!(false));
    assert_eq!(body["redirect"], json!("/dashboard"));

    let (_, body) = send(&app, Method::GET, "/api/navigation/route?path=/hrm/leaves", Some(&token), None).await;
    assert_eq!(body["allowed"], json!(true));
}

#[tokio::test]
async fn reconcile_needs_group_edit_rights() {
    let app = app();
    let payload = json!({
        "permissions": { "hrm_employees": { "isActive": false } },
        "module": "hrm_employees",
        "kind": "isCreate",
        "value": true
    });

    let hr = login_as_hr(&app).await;
    let (status, _) = send(&app, Method::POST, "/api/permissions/reconcile", Some(&hr), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = login(&app, json!({ "username": "root", "isAdmin": true }), json!({})).await;
    let (status, body) = send(&app, Method::POST, "/api/permissions/reconcile", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hrm_employees"]["isCreate"], json!(true));
    assert_eq!(body["hrm_employees"]["isActive"], json!(true));
}

#[tokio::test]
async fn salary_flow_over_http() {
    let app = app();
    let token = login_as_hr(&app).await;

    let structure = json!({ "monthlySalary": 0, "basic": 0, "basicPercentage": 50 });
    let (status, structure) = send(
        &app,
        Method::POST,
        "/api/salary/apply",
        Some(&token),
        Some(json!({ "structure": structure, "edit": { "type": "setMonthlySalary", "amount": 10000 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(structure["basic"], json!("5000.00"));

    let (_, balance) = send(&app, Method::POST, "/api/salary/balance", Some(&token), Some(json!({ "structure": structure }))).await;
    assert_eq!(balance["amount"], json!("5000.00"));
    assert_eq!(balance["percentage"], json!("50.00"));

    let (status, body) = send(&app, Method::POST, "/api/salary/validate", Some(&token), Some(structure.clone())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        json!("Total salary (AED 5000.00) does not match monthly salary (AED 10000.00)")
    );

    let (_, structure) = send(
        &app,
        Method::POST,
        "/api/salary/apply",
        Some(&token),
        Some(json!({ "structure": structure, "edit": { "type": "toggleComponent", "key": "house_rent", "visible": true } })),
    )
    .await;
    let (status, body) = send(&app, Method::POST, "/api/salary/validate", Some(&token), Some(structure)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balanced"], json!(true));
}

#[tokio::test]
async fn unknown_component_is_not_found() {
    let app = app();
    let token = login_as_hr(&app).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/salary/apply",
        Some(&token),
        Some(json!({
            "structure": { "monthlySalary": 1000, "basic": 0, "basicPercentage": 0 },
            "edit": { "type": "setComponentAmount", "key": "bonus", "amount": 10 }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_amounts_are_rejected_over_http() {
    let app = app();
    let token = login_as_hr(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/salary/apply",
        Some(&token),
        Some(json!({
            "structure": { "monthlySalary": 0, "basic": 0, "basicPercentage": 50 },
            "edit": { "type": "setMonthlySalary", "amount": "70000000000000000000000000000" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], json!("Amount is too large to calculate with"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/salary/validate",
        Some(&token),
        Some(json!({
            "monthlySalary": 1000,
            "basic": "70000000000000000000000000000",
            "basicPercentage": 50,
            "components": [{
                "key": "other", "label": "Other", "visible": true,
                "amount": "70000000000000000000000000000", "percentage": 0
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn field_check_and_step_validation() {
    let app = app();
    let token = login_as_hr(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/employees/fields/check",
        Some(&token),
        Some(json!({ "rule": { "type": "email" }, "value": "not-an-email", "required": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isValid"], json!(false));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/employees/draft/validate",
        Some(&token),
        Some(json!({ "step": "basic", "draft": { "basic": { "firstName": "Fatima" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["lastName"], json!("This field is required"));
    assert!(body["details"].get("firstName").is_none());
}

#[tokio::test]
async fn submission_needs_create_rights() {
    let app = app();
    let token = login_as_hr(&app).await;

    let (status, body) = send(&app, Method::POST, "/api/employees/submission", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("hrm_employees"));
}

#[tokio::test]
async fn draft_validation_needs_employee_access() {
    let app = app();
    let token = login(&app, json!({ "username": "payroll" }), json!({ "hrm_payroll": { "isActive": true } })).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/employees/draft/validate",
        Some(&token),
        Some(json!({ "step": "basic", "draft": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
