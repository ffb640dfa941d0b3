use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::SecretString;
use tower::ServiceExt;
use uuid::Uuid;

use oos_identity_server::adapter::handler::{router, AppState};
use oos_identity_server::adapter::repository::in_memory::{
    InMemoryAuditLogRepository, InMemoryPermissionsForRoleRepository,
};
use oos_identity_server::domain::entity::permissions_for_role::PermissionsForRole;
use oos_identity_server::domain::entity::provider::Provider;
use oos_identity_server::domain::entity::Claims;
use oos_identity_server::infrastructure::JwtTokenVerifier;

const SECRET: &str = "integration-secret";
const ISSUER: &str = "oos-identity";
const AUDIENCE: &str = "oos-api";

fn seeded_roles() -> Vec<PermissionsForRole> {
    [
        ("parent", "156789ABCDEFGHIJMTUVXbcfgm"),
        ("provider", "123569MNOPQTXYZabcfghijm"),
        ("providerAdmin", "123569MNTXYZabcfghijm"),
        ("techadmin", "~"),
        ("ministryadmin", "MRSbfgmnopuvwxyz"),
        ("regionadmin", "MRSbfgmnou!#$&()"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (role_name, packed))| PermissionsForRole {
        id: i64::try_from(i).unwrap() + 1,
        role_name: role_name.to_string(),
        packed_permissions: packed.to_string(),
        description: None,
    })
    .collect()
}

fn tracked_properties() -> HashMap<String, Vec<String>> {
    HashMap::from([
        (
            "Provider".to_string(),
            vec!["FullTitle".to_string(), "EdrpouIpn".to_string()],
        ),
        (
            "PermissionsForRole".to_string(),
            vec!["RoleName".to_string(), "PackedPermissions".to_string()],
        ),
    ])
}

fn make_state() -> AppState {
    let audit_log = Arc::new(InMemoryAuditLogRepository::new());
    AppState::new(
        Arc::new(JwtTokenVerifier::new(
            &SecretString::new(SECRET.to_string()),
            ISSUER,
            AUDIENCE,
        )),
        Arc::new(InMemoryPermissionsForRoleRepository::with_records(
            seeded_roles(),
            audit_log.clone(),
        )),
        audit_log.clone(),
        audit_log,
        tracked_properties(),
    )
}

fn token_for(sub: &str, role: &str, is_derived: bool) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        role: role.to_string(),
        permissions: String::new(),
        is_derived,
        iss: ISSUER.to_string(),
        aud: AUDIENCE.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn request(method: &str, uri: &str, token: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_healthz_is_public() {
    let app = router(make_state());
    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_techadmin_lists_seeded_roles() {
    let app = router(make_state());
    let token = token_for("admin-1", "techadmin", false);

    let resp = app
        .oneshot(request("GET", "/api/v1/permissions-for-role", &token, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    let roles = json.as_array().unwrap();
    assert_eq!(roles.len(), 6);
    let techadmin = roles
        .iter()
        .find(|r| r["role_name"] == "techadmin")
        .unwrap();
    assert_eq!(techadmin["permissions"], serde_json::json!(["AccessAll"]));
}

#[tokio::test]
async fn test_parent_cannot_manage_permissions() {
    let app = router(make_state());
    let token = token_for("parent-1", "parent", false);

    let resp = app
        .oneshot(request("GET", "/api/v1/permissions", &token, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_role_gets_no_permissions() {
    let app = router(make_state());
    let token = token_for("ghost-1", "ghost", false);

    let resp = app
        .oneshot(request("GET", "/api/v1/changes-log?entity_type=Provider", &token, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_regionadmin_reads_changes_log() {
    let state = make_state();
    let provider = Provider {
        id: Uuid::new_v4(),
        full_title: "Sunny Kids".to_string(),
        edrpou_ipn: "12345678".to_string(),
        director: None,
        legal_address: None,
        email: "info@sunny.example.com".to_string(),
    };
    let mut renamed = provider.clone();
    renamed.full_title = "Sunny Kids Club".to_string();

    let recorded = state
        .record_entity_changes_uc
        .execute_for(Some(&provider), Some(&renamed), "provider-owner")
        .await
        .unwrap();
    assert_eq!(recorded, 1);

    let app = router(state);
    let token = token_for("region-1", "regionadmin", false);
    let resp = app
        .oneshot(request(
            "GET",
            "/api/v1/changes-log?entity_type=Provider&search_string=club",
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["total_amount"], 1);
    assert_eq!(json["entities"][0]["property_name"], "FullTitle");
    assert_eq!(json["entities"][0]["old_value"], "Sunny Kids");
    assert_eq!(json["entities"][0]["new_value"], "Sunny Kids Club");
    assert_eq!(json["entities"][0]["user_id"], "provider-owner");
}

#[tokio::test]
async fn test_role_updates_are_audited() {
    let state = make_state();
    let token = token_for("admin-1", "techadmin", false);

    let resp = router(state.clone())
        .oneshot(request(
            "PUT",
            "/api/v1/permissions-for-role",
            &token,
            Some(r#"{"id":1,"role_name":"parent","permissions":["ChildRead"]}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router(state)
        .oneshot(request(
            "GET",
            "/api/v1/changes-log?entity_type=PermissionsForRole&entity_id=1",
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["total_amount"], 1);
    let entry = &json["entities"][0];
    assert_eq!(entry["property_name"], "PackedPermissions");
    assert_eq!(entry["old_value"], "156789ABCDEFGHIJMTUVXbcfgm");
    assert_eq!(entry["new_value"], "9");
    assert_eq!(entry["user_id"], "admin-1");
    assert_eq!(entry["entity_id"], 1);
}

#[tokio::test]
async fn test_create_duplicate_role_conflicts() {
    let app = router(make_state());
    let token = token_for("admin-1", "techadmin", false);

    let resp = app
        .oneshot(request(
            "POST",
            "/api/v1/permissions-for-role",
            &token,
            Some(r#"{"role_name":"parent","permissions":[]}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let json = json_body(resp).await;
    assert_eq!(json["error"]["code"], "SYS_IDENTITY_CONFLICT");
}

#[tokio::test]
async fn test_changes_log_rejects_oversized_page() {
    let app = router(make_state());
    let token = token_for("admin-1", "techadmin", false);

    let resp = app
        .oneshot(request(
            "GET",
            "/api/v1/changes-log?entity_type=Provider&size=1000",
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_role_updates_appear_in_operation_log() {
    let state = make_state();
    let token = token_for("admin-1", "techadmin", false);

    let resp = router(state.clone())
        .oneshot(request(
            "POST",
            "/api/v1/permissions-for-role",
            &token,
            Some(r#"{"role_name":"moderator","permissions":["ChildRead"]}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = router(state.clone())
        .oneshot(request(
            "PUT",
            "/api/v1/permissions-for-role",
            &token,
            Some(r#"{"id":2,"role_name":"provider","permissions":["ProviderRead"]}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router(state)
        .oneshot(request(
            "GET",
            "/api/v1/changes-log/operations?entity_type=PermissionsForRole&operation_type=Update",
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["total_amount"], 1);
    let entry = &json["entities"][0];
    assert_eq!(entry["operation_type"], "Update");
    assert_eq!(entry["entity_id"], 2);
    assert_eq!(entry["user_id"], "admin-1");
}

#[tokio::test]
async fn test_role_update_is_rolled_back_when_audit_fails() {
    let state = make_state();
    // user_id 列の上限（128 文字）を超えるため監査行を保存できない
    let oversized_sub = "a".repeat(129);
    let token = token_for(&oversized_sub, "techadmin", false);

    let resp = router(state.clone())
        .oneshot(request(
            "PUT",
            "/api/v1/permissions-for-role",
            &token,
            Some(r#"{"id":1,"role_name":"parent","permissions":["ChildRead"]}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let reader = token_for("admin-1", "techadmin", false);
    let resp = router(state.clone())
        .oneshot(request(
            "GET",
            "/api/v1/permissions-for-role/parent",
            &reader,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_body(resp).await;
    assert_eq!(json["id"], 1);
    assert_ne!(json["permissions"], serde_json::json!(["ChildRead"]));

    let resp = router(state)
        .oneshot(request(
            "GET",
            "/api/v1/changes-log?entity_type=PermissionsForRole",
            &reader,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
