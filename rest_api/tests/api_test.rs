// rest_api/tests/api_test.rs
//
// End-to-end checks through the full middleware stack: token issuance,
// the access gate, conflict validation, and the audit trail.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use models::{NewUser, Role, User};
use rest_api::{app, AppState};
use security::{password, TokenIssuer};
use storage::ClinicStore;

struct Harness {
    _dir: tempfile::TempDir,
    state: AppState,
    admin_token: String,
    nurse_token: String,
}

fn seed_user(store: &ClinicStore, national_id: &str, role: Role) -> User {
    let hash = password::hash_password("supersecret").unwrap();
    let user = User::from_new_user(
        NewUser {
            first_name: "Test".into(),
            last_name: match role {
                Role::Administrator => "Admin".into(),
                Role::Doctor => "Doctor".into(),
                Role::Nurse => "Nurse".into(),
            },
            national_id: national_id.into(),
            password: String::new(),
            role,
        },
        hash,
    );
    store.create_user(user).unwrap()
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ClinicStore::open(dir.path()).unwrap());
    let issuer = TokenIssuer::with_default_ttl(b"0123456789abcdef0123456789abcdef");

    let admin = seed_user(&store, "11111111", Role::Administrator);
    let nurse = seed_user(&store, "22222222", Role::Nurse);

    let admin_token = issuer.issue(admin.id, admin.role).unwrap();
    let nurse_token = issuer.issue(nurse.id, nurse.role).unwrap();

    Harness {
        _dir: dir,
        state: AppState::new(store, issuer),
        admin_token,
        nurse_token,
    }
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
    let response = app(state.clone()).oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn patient_payload(national_id: &str) -> Value {
    json!({
        "first_name": "Maria",
        "last_name": "Lopez",
        "national_id": national_id,
        "birth_date": "1990-03-14",
        "sex": "F",
        "address": "Av. Siempreviva 742",
        "phone": "555-0101",
    })
}

/// Waits for the fire-and-forget audit write to land.
async fn await_audit_count(state: &AppState, at_least: usize) -> Vec<models::AuditEntry> {
    for _ in 0..100 {
        let entries: Vec<_> = state
            .store
            .audit_entries_desc()
            .collect::<Result<_, _>>()
            .unwrap();
        if entries.len() >= at_least {
            return entries;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    panic!("audit entries never reached {}", at_least);
}

#[tokio::test]
async fn nurse_may_create_but_not_delete_patients() {
    let h = harness();

    let (status, body) = send(
        &h.state,
        request(
            Method::POST,
            "/api/v1/patients",
            Some(&h.nurse_token),
            Some(patient_payload("28999111")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let patient_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &h.state,
        request(
            Method::DELETE,
            &format!("/api/v1/patients/{}", patient_id),
            Some(&h.nurse_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["reason"], "role_not_allowed");

    let (status, _) = send(
        &h.state,
        request(
            Method::DELETE,
            &format!("/api/v1/patients/{}", patient_id),
            Some(&h.admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_wrong_password_then_issues_token() {
    let h = harness();

    for _ in 0..2 {
        let (status, body) = send(
            &h.state,
            request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "national_id": "22222222", "password": "wrong" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["reason"], "invalid_credentials");
        assert!(body.get("token").is_none());
    }

    let (status, body) = send(
        &h.state,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "national_id": "22222222", "password": "supersecret" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &h.state,
        request(Method::GET, "/api/v1/patients", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn requests_without_valid_token_are_rejected() {
    let h = harness();

    let (status, body) = send(
        &h.state,
        request(Method::GET, "/api/v1/patients", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], "invalid_or_expired_token");

    let expired =
        TokenIssuer::new(b"0123456789abcdef0123456789abcdef", Duration::seconds(-120));
    let token = expired.issue(Uuid::new_v4(), Role::Nurse).unwrap();
    let (status, _) = send(
        &h.state,
        request(Method::GET, "/api/v1/patients", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn double_booking_a_doctor_slot_returns_conflict() {
    let h = harness();
    let doctor_id = Uuid::new_v4();
    let date = (Utc::now() + Duration::days(7)).date_naive().to_string();

    let first = json!({
        "date": date,
        "time": "10:00:00",
        "patient_id": Uuid::new_v4(),
        "doctor_id": doctor_id,
    });
    let (status, _) = send(
        &h.state,
        request(
            Method::POST,
            "/api/v1/appointments",
            Some(&h.nurse_token),
            Some(first),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let second = json!({
        "date": date,
        "time": "10:00:00",
        "patient_id": Uuid::new_v4(),
        "doctor_id": doctor_id,
    });
    let (status, body) = send(
        &h.state,
        request(
            Method::POST,
            "/api/v1/appointments",
            Some(&h.nurse_token),
            Some(second),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["reason"], "doctor_slot_conflict");
}

#[tokio::test]
async fn successful_mutation_writes_exactly_one_audit_entry() {
    let h = harness();

    let (status, _) = send(
        &h.state,
        request(
            Method::POST,
            "/api/v1/patients",
            Some(&h.nurse_token),
            Some(patient_payload("27111222")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let entries = await_audit_count(&h.state, 1).await;
    assert_eq!(entries.len(), 1);
    assert!(entries[0].succeeded);
    assert!(!entries[0].description.is_empty());
    assert_eq!(entries[0].entity, models::AuditEntity::Patient);

    // The trail endpoint is administrator-only.
    let (status, _) = send(
        &h.state,
        request(Method::GET, "/api/v1/audit", Some(&h.nurse_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &h.state,
        request(Method::GET, "/api/v1/audit", Some(&h.admin_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn occupied_room_needs_force_and_leaves_two_trail_entries() {
    let h = harness();
    let room_id = Uuid::new_v4();

    let holder = h
        .state
        .store
        .create_doctor(models::Doctor::from_new(models::NewDoctor {
            user_id: Uuid::new_v4(),
            specialty_id: Uuid::new_v4(),
            room_id: Some(room_id),
        }))
        .unwrap();
    let newcomer = h
        .state
        .store
        .create_doctor(models::Doctor::from_new(models::NewDoctor {
            user_id: Uuid::new_v4(),
            specialty_id: Uuid::new_v4(),
            room_id: None,
        }))
        .unwrap();

    let uri = format!("/api/v1/doctors/{}/room", newcomer.id);
    let (status, body) = send(
        &h.state,
        request(
            Method::PUT,
            &uri,
            Some(&h.admin_token),
            Some(json!({ "room_id": room_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["reason"], "room_occupied");
    assert_eq!(body["occupant"], holder.id.to_string());

    let (status, _) = send(
        &h.state,
        request(
            Method::PUT,
            &uri,
            Some(&h.admin_token),
            Some(json!({ "room_id": room_id, "force": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entries = await_audit_count(&h.state, 2).await;
    assert_eq!(entries.len(), 2);
    let refused = entries.iter().find(|e| !e.succeeded).unwrap();
    assert_eq!(refused.action, models::AuditAction::Update);
    let forced = entries.iter().find(|e| e.succeeded).unwrap();
    assert_eq!(forced.action, models::AuditAction::ForcedAssign);
}

#[tokio::test]
async fn plain_doctor_update_cannot_take_an_occupied_room() {
    let h = harness();
    let room_id = Uuid::new_v4();

    let holder = h
        .state
        .store
        .create_doctor(models::Doctor::from_new(models::NewDoctor {
            user_id: Uuid::new_v4(),
            specialty_id: Uuid::new_v4(),
            room_id: Some(room_id),
        }))
        .unwrap();
    let newcomer = h
        .state
        .store
        .create_doctor(models::Doctor::from_new(models::NewDoctor {
            user_id: Uuid::new_v4(),
            specialty_id: Uuid::new_v4(),
            room_id: None,
        }))
        .unwrap();

    let (status, body) = send(
        &h.state,
        request(
            Method::PUT,
            &format!("/api/v1/doctors/{}", newcomer.id),
            Some(&h.admin_token),
            Some(json!({ "room_id": room_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["reason"], "room_occupied");
    assert_eq!(body["occupant"], holder.id.to_string());

    // The refused attempt lands in the trail as a failure.
    let entries = await_audit_count(&h.state, 1).await;
    assert!(!entries[0].succeeded);
    assert_eq!(entries[0].entity, models::AuditEntity::Doctor);
}

#[tokio::test]
async fn past_scheduling_is_rejected_unprocessable() {
    let h = harness();
    let payload = json!({
        "date": (Utc::now() - Duration::days(1)).date_naive().to_string(),
        "time": "10:00:00",
        "patient_id": Uuid::new_v4(),
        "doctor_id": Uuid::new_v4(),
    });
    let (status, body) = send(
        &h.state,
        request(
            Method::POST,
            "/api/v1/appointments",
            Some(&h.nurse_token),
            Some(payload),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["reason"], "past_scheduling");
}
