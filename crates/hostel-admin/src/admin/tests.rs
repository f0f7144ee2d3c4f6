use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::admin_router;
use crate::clock::ManualClock;
use crate::hostel::{HostelAdmin, InMemoryHostelRepository};

fn router() -> Router {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
    ));
    let admin = HostelAdmin::with_clock(Arc::new(InMemoryHostelRepository::new()), clock);
    admin_router(Arc::new(admin))
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(payload) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&payload).unwrap())
        }
        None => Body::empty(),
    };
    router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .expect("route executes")
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn index_lists_branding_and_registered_models() {
    let router = router();
    let response = send(&router, Method::GET, "/api/v1/admin", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["site_header"], "Hostel Management System");
    assert_eq!(payload["site_title"], "HMS Admin");
    assert_eq!(payload["index_title"], "Welcome to Hostel Management System");
    let rooms = payload["models"]
        .as_array()
        .expect("models")
        .iter()
        .find(|model| model["path"] == "rooms")
        .expect("rooms registered");
    assert_eq!(rooms["list_per_page"], 20);
}

#[tokio::test]
async fn creating_a_student_exposes_the_placeholder_profile() {
    let router = router();
    let response = send(
        &router,
        Method::POST,
        "/api/v1/admin/users",
        Some(json!({
            "username": "nadia",
            "user_type": "student",
            "first_name": "Nadia",
            "last_name": "Rahman",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = read_json_body(response).await;

    let uri = format!("/api/v1/admin/users/{}/profile", user["id"]);
    let response = send(&router, Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = read_json_body(response).await;
    assert_eq!(profile["student_id"], "TEMP0001");
    assert_eq!(profile["department"], "Not Set");
    assert_eq!(profile["label"], "TEMP0001 - Nadia Rahman");

    let response = send(&router, Method::GET, "/api/v1/admin/students", None).await;
    let changelist = read_json_body(response).await;
    assert_eq!(changelist["results"][0]["label"], "TEMP0001 - Nadia Rahman");
}

#[tokio::test]
async fn room_changelist_filters_and_reports_free_beds() {
    let router = router();
    for (number, has_ac) in [("A-101", true), ("A-102", false)] {
        let response = send(
            &router,
            Method::POST,
            "/api/v1/admin/rooms",
            Some(json!({ "room_number": number, "floor": 1, "capacity": 3, "has_ac": has_ac })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(
        &router,
        Method::GET,
        "/api/v1/admin/rooms?has_ac=true&page=1",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = read_json_body(response).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["per_page"], 20);
    assert_eq!(page["results"][0]["room_number"], "A-101");
    assert_eq!(page["results"][0]["available_beds"], 3);
    assert_eq!(page["results"][0]["is_full"], false);
}

#[tokio::test]
async fn bulk_room_actions_answer_with_a_message() {
    let router = router();
    for number in ["A-101", "A-102"] {
        send(
            &router,
            Method::POST,
            "/api/v1/admin/rooms",
            Some(json!({ "room_number": number, "floor": 1 })),
        )
        .await;
    }

    let response = send(
        &router,
        Method::POST,
        "/api/v1/admin/rooms/actions/make_unavailable",
        Some(json!({ "ids": [1, 2] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = read_json_body(response).await;
    assert_eq!(outcome["affected"], 2);
    assert_eq!(outcome["message"], "2 rooms marked as unavailable.");
}

#[tokio::test]
async fn service_errors_map_to_status_codes() {
    let router = router();
    let response = send(&router, Method::GET, "/api/v1/admin/rooms/42", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "room 42 not found");

    let response = send(
        &router,
        Method::POST,
        "/api/v1/admin/rooms",
        Some(json!({ "room_number": "", "floor": 1, "capacity": 0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    let fields: Vec<_> = payload["fields"]
        .as_array()
        .expect("field errors")
        .iter()
        .map(|error| error["field"].as_str().unwrap_or_default().to_string())
        .collect();
    assert!(fields.contains(&"room_number".to_string()));
    assert!(fields.contains(&"capacity".to_string()));

    send(
        &router,
        Method::POST,
        "/api/v1/admin/rooms",
        Some(json!({ "room_number": "A-101", "floor": 1 })),
    )
    .await;
    let response = send(
        &router,
        Method::POST,
        "/api/v1/admin/rooms",
        Some(json!({ "room_number": "A-101", "floor": 2 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn full_rooms_reject_allocations() {
    let router = router();
    send(
        &router,
        Method::POST,
        "/api/v1/admin/users",
        Some(json!({ "username": "warden", "user_type": "provost", "is_staff": true })),
    )
    .await;
    for name in ["nadia", "arif"] {
        send(
            &router,
            Method::POST,
            "/api/v1/admin/users",
            Some(json!({ "username": name })),
        )
        .await;
    }
    send(
        &router,
        Method::POST,
        "/api/v1/admin/rooms",
        Some(json!({ "room_number": "S-1", "floor": 1, "capacity": 1, "room_type": "single" })),
    )
    .await;

    let response = send(
        &router,
        Method::POST,
        "/api/v1/admin/allocations",
        Some(json!({ "student": 1, "room": 1, "allocated_by": 1 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&router, Method::GET, "/api/v1/admin/allocations", None).await;
    let changelist = read_json_body(response).await;
    assert_eq!(changelist["results"][0]["label"], "TEMP0002 in S-1");

    let response = send(
        &router,
        Method::POST,
        "/api/v1/admin/allocations",
        Some(json!({ "student": 2, "room": 1, "allocated_by": 1 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send(&router, Method::DELETE, "/api/v1/admin/allocations/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&router, Method::GET, "/api/v1/admin/rooms/1", None).await;
    let room = read_json_body(response).await;
    assert_eq!(room["current_occupancy"], 0);
}

#[tokio::test]
async fn complaints_are_reachable_by_ticket() {
    let router = router();
    send(
        &router,
        Method::POST,
        "/api/v1/admin/users",
        Some(json!({ "username": "nadia" })),
    )
    .await;
    let response = send(
        &router,
        Method::POST,
        "/api/v1/admin/complaints",
        Some(json!({
            "student": 1,
            "category": "maintenance",
            "subject": "Broken window",
            "description": "Window latch snapped",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let complaint = read_json_body(response).await;
    assert_eq!(complaint["complaint_id"], "CMP-20250310-0001");

    let response = send(
        &router,
        Method::GET,
        "/api/v1/admin/complaints/by-ticket/CMP-20250310-0001",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let found = read_json_body(response).await;
    assert_eq!(found["subject"], "Broken window");
}

#[tokio::test]
async fn room_inventory_imports_from_csv() {
    let router = router();
    let sheet = "Room Number,Floor,Block\nC-1,3,C\nC-2,3,C\nC-1,3,C\nC-3,upstairs,C\n";
    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/admin/rooms/import")
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from(sheet))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let summary = read_json_body(response).await;
    assert_eq!(summary["created"].as_array().map(Vec::len), Some(2));
    let skipped = summary["skipped"].as_array().expect("skipped rows");
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0]["room_number"], "C-3");
    assert_eq!(skipped[0]["line"], 5);
    assert_eq!(skipped[1]["room_number"], "C-1");
    assert!(skipped[1].get("line").is_none());

    let response = router
        .oneshot(
            Request::post("/api/v1/admin/rooms/import")
                .body(Body::from("Room Number,Floor\nC-9,3,spare column\n"))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
