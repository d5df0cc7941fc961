mod common;

use actix_web::{http::header, test};
use chrono::{Duration, SecondsFormat, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{bearer, call_json, config_with, init_app, memory_state, signup};
use taskboard::AppState;

#[actix_rt::test]
async fn test_unknown_routes_return_plain_not_found() {
    let state = memory_state();
    let app = init_app(state.clone()).await;
    let ada = signup(&app, "Ada", "ada@example.com").await;

    for uri in ["/nope", "/api/nope", "/api/v2/tasks"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 404, "{}", uri);
        assert_eq!(body, json!({ "message": "Not Found" }));
    }

    // unmatched path under an authenticated scope
    let req = test::TestRequest::get()
        .uri("/api/users/me/elsewhere")
        .insert_header(bearer(&ada.token))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "message": "Not Found" }));
}

#[actix_rt::test]
async fn test_health_is_public() {
    let app = init_app(memory_state()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn test_security_headers() {
    let app = init_app(memory_state()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    let headers = resp.headers();
    assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert_eq!(headers.get(header::REFERRER_POLICY).unwrap(), "no-referrer");
    assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_none());

    let production = AppState::in_memory(config_with(&[("APP_ENV", "production")]));
    let app = init_app(production).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp
        .headers()
        .get(header::STRICT_TRANSPORT_SECURITY)
        .is_some());
}

#[actix_rt::test]
async fn test_malformed_json_is_a_client_error() {
    let app = init_app(memory_state()).await;

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ not json")
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());
}

#[actix_rt::test]
async fn test_oversized_body_is_rejected() {
    let app = init_app(memory_state()).await;
    let ada = signup(&app, "Ada", "ada@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&ada.token))
        .set_json(json!({ "title": "Big", "description": "x".repeat(20 * 1024) }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Request body exceeds 10240 bytes");
}

#[actix_rt::test]
async fn test_dashboard_summary() {
    let app = init_app(memory_state()).await;
    let ada = signup(&app, "Ada", "ada@example.com").await;
    let bob = signup(&app, "Bob", "bob@example.com").await;

    let due = |days: i64| {
        (Utc::now() + Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
    };
    let tasks = [
        json!({ "title": "Overdue", "dueDate": due(-2) }),
        json!({ "title": "Soon", "dueDate": due(3), "status": "in_progress" }),
        json!({ "title": "Later", "dueDate": due(30) }),
        json!({ "title": "Finished late", "dueDate": due(-5), "status": "done" }),
    ];
    for task in &tasks {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .insert_header(bearer(&ada.token))
            .set_json(task)
            .to_request();
        let (status, _) = call_json(&app, req).await;
        assert_eq!(status, 201);
    }

    let req = test::TestRequest::get()
        .uri("/api/dashboard")
        .insert_header(bearer(&ada.token))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);

    let data = &body["data"];
    assert_eq!(data["total"], 4);
    assert_eq!(data["overdue"], 1);
    assert_eq!(data["dueSoon"], 1);
    assert_eq!(data["completionRate"], 25);
    assert_eq!(data["recent"].as_array().unwrap().len(), 4);
    assert_eq!(data["recent"][0]["title"], "Finished late");

    // someone else's dashboard is empty
    let req = test::TestRequest::get()
        .uri("/api/dashboard")
        .insert_header(bearer(&bob.token))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["completionRate"], 0);

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_settings_defaults_and_updates() {
    let app = init_app(memory_state()).await;
    let ada = signup(&app, "Ada", "ada@example.com").await;

    let req = test::TestRequest::get()
        .uri("/api/settings")
        .insert_header(bearer(&ada.token))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["theme"], "system");
    assert_eq!(body["data"]["language"], "en");
    assert_eq!(body["data"]["emailNotifications"], true);

    let req = test::TestRequest::patch()
        .uri("/api/settings")
        .insert_header(bearer(&ada.token))
        .set_json(json!({ "theme": "dark", "language": "pt-BR", "userId": 42 }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["theme"], "dark");
    assert_eq!(body["data"]["userId"], ada.id);

    let req = test::TestRequest::patch()
        .uri("/api/settings")
        .insert_header(bearer(&ada.token))
        .set_json(json!({ "emailNotifications": false }))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["data"]["theme"], "dark", "earlier changes are kept");
    assert_eq!(body["data"]["language"], "pt-BR");
    assert_eq!(body["data"]["emailNotifications"], false);

    for payload in [json!({ "language": "portuguese" }), json!({ "theme": "neon" })] {
        let req = test::TestRequest::patch()
            .uri("/api/settings")
            .insert_header(bearer(&ada.token))
            .set_json(&payload)
            .to_request();
        let (status, _) = call_json(&app, req).await;
        assert_eq!(status, 400, "payload {} should be rejected", payload);
    }
}
