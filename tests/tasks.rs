mod common;

use actix_web::test;
use serde_json::{json, Value};
use taskboard::models::{Task, TaskPriority, TaskStatus};

use common::{bearer, call_json, init_app, memory_state, signup};

#[actix_rt::test]
async fn test_task_crud_flow() {
    let app = init_app(memory_state()).await;
    let ada = signup(&app, "Ada", "ada@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&ada.token))
        .set_json(json!({
            "title": "Write release notes",
            "description": "Cover the new dashboard",
            "priority": TaskPriority::High,
            "dueDate": "2030-01-15T09:00:00Z",
            "userId": 999
        }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 201, "create failed: {}", body);
    let created: Task = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(created.title, "Write release notes");
    assert_eq!(created.status, TaskStatus::Todo);
    assert_eq!(created.priority, Some(TaskPriority::High));
    assert_eq!(created.user_id, ada.id, "owner comes from the session, not the body");

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&ada.token))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], created.id.to_string());

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&ada.token))
        .set_json(json!({
            "title": "Write and publish release notes",
            "status": TaskStatus::InProgress,
            "priority": TaskPriority::Urgent
        }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200, "update failed: {}", body);
    let updated: Task = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.description, None);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&ada.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&ada.token))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Task not found");
}

#[actix_rt::test]
async fn test_tasks_are_owner_scoped() {
    let app = init_app(memory_state()).await;
    let ada = signup(&app, "Ada", "ada@example.com").await;
    let bob = signup(&app, "Bob", "bob@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&ada.token))
        .set_json(json!({ "title": "Ada's private task" }))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    let task_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(bearer(&bob.token))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["results"], 0);

    let uri = format!("/api/tasks/{}", task_id);
    let attempts = [
        test::TestRequest::get().uri(&uri),
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "title": "Hijacked" })),
        test::TestRequest::delete().uri(&uri),
    ];
    for attempt in attempts {
        let req = attempt.insert_header(bearer(&bob.token)).to_request();
        let (status, _) = call_json(&app, req).await;
        assert_eq!(status, 404);
    }

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&ada.token))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "Ada's private task");
}

#[actix_rt::test]
async fn test_list_filters() {
    let app = init_app(memory_state()).await;
    let ada = signup(&app, "Ada", "ada@example.com").await;

    let tasks = [
        json!({ "title": "Fix login bug", "priority": "high", "status": "in_progress" }),
        json!({ "title": "Plan sprint", "description": "Include the login rework", "priority": "low" }),
        json!({ "title": "Ship it", "priority": "high", "status": "done" }),
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

    let titles = |body: &Value| -> Vec<String> {
        let mut titles: Vec<String> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap().to_string())
            .collect();
        titles.sort();
        titles
    };

    let cases = [
        ("", vec!["Fix login bug", "Plan sprint", "Ship it"]),
        ("?priority=high", vec!["Fix login bug", "Ship it"]),
        ("?status=done", vec!["Ship it"]),
        ("?search=LOGIN", vec!["Fix login bug", "Plan sprint"]),
        ("?priority=high&search=login", vec!["Fix login bug"]),
    ];
    for (query, expected) in cases {
        let req = test::TestRequest::get()
            .uri(&format!("/api/tasks{}", query))
            .insert_header(bearer(&ada.token))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 200);
        assert_eq!(titles(&body), expected, "query {:?}", query);
        assert_eq!(body["results"], expected.len());
    }

    let req = test::TestRequest::get()
        .uri("/api/tasks?status=someday")
        .insert_header(bearer(&ada.token))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "fail");
}

#[actix_rt::test]
async fn test_task_validation_and_auth() {
    let app = init_app(memory_state()).await;
    let ada = signup(&app, "Ada", "ada@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(json!({ "title": "No session" }))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 401);

    for payload in [
        json!({ "title": "" }),
        json!({ "title": "a".repeat(201) }),
        json!({ "title": "Fine", "description": "b".repeat(1001) }),
        json!({ "title": "Fine", "priority": "critical" }),
        json!({ "description": "no title" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .insert_header(bearer(&ada.token))
            .set_json(&payload)
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 400, "payload {} should be rejected", payload);
        assert_eq!(body["status"], "fail");
    }

    let req = test::TestRequest::get()
        .uri("/api/tasks/not-a-uuid")
        .insert_header(bearer(&ada.token))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_task_text_is_sanitized() {
    let app = init_app(memory_state()).await;
    let ada = signup(&app, "Ada", "ada@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&ada.token))
        .set_json(json!({
            "title": "<script>alert('x')</script>",
            "$where": "this.user_id != 0"
        }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 201);
    assert_eq!(
        body["data"]["title"],
        "&lt;script&gt;alert('x')&lt;/script&gt;"
    );
}
