/// Task, board and dashboard endpoints

mod common;

use axum::http::StatusCode;
use common::{due_in, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_create_task_defaults() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;

    let response = ctx.post("/tasks", Some(&cookie), json!({ "title": "  Write report  " })).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["title"], "Write report");
    assert_eq!(response.body["status"], "pending");
    assert_eq!(response.body["priority"], "medium");
    assert!(response.body.get("dueDate").is_none());

    let profile = ctx.get("/settings/profile", Some(&cookie)).await;
    assert_eq!(response.body["assignedTo"], profile.body["id"]);
}

#[tokio::test]
async fn test_create_task_validation_errors() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;

    let response = ctx
        .post(
            "/tasks",
            Some(&cookie),
            json!({ "title": "", "priority": "urgent", "dueDate": "2000-01-01" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "validation_error");

    let fields: Vec<&str> = response.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"priority"));
    assert!(fields.contains(&"dueDate"));

    // Nothing was written
    let list = ctx.get("/tasks", Some(&cookie)).await;
    assert_eq!(list.body, json!([]));
}

#[tokio::test]
async fn test_due_date_today_accepted() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;

    let response = ctx
        .post("/tasks", Some(&cookie), json!({ "title": "Today", "dueDate": due_in(0) }))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["dueDate"], due_in(0));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;

    let request = common::request(axum::http::Method::POST, "/tasks", Some(&cookie), None);
    let response = ctx.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_newest_first() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;

    ctx.create_task(&cookie, json!({ "title": "First" })).await;
    ctx.create_task(&cookie, json!({ "title": "Second" })).await;
    ctx.create_task(&cookie, json!({ "title": "Third" })).await;

    let response = ctx.get("/tasks", Some(&cookie)).await;
    let titles: Vec<&str> = response.body.as_array().unwrap().iter().map(|t| t["title"].as_str().unwrap()).collect();

    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_update_task() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;
    let id = ctx.create_task(&cookie, json!({ "title": "Draft" })).await;

    let response = ctx
        .put(
            &format!("/tasks/{}", id),
            Some(&cookie),
            json!({
                "title": "Final",
                "description": "Ship it",
                "status": "completed",
                "priority": "high",
                "dueDate": due_in(3),
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "Final");
    assert_eq!(response.body["status"], "completed");
    assert_eq!(response.body["priority"], "high");
    assert_eq!(response.body["dueDate"], due_in(3));

    let fetched = ctx.get(&format!("/tasks/{}", id), Some(&cookie)).await;
    assert_eq!(fetched.body, response.body);
}

#[tokio::test]
async fn test_foreign_task_is_not_found() {
    let ctx = TestContext::new();
    let ada = ctx.signed_in("Ada", "ada@example.com").await;
    let eve = ctx.signed_in("Eve", "eve@example.com").await;
    let id = ctx.create_task(&ada, json!({ "title": "Private" })).await;
    let uri = format!("/tasks/{}", id);

    let missing = ctx.get(&format!("/tasks/{}", uuid::Uuid::new_v4()), Some(&eve)).await;
    let foreign = ctx.get(&uri, Some(&eve)).await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    assert_eq!(foreign.body, missing.body);

    let update = ctx.put(&uri, Some(&eve), json!({ "title": "Mine now" })).await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let moved = ctx.patch(&format!("{}/status", uri), Some(&eve), json!({ "status": "completed" })).await;
    assert_eq!(moved.status, StatusCode::NOT_FOUND);

    let delete = ctx.delete(&uri, Some(&eve)).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    let still_there = ctx.get(&uri, Some(&ada)).await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(still_there.body["title"], "Private");
    assert_eq!(still_there.body["status"], "pending");

    let eve_list = ctx.get("/tasks", Some(&eve)).await;
    assert_eq!(eve_list.body, json!([]));
}

#[tokio::test]
async fn test_malformed_task_id_is_not_found() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;

    let response = ctx.get("/tasks/not-an-id", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Task not found");

    let response = ctx.delete("/tasks/12345", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_task() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;
    let id = ctx.create_task(&cookie, json!({ "title": "Temporary" })).await;
    let uri = format!("/tasks/{}", id);

    let response = ctx.delete(&uri, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true }));

    assert_eq!(ctx.get(&uri, Some(&cookie)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.delete(&uri, Some(&cookie)).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_move_status_and_board() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;
    let id = ctx.create_task(&cookie, json!({ "title": "Drag me", "priority": "low" })).await;
    ctx.create_task(&cookie, json!({ "title": "Stay" })).await;

    let response = ctx
        .patch(&format!("/tasks/{}/status", id), Some(&cookie), json!({ "status": "in-progress" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "in-progress");
    assert_eq!(response.body["priority"], "low");

    let board = ctx.get("/tasks/board", Some(&cookie)).await;
    assert_eq!(board.status, StatusCode::OK);

    let columns = board.body["columns"].as_array().unwrap();
    let statuses: Vec<&str> = columns.iter().map(|c| c["status"].as_str().unwrap()).collect();
    assert_eq!(statuses, vec!["pending", "in-progress", "completed"]);

    assert_eq!(columns[0]["tasks"][0]["title"], "Stay");
    assert_eq!(columns[1]["tasks"][0]["title"], "Drag me");
    assert_eq!(columns[2]["tasks"], json!([]));
}

#[tokio::test]
async fn test_move_status_requires_valid_status() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;
    let id = ctx.create_task(&cookie, json!({ "title": "Task" })).await;
    let uri = format!("/tasks/{}/status", id);

    let missing = ctx.patch(&uri, Some(&cookie), json!({})).await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(missing.body["details"][0]["field"], "status");

    let unknown = ctx.patch(&uri, Some(&cookie), json!({ "status": "done" })).await;
    assert_eq!(unknown.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(unknown.body["details"][0]["field"], "status");
}

#[tokio::test]
async fn test_dashboard_stats() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;

    let empty = ctx.get("/dashboard", Some(&cookie)).await;
    assert_eq!(
        empty.body["stats"],
        json!({ "total": 0, "completed": 0, "pending": 0, "inProgress": 0, "completionRate": 0 })
    );

    ctx.create_task(&cookie, json!({ "title": "One" })).await;
    ctx.create_task(&cookie, json!({ "title": "Two" })).await;
    ctx.create_task(&cookie, json!({ "title": "Three", "status": "in-progress" })).await;
    ctx.create_task(&cookie, json!({ "title": "Four", "status": "completed" })).await;

    let other = ctx.signed_in("Eve", "eve@example.com").await;
    ctx.create_task(&other, json!({ "title": "Not counted", "status": "completed" })).await;

    let response = ctx.get("/dashboard", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["stats"],
        json!({ "total": 4, "completed": 1, "pending": 2, "inProgress": 1, "completionRate": 25 })
    );
    assert_eq!(response.body["recentTasks"][0]["title"], "Four");
    assert_eq!(response.body["recentTasks"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_dashboard_recent_tasks_capped() {
    let ctx = TestContext::new();
    let cookie = ctx.signed_in("Ada", "ada@example.com").await;

    for i in 0..7 {
        ctx.create_task(&cookie, json!({ "title": format!("Task {}", i) })).await;
    }

    let response = ctx.get("/dashboard", Some(&cookie)).await;

    assert_eq!(response.body["stats"]["total"], 7);
    assert_eq!(
        response.body["recentTasks"].as_array().unwrap().len(),
        taskboard_api::routes::dashboard::RECENT_TASKS
    );
}
