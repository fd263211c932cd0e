mod common;

use std::collections::HashSet;
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use tokio::task::JoinSet;

use arranger::store::Store;
use arranger::types::AvailabilityLevel;
use common::TestApp;

const NAME: &str = "テスト予定1";
const MEMO: &str = "テストメモ1\r\nテストメモ2";
const CANDIDATES: &str = "テスト候補1\r\nテスト候補2\r\nテスト候補3";

#[tokio::test]
async fn test_health() {
    let app = TestApp::anonymous();

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "OK");
}

#[tokio::test]
async fn test_login_page_links_to_identity_provider() {
    let app = TestApp::anonymous();

    let response = app.get("/login").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type(), "text/html; charset=utf-8");
    assert!(response.body.contains(r#"<a href="/auth/github""#));
}

#[tokio::test]
async fn test_login_page_shows_signed_in_username() {
    let app = TestApp::logged_in(0, "testuser");

    let response = app.get("/login").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("testuser"));
}

#[tokio::test]
async fn test_logout_redirects_to_root() {
    let app = TestApp::logged_in(0, "testuser");

    let response = app.get("/logout").await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), "/");
}

#[tokio::test]
async fn test_create_and_show_schedule() {
    let app = TestApp::logged_in(0, "testuser");

    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let response = app.get(&format!("/schedules/{id}")).await;

    assert_eq!(response.status, StatusCode::OK);
    for expected in [
        NAME,
        "テストメモ1",
        "テストメモ2",
        "テスト候補1",
        "テスト候補2",
        "テスト候補3",
    ] {
        assert!(response.body.contains(expected), "missing {expected}");
    }

    let candidates = app.store.list_candidates(&id).unwrap();
    let names: Vec<&str> = candidates.iter().map(|c| c.candidate_name.as_str()).collect();
    assert_eq!(names, ["テスト候補1", "テスト候補2", "テスト候補3"]);
}

#[tokio::test]
async fn test_create_schedule_from_urlencoded_form() {
    let app = TestApp::logged_in(0, "testuser");

    let response = app
        .post_form(
            "/schedules",
            "scheduleName=Lunch&memo=&candidates=Mon%0D%0ATue",
        )
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    let id = response.location().trim_start_matches("/schedules/");
    assert_eq!(app.store.list_candidates(id).unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_schedule_with_blank_name_is_rejected() {
    let app = TestApp::logged_in(0, "testuser");

    let response = app
        .post_json(
            "/schedules",
            json!({ "scheduleName": "   ", "memo": "", "candidates": "a" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains(r#""status":"NG""#));
    assert!(app.store.list_schedules_by_creator(0).unwrap().is_empty());
}

#[tokio::test]
async fn test_index_lists_own_schedules() {
    let app = TestApp::logged_in(0, "testuser");
    app.create_schedule(NAME, MEMO, CANDIDATES).await;

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(NAME));
}

#[tokio::test]
async fn test_anonymous_create_redirects_to_login() {
    let app = TestApp::anonymous();

    let response = app
        .post_json(
            "/schedules",
            json!({ "scheduleName": NAME, "memo": MEMO, "candidates": CANDIDATES }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), "/login?from=%2Fschedules");
}

#[tokio::test]
async fn test_show_missing_schedule_is_not_found() {
    let app = TestApp::logged_in(0, "testuser");

    let response = app.get("/schedules/does-not-exist").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_availability() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let candidate_id = app.first_candidate_id(&id);

    let response = app
        .post_json(
            &format!("/schedules/{id}/users/0/candidates/{candidate_id}"),
            json!({ "availability": 2 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, r#"{"status":"OK","availability":2}"#);

    let availabilities = app.store.list_availabilities(&id).unwrap();
    assert_eq!(availabilities.len(), 1);
    assert_eq!(availabilities[0].availability, AvailabilityLevel::Attending);
}

#[tokio::test]
async fn test_update_availability_overwrites_cell() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let candidate_id = app.first_candidate_id(&id);
    let uri = format!("/schedules/{id}/users/0/candidates/{candidate_id}");

    app.post_json(&uri, json!({ "availability": 2 })).await;
    let response = app.post_json(&uri, json!({ "availability": 1 })).await;

    assert_eq!(response.body, r#"{"status":"OK","availability":1}"#);
    let availabilities = app.store.list_availabilities(&id).unwrap();
    assert_eq!(availabilities.len(), 1);
    assert_eq!(availabilities[0].availability, AvailabilityLevel::Undecided);
}

#[tokio::test]
async fn test_update_availability_out_of_range_is_rejected() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let candidate_id = app.first_candidate_id(&id);

    let response = app
        .post_json(
            &format!("/schedules/{id}/users/0/candidates/{candidate_id}"),
            json!({ "availability": 3 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.store.list_availabilities(&id).unwrap().is_empty());
}

#[tokio::test]
async fn test_update_availability_for_other_schedules_candidate_is_not_found() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let other_id = app.create_schedule("other", "", "x").await;
    let foreign_candidate = app.first_candidate_id(&other_id);

    let response = app
        .post_json(
            &format!("/schedules/{id}/users/0/candidates/{foreign_candidate}"),
            json!({ "availability": 2 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.store.list_availabilities(&id).unwrap().is_empty());
    assert!(app.store.list_availabilities(&other_id).unwrap().is_empty());
}

#[tokio::test]
async fn test_update_comment() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;

    let response = app
        .post_json(
            &format!("/schedules/{id}/users/0/comments"),
            json!({ "comment": "testcomment" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, r#"{"status":"OK","comment":"testcomment"}"#);

    let comments = app.store.list_comments(&id).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment, "testcomment");
}

#[tokio::test]
async fn test_edit_schedule_appends_candidates() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;

    let response = app
        .post_json(
            &format!("/schedules/{id}?edit=1"),
            json!({
                "scheduleName": "テスト更新予定2",
                "memo": "テスト更新メモ2",
                "candidates": "テスト候補1\r\nテスト更新候補1",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), format!("/schedules/{id}"));

    let schedule = app.store.get_schedule(&id).unwrap().unwrap();
    assert_eq!(schedule.schedule_name, "テスト更新予定2");
    assert_eq!(schedule.memo, "テスト更新メモ2");

    let candidates = app.store.list_candidates(&id).unwrap();
    let names: Vec<&str> = candidates.iter().map(|c| c.candidate_name.as_str()).collect();
    assert_eq!(
        names,
        ["テスト候補1", "テスト候補2", "テスト候補3", "テスト更新候補1"]
    );
}

#[tokio::test]
async fn test_delete_schedule_removes_aggregate() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let candidate_id = app.first_candidate_id(&id);
    app.post_json(
        &format!("/schedules/{id}/users/0/candidates/{candidate_id}"),
        json!({ "availability": 2 }),
    )
    .await;
    app.post_json(
        &format!("/schedules/{id}/users/0/comments"),
        json!({ "comment": "testcomment" }),
    )
    .await;

    let response = app.post_empty(&format!("/schedules/{id}?delete=1")).await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), "/");
    assert!(app.store.get_schedule(&id).unwrap().is_none());
    assert!(app.store.list_candidates(&id).unwrap().is_empty());
    assert!(app.store.list_availabilities(&id).unwrap().is_empty());
    assert!(app.store.list_comments(&id).unwrap().is_empty());
}

#[tokio::test]
async fn test_only_creator_can_edit_or_delete() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let other = app.as_user(1, "other");

    let response = other.post_empty(&format!("/schedules/{id}?delete=1")).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = other.get(&format!("/schedules/{id}/edit")).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = other
        .post_json(
            &format!("/schedules/{id}?edit=1"),
            json!({ "scheduleName": "hijacked", "memo": "", "candidates": "" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let schedule = app.store.get_schedule(&id).unwrap().unwrap();
    assert_eq!(schedule.schedule_name, NAME);
}

#[tokio::test]
async fn test_update_schedule_without_action_is_rejected() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;

    let response = app.post_empty(&format!("/schedules/{id}")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.store.get_schedule(&id).unwrap().is_some());
}

#[tokio::test]
async fn test_other_participants_appear_on_schedule() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let other = app.as_user(1, "participant");

    other
        .post_json(
            &format!("/schedules/{id}/users/1/comments"),
            json!({ "comment": "works for me" }),
        )
        .await;
    let response = app.get(&format!("/schedules/{id}")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("participant"));
    assert!(response.body.contains("works for me"));
}

#[tokio::test]
async fn test_edit_checks_creator_before_input() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let other = app.as_user(1, "other");
    let blank = json!({ "scheduleName": "  ", "memo": "", "candidates": "" });

    let response = other
        .post_json(&format!("/schedules/{id}?edit=1"), blank.clone())
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .post_json("/schedules/missing?edit=1", blank.clone())
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .post_json(&format!("/schedules/{id}?edit=1"), blank)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failed_delete_returns_server_error_and_keeps_aggregate() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let candidate_id = app.first_candidate_id(&id);
    app.post_json(
        &format!("/schedules/{id}/users/0/candidates/{candidate_id}"),
        json!({ "availability": 2 }),
    )
    .await;
    app.post_json(
        &format!("/schedules/{id}/users/0/comments"),
        json!({ "comment": "testcomment" }),
    )
    .await;

    // The last step of the cascade fails after the dependents were removed.
    let conn = rusqlite::Connection::open(app.db_path()).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER refuse_schedule_delete BEFORE DELETE ON schedules
         BEGIN SELECT RAISE(ABORT, 'schedule delete refused'); END;",
    )
    .unwrap();

    let response = app.post_empty(&format!("/schedules/{id}?delete=1")).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body.contains(r#""status":"NG""#));
    assert!(app.store.get_schedule(&id).unwrap().is_some());
    assert_eq!(app.store.list_candidates(&id).unwrap().len(), 3);
    assert_eq!(app.store.list_availabilities(&id).unwrap().len(), 1);
    assert_eq!(app.store.list_comments(&id).unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cell_updates_keep_one_row_per_cell() {
    let app = Arc::new(TestApp::logged_in(0, "testuser"));
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;
    let candidates = app.store.list_candidates(&id).unwrap();

    let mut tasks = JoinSet::new();
    for round in 0..5_i64 {
        for user_id in 0..3_i64 {
            for candidate in &candidates {
                let app = app.clone();
                let uri = format!(
                    "/schedules/{id}/users/{user_id}/candidates/{}",
                    candidate.candidate_id
                );
                tasks.spawn(async move {
                    app.post_json(&uri, json!({ "availability": round % 3 }))
                        .await
                        .status
                });
            }
        }
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let rows = app.store.list_availabilities(&id).unwrap();
    assert_eq!(rows.len(), 3 * candidates.len());
    let cells: HashSet<_> = rows.iter().map(|a| (a.user_id, a.candidate_id)).collect();
    assert_eq!(cells.len(), rows.len());
}

#[tokio::test]
async fn test_overlong_comment_is_rejected() {
    let app = TestApp::logged_in(0, "testuser");
    let id = app.create_schedule(NAME, MEMO, CANDIDATES).await;

    let response = app
        .post_json(
            &format!("/schedules/{id}/users/0/comments"),
            json!({ "comment": "x".repeat(256) }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.store.list_comments(&id).unwrap().is_empty());
}

#[tokio::test]
async fn test_schedule_name_is_stored_as_submitted() {
    let app = TestApp::logged_in(0, "testuser");

    let id = app.create_schedule("  Offsite  ", "", "Mon").await;

    let schedule = app.store.get_schedule(&id).unwrap().unwrap();
    assert_eq!(schedule.schedule_name, "  Offsite  ");
}
