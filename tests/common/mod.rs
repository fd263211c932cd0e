use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use arranger::auth::FixedIdentity;
use arranger::server::{AppState, create_router};
use arranger::store::{SqliteStore, Store};

const DB_FILE: &str = "arranger.db";

/// One test's world: a fresh database and a router acting as a fixed user.
/// Everything is removed when the last handle is dropped.
pub struct TestApp {
    pub store: Arc<SqliteStore>,
    router: Router,
    _temp_dir: Arc<TempDir>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("location header")
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

impl TestApp {
    pub fn logged_in(user_id: i64, username: &str) -> Self {
        let temp_dir = Arc::new(TempDir::new().expect("create temp dir"));
        let store = SqliteStore::new(temp_dir.path().join(DB_FILE)).expect("open store");
        store.initialize().expect("initialize store");

        Self::build(
            Arc::new(store),
            temp_dir,
            FixedIdentity::user(user_id, username),
        )
    }

    pub fn anonymous() -> Self {
        let app = Self::logged_in(0, "unused");
        app.with_identity(FixedIdentity::anonymous())
    }

    pub fn db_path(&self) -> PathBuf {
        self._temp_dir.path().join(DB_FILE)
    }

    /// Another caller against the same database.
    pub fn as_user(&self, user_id: i64, username: &str) -> Self {
        self.with_identity(FixedIdentity::user(user_id, username))
    }

    fn with_identity(&self, identity: FixedIdentity) -> Self {
        Self::build(self.store.clone(), self._temp_dir.clone(), identity)
    }

    fn build(store: Arc<SqliteStore>, temp_dir: Arc<TempDir>, identity: FixedIdentity) -> Self {
        let state = Arc::new(AppState::new(store.clone(), Arc::new(identity)));
        Self {
            store,
            router: create_router(state),
            _temp_dir: temp_dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::get(uri).body(Body::empty()).expect("build request");
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.send(request).await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.send(request).await
    }

    pub async fn post_empty(&self, uri: &str) -> TestResponse {
        let request = Request::post(uri).body(Body::empty()).expect("build request");
        self.send(request).await
    }

    /// Creates a schedule through the API and returns its id.
    pub async fn create_schedule(&self, name: &str, memo: &str, candidates: &str) -> String {
        let response = self
            .post_json(
                "/schedules",
                serde_json::json!({
                    "scheduleName": name,
                    "memo": memo,
                    "candidates": candidates,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::FOUND);

        response
            .location()
            .split("/schedules/")
            .nth(1)
            .expect("schedule id in location")
            .to_string()
    }

    pub fn first_candidate_id(&self, schedule_id: &str) -> i64 {
        self.store
            .list_candidates(schedule_id)
            .expect("list candidates")
            .first()
            .expect("at least one candidate")
            .candidate_id
    }
}
