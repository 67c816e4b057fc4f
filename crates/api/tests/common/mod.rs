#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use inkwell_api::auth::jwt::{generate_access_token, JwtConfig};
use inkwell_api::config::{LogFormat, ServerConfig, SessionConfig};
use inkwell_api::router::build_app_router;
use inkwell_api::state::AppState;
use inkwell_core::roles::Role;
use inkwell_core::types::DbId;
use inkwell_db::models::user::{CreateUser, UpdateProfile};
use inkwell_db::{DraftStore, MemoryStore};
use inkwell_events::EventBus;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const SESSION_SECRET: &str = "session-secret-for-tests";

/// Build a test `ServerConfig` with safe defaults and no database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        database_max_connections: 1,
        jwt: JwtConfig {
            secret: "jwt-secret-for-tests-long-enough".to_string(),
            access_token_expiry_mins: 15,
        },
        session: SessionConfig {
            secret: SESSION_SECRET.to_string(),
            ttl_secs: 600,
        },
        log_format: LogFormat::Pretty,
    }
}

/// A caller with a valid access token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: DbId,
    pub token: String,
}

/// The full router over an in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub events: Arc<EventBus>,
    pub config: ServerConfig,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(EventBus::default());
        let config = test_config();
        let state = AppState::new(store.clone(), config.clone(), Arc::clone(&events));
        Self {
            router: build_app_router(state),
            store,
            events,
            config,
        }
    }

    /// Send a request through the full middleware stack.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Like [`send`](Self::send), returning the status and parsed body.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, token, body).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(&user.token), None).await
    }

    pub async fn post(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(&user.token), Some(body))
            .await
    }

    pub fn token_for(&self, user_id: DbId, email: &str) -> String {
        generate_access_token(user_id, email, &self.config.jwt).unwrap()
    }

    /// A registered account that has not completed onboarding.
    pub async fn unassigned(&self, email: &str) -> TestUser {
        let user = self
            .store
            .create_user(&CreateUser {
                email: email.to_string(),
                password_hash: "not-used-by-token-tests".to_string(),
            })
            .await
            .unwrap();
        TestUser {
            id: user.id,
            token: self.token_for(user.id, email),
        }
    }

    pub async fn user(&self, name: &str, role: Role) -> TestUser {
        let email = format!("{}@example.com", name.to_lowercase());
        let user = self.unassigned(&email).await;
        self.store
            .update_profile(
                user.id,
                &UpdateProfile {
                    display_name: name.to_string(),
                    role,
                },
            )
            .await
            .unwrap();
        user
    }

    pub async fn author(&self, name: &str) -> TestUser {
        self.user(name, Role::Author).await
    }

    pub async fn reviewer(&self, name: &str) -> TestUser {
        self.user(name, Role::Reviewer).await
    }

    /// Create a draft through the API and return its id.
    pub async fn draft(&self, owner: &TestUser, title: &str) -> DbId {
        let (status, json) = self
            .post("/api/v1/drafts", owner, json!({ "title": title }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"]["id"].as_i64().unwrap()
    }

    pub async fn grant(&self, owner: &TestUser, draft_id: DbId, target: &TestUser) -> DbId {
        let (status, json) = self
            .post(
                &format!("/api/v1/drafts/{draft_id}/collaborators"),
                owner,
                json!({ "user_id": target.id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"]["id"].as_i64().unwrap()
    }
}

/// Collect a response body as JSON. Empty bodies read as `null`; plain-text
/// bodies (axum extractor rejections) read as a JSON string.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}
