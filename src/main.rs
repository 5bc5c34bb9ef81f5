mod models;
mod handlers;
mod services;
mod middleware;
mod config;
mod errors;
mod state;

use anyhow::Context;
use axum::{
    routing::{get, post, delete},
    Router,
    middleware::from_fn_with_state,
};
use tower_http::{
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use crate::{
    config::Config,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize basic tracing subscriber
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Load users and tasks from disk
    let state = AppState::from_config(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind server on {}", addr))?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Failed to start server")?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_body_size;

    Router::new()
        // Task routes
        .route("/api/tasks", get(handlers::list_tasks)
            .post(handlers::create_task)
            .delete(handlers::delete_task))
        .route("/api/tasks/", delete(handlers::delete_task))
        .route("/api/tasks/search", get(handlers::search_tasks))

        // Profile routes
        .route("/profile", get(handlers::get_profile).delete(handlers::delete_profile))

        // Auth routes
        .route("/register", post(handlers::handle_register))
        .route("/login", post(handlers::handle_login))
        .route("/logout", post(handlers::handle_logout))

        // Resolve the caller from the session file on every request
        .layer(from_fn_with_state(state.clone(), middleware::resolve_session))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(dir: &TempDir) -> Router {
        build_router(AppState::from_config(Config::with_data_dir(dir.path())))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn send_raw(app: &Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn register(app: &Router, username: &str, role: &str) {
        let (status, _) = send(app, "POST", "/register", Some(json!({
            "username": username,
            "email": format!("{}@x.com", username),
            "password": "pw1",
            "role": role,
        }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn login(app: &Router, username: &str) {
        let (status, body) = send(app, "POST", "/login", Some(json!({
            "username": username,
            "password": "pw1",
        }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");
    }

    #[tokio::test]
    async fn logged_out_user_cannot_delete_own_task() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let (status, user) = send(&app, "POST", "/register", Some(json!({
            "username": "alice",
            "email": "alice@x.com",
            "password": "pw1",
            "role": "USER",
        }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["role"], "USER");

        login(&app, "alice").await;

        let (status, task) = send(&app, "POST", "/api/tasks", Some(json!({
            "title": "T",
            "description": "D",
            "priority": "high",
        }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(task["username"], "alice");

        let (status, tasks) = send(&app, "GET", "/api/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tasks.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "POST", "/logout", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Logged out successfully");

        let id = task["id"].as_str().unwrap();
        let (status, body) = send(&app, "DELETE", &format!("/api/tasks?id={}", id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "You must be Logged in");
    }

    #[tokio::test]
    async fn only_admin_may_delete_profiles() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        register(&app, "root", "ADMIN").await;
        register(&app, "alice", "USER").await;
        register(&app, "bob", "USER").await;

        login(&app, "bob").await;
        let (status, body) = send(&app, "DELETE", "/profile?username=alice", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "You are not admin");

        login(&app, "root").await;
        let (status, body) = send(&app, "DELETE", "/profile?username=alice", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted!");

        let (status, _) = send(&app, "GET", "/profile?username=alice", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", "/profile?username=alice", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn owner_and_admin_delete_tasks_others_are_refused() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        register(&app, "root", "ADMIN").await;
        register(&app, "alice", "USER").await;
        register(&app, "bob", "USER").await;

        login(&app, "alice").await;
        let task = json!({ "title": "T", "description": "D", "priority": "low" });
        let (_, first) = send(&app, "POST", "/api/tasks", Some(task.clone())).await;
        let (_, second) = send(&app, "POST", "/api/tasks", Some(task)).await;

        login(&app, "bob").await;
        let uri = format!("/api/tasks?id={}", first["id"].as_str().unwrap());
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        login(&app, "alice").await;
        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Task deleted!");

        login(&app, "root").await;
        let uri = format!("/api/tasks/?id={}", second["id"].as_str().unwrap());
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = send(&app, "DELETE", "/api/tasks", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Id is required");
    }

    #[tokio::test]
    async fn error_statuses_follow_route_contracts() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        register(&app, "alice", "USER").await;

        let (status, body) = send(&app, "GET", "/api/tasks/search", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "error": "Keyword is required" }));

        let (status, body) = send(&app, "POST", "/api/tasks", Some(json!({
            "title": "T", "description": "D", "priority": "high",
        }))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());

        let (status, body) = send(&app, "POST", "/register", Some(json!({
            "username": "alice", "email": "new@x.com", "password": "pw",
        }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User already exists");

        let (status, body) = send(&app, "POST", "/register", Some(json!({ "username": "carol" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["error"].is_string());

        let (status, body) = send(&app, "POST", "/login", Some(json!({
            "username": "alice", "password": "wrong",
        }))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Invalid credentials" }));

        let (status, body) = send(&app, "POST", "/login", Some(json!({
            "username": "nobody", "password": "pw1",
        }))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "User Not Found" }));

        let (status, _) = send(&app, "GET", "/profile", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        login(&app, "alice").await;
        let (status, body) = send(&app, "POST", "/api/tasks", Some(json!({ "title": "T" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Title, description, and priority are required!!");
    }

    #[tokio::test]
    async fn login_by_email_and_default_role() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let (status, user) = send(&app, "POST", "/register", Some(json!({
            "username": "dave", "email": "dave@x.com", "password": "pw1",
        }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["role"], "USER");

        let (status, body) = send(&app, "POST", "/login", Some(json!({
            "email": "dave@x.com", "password": "pw1",
        }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "dave");

        let (status, profile) = send(&app, "GET", "/profile?email=dave@x.com", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["username"], "dave");
    }

    #[tokio::test]
    async fn state_survives_restart() {
        let dir = TempDir::new().unwrap();
        {
            let app = app(&dir);
            register(&app, "alice", "USER").await;
            login(&app, "alice").await;
            let (status, _) = send(&app, "POST", "/api/tasks", Some(json!({
                "title": "Buy milk", "description": "2 litres", "priority": "medium",
            }))).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let app = app(&dir);
        let (_, found) = send(&app, "GET", "/api/tasks/search?keyword=milk", None).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["username"], "alice");

        // The session file still names alice
        let (status, _) = send(&app, "POST", "/api/tasks", Some(json!({
            "title": "T", "description": "D", "priority": "low",
        }))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn unusable_bodies_get_route_contract_responses() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        // Anonymous create is refused whatever the body looks like
        let (status, body) = send_raw(&app, "/api/tasks", None, "").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
        let (status, body) = send_raw(&app, "/api/tasks", Some("application/json"), "{ not json").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());

        let (status, body) = send_raw(&app, "/register", Some("application/json"), "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Username, email, and password are required!!");

        let (status, body) = send_raw(&app, "/login", Some("text/plain"), "alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Username, email, and password are required!!");

        register(&app, "alice", "USER").await;
        login(&app, "alice").await;
        let (status, body) = send_raw(&app, "/api/tasks", None, "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Title, description, and priority are required!!");
    }

    #[tokio::test]
    async fn logout_reports_unwritable_session_file() {
        let dir = TempDir::new().unwrap();
        // A regular file where the data directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let app = build_router(AppState::from_config(Config::with_data_dir(&blocker)));

        let (status, body) = send(&app, "POST", "/logout", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to logout" }));
    }
}
