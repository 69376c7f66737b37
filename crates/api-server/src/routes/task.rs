//! Task API endpoints
//!
//! JSON API for the checklist service.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use todo_core::task::Task;
use todo_core::Error;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveTaskRequest {
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceTaskRequest {
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub name: String,
    pub done: bool,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            done: task.done,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a service error onto an HTTP status
fn service_error(err: Error) -> ApiError {
    let status = match &err {
        Error::TaskNotFound => StatusCode::NOT_FOUND,
        Error::TaskAlreadyExists => StatusCode::CONFLICT,
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => {
            tracing::error!("Checklist service failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, err.to_string())
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| {
        error_response(StatusCode::BAD_REQUEST, "task id in path must be numeric")
    })
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(req)| req).map_err(|rejection| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("invalid request body: {}", rejection.body_text()),
        )
    })
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "name cannot be empty"));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /checklist/v1/tasks - List all tasks
async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = state.service().list().await.map_err(service_error)?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// POST /checklist/v1/tasks - Create a new task
async fn save_task(
    State(state): State<AppState>,
    payload: Result<Json<SaveTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let req = decode(payload)?;
    validate_name(&req.name)?;

    let saved = state
        .service()
        .save(Task::new(req.name).with_done(req.done))
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(saved))))
}

/// DELETE /checklist/v1/task/:id - Remove a task
async fn remove_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service().remove(id).await.map_err(service_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /checklist/v1/task/:id - Toggle the done flag
async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service().toggle_done(id).await.map_err(service_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /checklist/v1/task/:id - Replace a task, creating it if missing
async fn replace_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReplaceTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let id = parse_id(&id)?;
    let req = decode(payload)?;
    validate_name(&req.name)?;

    let outcome = state
        .service()
        .upsert(Task::new(req.name).with_id(id).with_done(req.done))
        .await
        .map_err(service_error)?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(TaskResponse::from(outcome.task))))
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checklist/v1/tasks", get(list_tasks).post(save_task))
        .route(
            "/checklist/v1/task/{id}",
            put(replace_task).patch(toggle_task).delete(remove_task),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
        Router,
    };
    use serde_json::{json, Value};
    use todo_core::task::{InMemoryTaskRepository, Task};
    use tower::ServiceExt;

    use crate::state::AppState;

    fn build_state() -> AppState {
        AppState::with_repository(Arc::new(InMemoryTaskRepository::new()), "memory")
    }

    fn app(state: &AppState) -> Router {
        crate::routes::router().with_state(state.clone())
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        app(state).oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn list_tasks_returns_empty_array() {
        let state = build_state();

        let response = send(&state, "GET", "/checklist/v1/tasks", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn list_tasks_returns_tasks_in_order() {
        let state = build_state();
        for name in ["Take out trash", "Service the car", "Get bread"] {
            state.service().save(Task::new(name)).await.unwrap();
        }

        let response = send(&state, "GET", "/checklist/v1/tasks", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!([
                {"id": 1, "name": "Take out trash", "done": false},
                {"id": 2, "name": "Service the car", "done": false},
                {"id": 3, "name": "Get bread", "done": false}
            ])
        );
    }

    #[tokio::test]
    async fn save_task_returns_created_task() {
        let state = build_state();

        let response = send(
            &state,
            "POST",
            "/checklist/v1/tasks",
            Some(r#"{"name":"Buy milk"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await,
            json!({"id": 1, "name": "Buy milk", "done": false})
        );
        assert_eq!(state.service().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_task_rejects_invalid_body() {
        let state = build_state();

        let response = send(&state, "POST", "/checklist/v1/tasks", Some(r#"{"name":"#)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = json_body(response).await;
        assert!(payload["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid request body"));
    }

    #[tokio::test]
    async fn save_task_rejects_empty_name() {
        let state = build_state();

        let response = send(&state, "POST", "/checklist/v1/tasks", Some(r#"{"name":"  "}"#)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "name cannot be empty"}));
        assert!(state.service().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_task_flips_done() {
        let state = build_state();
        state.service().save(Task::new("Service the car")).await.unwrap();

        let response = send(&state, "PATCH", "/checklist/v1/task/1", None).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.service().list().await.unwrap()[0].done);
    }

    #[tokio::test]
    async fn toggle_task_rejects_non_numeric_id() {
        let state = build_state();
        state.service().save(Task::new("Service the car")).await.unwrap();

        let response = send(&state, "PATCH", "/checklist/v1/task/meow", None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": "task id in path must be numeric"})
        );
        assert!(!state.service().list().await.unwrap()[0].done);
    }

    #[tokio::test]
    async fn toggle_task_unknown_id_is_not_found() {
        let state = build_state();
        state.service().save(Task::new("Service the car")).await.unwrap();

        let response = send(&state, "PATCH", "/checklist/v1/task/1337", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await, json!({"error": "task not found"}));
    }

    #[tokio::test]
    async fn remove_task_deletes_it() {
        let state = build_state();
        state.service().save(Task::new("Get bread")).await.unwrap();
        state.service().save(Task::new("Get milk")).await.unwrap();

        let response = send(&state, "DELETE", "/checklist/v1/task/1", None).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let remaining = state.service().list().await.unwrap();
        assert_eq!(remaining, vec![Task::new("Get milk").with_id(2)]);

        let response = send(&state, "DELETE", "/checklist/v1/task/1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn replace_task_updates_existing() {
        let state = build_state();
        state.service().save(Task::new("Get bread")).await.unwrap();

        let response = send(
            &state,
            "PUT",
            "/checklist/v1/task/1",
            Some(r#"{"name":"Get sourdough","done":true}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"id": 1, "name": "Get sourdough", "done": true})
        );
    }

    #[tokio::test]
    async fn replace_task_creates_missing() {
        let state = build_state();

        let response = send(
            &state,
            "PUT",
            "/checklist/v1/task/5",
            Some(r#"{"name":"Get bread"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await,
            json!({"id": 5, "name": "Get bread", "done": false})
        );
    }

    #[tokio::test]
    async fn replace_task_conflicts_with_removed_id() {
        let state = build_state();
        state.service().save(Task::new("Get bread")).await.unwrap();
        state.service().remove(1).await.unwrap();

        let response = send(
            &state,
            "PUT",
            "/checklist/v1/task/1",
            Some(r#"{"name":"Again"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await, json!({"error": "task already exists"}));
    }

    #[tokio::test]
    async fn replace_task_rejects_negative_id() {
        let state = build_state();

        let response = send(
            &state,
            "PUT",
            "/checklist/v1/task/-3",
            Some(r#"{"name":"Neg"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let state = build_state();

        let response = send(&state, "GET", "/checklist/v2/nothing", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await, json!({"error": "resource not found"}));
    }

    #[tokio::test]
    async fn wrong_method_is_not_allowed() {
        let state = build_state();

        let response = send(&state, "DELETE", "/checklist/v1/tasks", None).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await, json!({"error": "method not allowed"}));
    }
}
