use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::Json,
    routing::{get, post, put},
    Router,
};
use shared::{Credentials, LoginResponse, Task, TaskInput};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::error::ApiError;
use crate::store::TodoStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

/// List name resolved from the request's bearer token.
pub struct ListOwner(pub String);

#[async_trait]
impl FromRequestParts<AppState> for ListOwner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let list = state
            .store
            .list_for_token(token.trim())
            .await?
            .ok_or(ApiError::Unauthorized)?;
        Ok(ListOwner(list))
    }
}

pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let mut app = Router::new()
        .route("/auth/login", post(login))
        .route("/todo", get(list_tasks).post(create_task))
        .route(
            "/todo/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/todo/:id/toggle", put(toggle_task));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginResponse>, ApiError> {
    let list = credentials.value.trim();
    if list.is_empty() {
        return Err(ApiError::BadRequest("list name must not be empty"));
    }
    let access_token = state.store.issue_token(list).await?;
    tracing::info!(list, "issued token");
    Ok(Json(LoginResponse { access_token }))
}

async fn list_tasks(
    State(state): State<AppState>,
    ListOwner(list): ListOwner,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.store.tasks(&list).await?))
}

async fn get_task(
    State(state): State<AppState>,
    ListOwner(list): ListOwner,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    state
        .store
        .task(&list, &id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

async fn create_task(
    State(state): State<AppState>,
    ListOwner(list): ListOwner,
    Json(input): Json<TaskInput>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    if input.value.trim().is_empty() {
        return Err(ApiError::BadRequest("task value must not be empty"));
    }
    let task = state.store.create(&list, input).await?;
    tracing::debug!(list = %list, id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    ListOwner(list): ListOwner,
    Path(id): Path<String>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Task>, ApiError> {
    state
        .store
        .update(&list, &id, input)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

async fn toggle_task(
    State(state): State<AppState>,
    ListOwner(list): ListOwner,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    state
        .store
        .toggle(&list, &id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

async fn delete_task(
    State(state): State<AppState>,
    ListOwner(list): ListOwner,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let deleted = state.store.delete(&list, &id).await?;
    if deleted.is_some() {
        tracing::debug!(list = %list, %id, "task deleted");
    }
    deleted.map(Json).ok_or(ApiError::NotFound(id))
}
