use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    error::ApiError,
    model::{Task, User, UserResponse},
    schema::{DeleteUserSchema, LoginSchema, RegisterSchema, TaskSchema, UpdateUserSchema},
    AppState,
};

type JsonBody<T> = Result<Json<T>, JsonRejection>;
type IdPath = Result<Path<String>, PathRejection>;

// Ids arrive as text in the path or as JSON numbers in a body; both must be
// positive integers.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    let id = raw.parse::<i64>().map_err(|_| ApiError::InvalidId)?;
    check_id(id)
}

// A path segment that cannot even be decoded is just another invalid id
fn path_id(path: IdPath) -> Result<u64, ApiError> {
    let Path(raw) = path.map_err(|_| ApiError::InvalidId)?;
    parse_id(&raw)
}

fn check_id(id: i64) -> Result<u64, ApiError> {
    u64::try_from(id)
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ApiError::InvalidId)
}

fn task_not_found(id: u64) -> ApiError {
    ApiError::NotFound { entity: "Task", id }
}

fn user_not_found(id: u64) -> ApiError {
    ApiError::NotFound { entity: "User", id }
}

// Handler for the health checker route
pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "In-memory task tracker and user registry with Rust and Axum";

    let json_response = json!({
        "status": "success",
        "message": MESSAGE
    });

    Json(json_response)
}

// Handler for getting all Task items
pub async fn get_tasks(State(data): State<Arc<AppState>>) -> impl IntoResponse {
    Json(data.tasks.list())
}

// Handler for creating a new Task
pub async fn create_task(
    State(data): State<Arc<AppState>>,
    payload: JsonBody<TaskSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;

    let task = data.tasks.create(Task {
        id: 0,
        title: body.title,
        description: body.description,
        status: body.status,
    });
    tracing::info!(task_id = task.id, "task created");

    Ok((StatusCode::CREATED, Json(task)))
}

// Handler for getting a specific Task by ID
pub async fn get_task(
    path: IdPath,
    State(data): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(path)?;
    let task = data.tasks.get(id).ok_or_else(|| task_not_found(id))?;
    Ok(Json(task))
}

// Handler for updating a Task by ID. Only title, description and status
// change; the id is kept.
pub async fn update_task(
    path: IdPath,
    State(data): State<Arc<AppState>>,
    payload: JsonBody<TaskSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(path)?;
    let Json(mut body) = payload?;

    let task = data
        .tasks
        .update(id, &mut |task: &mut Task| {
            task.title = std::mem::take(&mut body.title);
            task.description = std::mem::take(&mut body.description);
            task.status = body.status;
        })
        .ok_or_else(|| task_not_found(id))?;
    tracing::info!(task_id = task.id, "task updated");

    Ok(Json(task))
}

// Handler for deleting a Task by ID
pub async fn delete_task(
    path: IdPath,
    State(data): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(path)?;
    data.tasks.delete(id).ok_or_else(|| task_not_found(id))?;
    tracing::info!(task_id = id, "task deleted");

    Ok(StatusCode::NO_CONTENT)
}

// Handler for registering a new User. The password is hashed on the blocking
// pool before the store lock is taken.
pub async fn register(
    State(data): State<Arc<AppState>>,
    payload: JsonBody<RegisterSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let password_hash = data.hasher.spawn_hash(body.password).await?;

    let user = User {
        id: 0,
        username: body.username,
        email: body.email,
        password_hash,
    };
    let username = user.username.clone();
    let user = data
        .users
        .create_unique(user, &|existing: &User| existing.username == username)
        .ok_or(ApiError::UsernameTaken)?;
    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

// Handler for checking a username/password pair. Unknown users and wrong
// passwords get the same response and the same hashing cost.
pub async fn login(
    State(data): State<Arc<AppState>>,
    payload: JsonBody<LoginSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;

    let user = data.users.find(&|user: &User| user.username == body.username);
    let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
    let verified = data.hasher.spawn_verify(body.password, stored_hash).await?;

    match user.filter(|_| verified) {
        Some(user) => {
            tracing::info!(user_id = user.id, "login succeeded");
            Ok(Json(UserResponse::from(&user)))
        }
        None => {
            tracing::warn!(username = %body.username, "login rejected");
            Err(ApiError::InvalidCredentials)
        }
    }
}

// Handler for updating a User's email and/or password. Empty values leave
// the stored field unchanged.
pub async fn update_user(
    State(data): State<Arc<AppState>>,
    payload: JsonBody<UpdateUserSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let id = check_id(body.id)?;

    let mut email = body.email.filter(|email| !email.is_empty());
    let mut password_hash = match body.password.filter(|password| !password.is_empty()) {
        Some(password) => Some(data.hasher.spawn_hash(password).await?),
        None => None,
    };

    let user = data
        .users
        .update(id, &mut |user: &mut User| {
            if let Some(email) = email.take() {
                user.email = email;
            }
            if let Some(hash) = password_hash.take() {
                user.password_hash = hash;
            }
        })
        .ok_or_else(|| user_not_found(id))?;
    tracing::info!(user_id = user.id, "user updated");

    Ok(Json(UserResponse::from(&user)))
}

// Handler for deleting a User by the ID in the request body
pub async fn delete_user(
    State(data): State<Arc<AppState>>,
    payload: JsonBody<DeleteUserSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let id = check_id(body.id)?;

    data.users.delete(id).ok_or_else(|| user_not_found(id))?;
    tracing::info!(user_id = id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}
