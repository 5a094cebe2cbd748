use std::sync::Arc;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, handler::*, AppState};

fn task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(get_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/update", put(update_user))
        .route("/delete", delete(delete_user))
}

pub fn create_router(app_state: Arc<AppState>, config: &Config) -> Router {
    let mut app: Router<Arc<AppState>> = Router::new().route("/", get(health_checker_handler));
    if config.services.tasks() {
        app = app.merge(task_routes());
    }
    if config.services.users() {
        app = app.merge(user_routes());
    }

    let app = app
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    match &config.cors_origin {
        Some(origin) => {
            let cors = CorsLayer::new()
                .allow_origin(origin.clone())
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([ACCEPT, CONTENT_TYPE]);
            app.layer(cors)
        }
        None => app,
    }
}
