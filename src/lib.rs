pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod password;
pub mod route;
pub mod schema;
pub mod store;

use std::sync::Arc;

use config::Config;
use model::{Task, User};
use password::PasswordHasher;
use store::{MemoryStore, Store};

// Struct representing the application state. Each entity has its own store,
// so task and user requests never wait on the same lock.
pub struct AppState {
    pub tasks: Arc<dyn Store<Task>>,
    pub users: Arc<dyn Store<User>>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_stores(
            Arc::new(MemoryStore::<Task>::new()),
            Arc::new(MemoryStore::<User>::new()),
            PasswordHasher::new(config.password_hash_iterations),
        )
    }

    pub fn with_stores(
        tasks: Arc<dyn Store<Task>>,
        users: Arc<dyn Store<User>>,
        hasher: PasswordHasher,
    ) -> Self {
        Self { tasks, users, hasher }
    }
}
