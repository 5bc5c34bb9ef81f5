use std::sync::Arc;
use tokio::sync::Mutex;
use crate::config::Config;
use crate::services::{SessionStore, TaskBoard, UserDirectory};

// Shared between handlers. Each collection sits behind its own lock so an
// operation runs to completion, file write included, before the next one
// touches the same collection.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<Mutex<UserDirectory>>,
    pub tasks: Arc<Mutex<TaskBoard>>,
    pub sessions: SessionStore,
    pub config: Config,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let storage = &config.storage;
        let users = UserDirectory::load(storage.users_path());
        let tasks = TaskBoard::load(storage.tasks_path());
        let sessions = SessionStore::new(storage.session_path());
        tracing::info!("Starting with {} users and {} tasks", users.all().len(), tasks.list().len());

        Self {
            users: Arc::new(Mutex::new(users)),
            tasks: Arc::new(Mutex::new(tasks)),
            sessions,
            config,
        }
    }
}
