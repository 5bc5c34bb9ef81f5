use std::path::PathBuf;
use crate::errors::{AppError, AppResult};
use crate::models::{Identity, Priority, Task};
use super::{json_store, policy};

/// In-memory mirror of `tasks.json`. Every mutation is flushed to disk.
pub struct TaskBoard {
    tasks: Vec<Task>,
    path: PathBuf,
}

/// Unvalidated input for a new task.
#[derive(Debug, Default)]
pub struct NewTask<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub priority: Option<&'a str>,
}

impl TaskBoard {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tasks: Vec<Task> = json_store::load_or_empty(&path, "tasks");

        for task in tasks.iter_mut().filter(|t| t.id.is_empty()) {
            task.id = new_task_id();
            tracing::debug!("Assigned id {} to stored task '{}'", task.id, task.title);
        }

        Self { tasks, path }
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// Case-sensitive substring match on title or description.
    pub fn search(&self, keyword: Option<&str>) -> AppResult<Vec<Task>> {
        let keyword = keyword
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Validation("Keyword is required".into()))?;

        let found: Vec<Task> = self.tasks.iter().filter(|t| t.matches(keyword)).cloned().collect();
        tracing::debug!("Search for '{}' matched {} tasks", keyword, found.len());
        Ok(found)
    }

    pub fn create<'a>(&mut self, input: NewTask<'a>, session: Option<&Identity>) -> AppResult<Task> {
        let owner = match session {
            Some(identity) if policy::can_create_task(session) => identity,
            _ => return Err(AppError::Auth("You must be logged in to create a task".into())),
        };

        let given = |field: Option<&'a str>| field.filter(|v| !v.is_empty());
        let (title, description, priority) = match (given(input.title), given(input.description), given(input.priority)) {
            (Some(title), Some(description), Some(priority)) => (title, description, priority),
            _ => {
                return Err(AppError::Validation(
                    "Title, description, and priority are required!!".into(),
                ))
            }
        };
        let priority: Priority = priority.parse().map_err(AppError::Validation)?;

        let task = Task {
            id: new_task_id(),
            title: title.to_string(),
            description: description.to_string(),
            priority,
            username: owner.username.clone(),
        };
        self.tasks.push(task.clone());
        self.persist();

        tracing::info!("Task {} created by {}", task.id, task.username);
        Ok(task)
    }

    pub fn delete(&mut self, id: Option<&str>, session: Option<&Identity>) -> AppResult<()> {
        let id = id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Validation("Id is required".into()))?;
        let caller = session.ok_or_else(|| AppError::Auth("You must be Logged in".into()))?;

        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        if !policy::can_mutate(session, &self.tasks[index].username) {
            tracing::warn!("User {} may not delete task {} owned by {}", caller.username, id, self.tasks[index].username);
            return Err(AppError::Auth(
                "You must be admin or the task owner to delete a task".into(),
            ));
        }

        self.tasks.remove(index);
        self.persist();

        tracing::info!("Task {} deleted by {}", id, caller.username);
        Ok(())
    }

    fn persist(&self) {
        json_store::save_or_log(&self.path, &self.tasks, "tasks");
    }
}

fn new_task_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
