use std::path::PathBuf;
use crate::errors::{AppError, AppResult};
use crate::models::{Role, User};
use super::json_store;

/// In-memory mirror of `users.json`. Every mutation is flushed to disk.
pub struct UserDirectory {
    users: Vec<User>,
    path: PathBuf,
}

impl UserDirectory {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let users = json_store::load_or_empty(&path, "users");
        Self { users, path }
    }

    pub fn all(&self) -> &[User] {
        &self.users
    }

    /// First user whose username or email equals `identifier`.
    pub fn find_by_username_or_email(&self, identifier: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.username == identifier || u.email == identifier)
    }

    /// First user matching the given username or the given email.
    pub fn find_profile(&self, username: Option<&str>, email: Option<&str>) -> Option<&User> {
        self.users.iter().find(|u| {
            username.is_some_and(|name| u.username == name)
                || email.is_some_and(|mail| u.email == mail)
        })
    }

    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> AppResult<User> {
        let exists = self
            .users
            .iter()
            .any(|u| u.username == username || u.email == email);
        if exists {
            tracing::warn!("Registration rejected, user already exists: {}", username);
            return Err(AppError::Duplicate("User already exists".into()));
        }

        let user = User {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        self.users.push(user.clone());
        self.persist();

        tracing::info!("Registered user {} with role {}", user.username, user.role);
        Ok(user)
    }

    /// Checks a login attempt against the stored plaintext password.
    pub fn authenticate(&self, identifier: &str, password: &str) -> AppResult<&User> {
        let user = self
            .find_by_username_or_email(identifier)
            .ok_or_else(|| AppError::Auth("User Not Found".into()))?;

        if user.password != password {
            tracing::warn!("Invalid password for user: {}", user.username);
            return Err(AppError::Auth("Invalid credentials".into()));
        }
        Ok(user)
    }

    pub fn delete(&mut self, username: &str) -> AppResult<()> {
        let index = self
            .users
            .iter()
            .position(|u| u.username == username)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        self.users.remove(index);
        self.persist();

        tracing::info!("Deleted user: {}", username);
        Ok(())
    }

    fn persist(&self) {
        json_store::save_or_log(&self.path, &self.users, "users");
    }
}
