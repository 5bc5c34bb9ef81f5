use serde::Deserialize;
use std::path::PathBuf;
use crate::models::Role;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub user: UserConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,  // in bytes
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: String,
    pub tasks_file: String,
    pub users_file: String,
    pub session_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    pub default_role: Role,  // assigned when registration omits a role
}

impl StorageConfig {
    pub fn tasks_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.tasks_file)
    }

    pub fn users_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.users_file)
    }

    pub fn session_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.session_file)
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = Self::defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    // Built-in values so the service boots with no config file present
    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 6060)?
            .set_default("server.max_body_size", 1024 * 1024)?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.tasks_file", "tasks.json")?
            .set_default("storage.users_file", "users.json")?
            .set_default("storage.session_file", "loggedInUser.json")?
            .set_default("user.default_role", "USER")
    }

    /// Configuration rooted at an arbitrary data directory, used by tests.
    #[cfg(test)]
    pub fn with_data_dir(data_dir: &std::path::Path) -> Self {
        Self::defaults()
            .and_then(|builder| builder.set_override("storage.data_dir", data_dir.display().to_string()))
            .and_then(|builder| builder.build())
            .and_then(|config| config.try_deserialize())
            .expect("default configuration must deserialize")
    }
}
