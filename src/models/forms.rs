use serde::Deserialize;

// Every field is optional so that missing input reaches the validation
// rules instead of being rejected by the extractor.

#[derive(Debug, Deserialize, Default)]
pub struct LoginForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TaskForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TaskIdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProfileQuery {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Treats absent and empty strings alike.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
