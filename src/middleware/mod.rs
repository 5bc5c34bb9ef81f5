mod auth;

pub use auth::{resolve_session, CurrentSession};
