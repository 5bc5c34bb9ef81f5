//! Who may mutate what. Pure functions over the current session.

use crate::models::Identity;

/// Any logged-in identity may create tasks.
pub fn can_create_task(session: Option<&Identity>) -> bool {
    session.is_some()
}

/// Admins may mutate anything; everyone else only what they own.
pub fn can_mutate(session: Option<&Identity>, owner: &str) -> bool {
    session.is_some_and(|s| s.is_admin() || s.username == owner)
}

/// Profile deletion is admin-only, ownership is not enough.
pub fn can_delete_profile(session: Option<&Identity>) -> bool {
    session.is_some_and(Identity::is_admin)
}
