mod auth;
mod task;
mod profile;

pub use auth::{handle_register, handle_login, handle_logout};
pub use task::{list_tasks, search_tasks, create_task, delete_task};
pub use profile::{get_profile, delete_profile};

use axum::{extract::rejection::JsonRejection, Json};

// A missing or malformed body is treated as a form with every field absent,
// so the route's own validation and session rules decide the answer.
fn form_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            tracing::debug!("Unusable request body: {}", rejection);
            T::default()
        }
    }
}
