pub mod json_store;
pub mod policy;
mod session_store;
mod user_directory;
mod task_board;

pub use session_store::SessionStore;
pub use user_directory::UserDirectory;
pub use task_board::{NewTask, TaskBoard};
