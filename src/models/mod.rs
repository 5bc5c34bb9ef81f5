mod user;
mod forms;
mod task;

pub use user::{Identity, Role, User};
pub use forms::{present, LoginForm, ProfileQuery, RegisterForm, SearchQuery, TaskForm, TaskIdQuery};
pub use task::{Priority, Task};
