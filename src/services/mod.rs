pub mod person_service;
pub mod todo_service;

pub use person_service::PersonService;
pub use todo_service::{TodoError, TodoService};
