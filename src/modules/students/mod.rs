// Students module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{ClassType, Student, StudentStatus};
pub use repositories::StudentRepository;
pub use services::StudentService;
