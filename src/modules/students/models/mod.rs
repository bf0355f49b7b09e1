mod student;
mod wire;

pub use student::{ClassType, Student, StudentStatus};
pub use wire::{StudentDraft, StudentRequest, StudentResponse, StudentRow};
