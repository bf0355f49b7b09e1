pub mod student_controller;

pub use student_controller::{configure, csv_attachment};
