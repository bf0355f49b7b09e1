pub mod roster;
pub mod schedule;
pub mod student_service;

pub use roster::{ActiveSummary, RosterFile, RosterFilter, RosterPeriod, SortOrder};
pub use schedule::ScheduleSlot;
pub use student_service::{load_students, StudentService};
