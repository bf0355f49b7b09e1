pub mod readiness;

pub use readiness::{DatabaseProbe, ReadinessProbe};
