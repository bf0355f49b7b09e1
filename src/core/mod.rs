pub mod calendar;
pub mod currency;
pub mod error;

pub use calendar::BusinessClock;
pub use error::{AppError, DataError, Result};
