pub mod payment_service;

pub use payment_service::{PaymentService, RECENT_PAYMENTS_LIMIT};
