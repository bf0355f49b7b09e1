pub mod controllers;
pub mod models;
pub mod services;

pub use models::FinancialSummary;
pub use services::ReportService;
