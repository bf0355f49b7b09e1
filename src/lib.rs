//! Classbook: student records, fee tracking and revenue reporting for a
//! tutoring business.
//!
//! The aggregation engine lives in [`modules::reports::services::aggregation`];
//! everything else loads records, exposes them over HTTP and renders reports.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

use actix_web::web;

// Re-export commonly used types
pub use modules::payments;
pub use modules::reports;
pub use modules::students;

/// Registers every route plus the JSON/query error bodies
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(middleware::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(middleware::query_error_handler));

    modules::health::controllers::configure(cfg);
    students::controllers::configure(cfg);
    payments::controllers::configure(cfg);
    reports::controllers::configure(cfg);
}
