pub mod aggregation;
pub mod chart_adapters;
pub mod export;
pub mod report_service;

pub use export::ReportFile;
pub use report_service::ReportService;
