use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::reports::services::ReportService;
use crate::modules::students::controllers::csv_attachment;

const MIN_REPORT_YEAR: i32 = 1900;
const MAX_REPORT_YEAR: i32 = 9999;

/// `?year=` on analytics and export
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    #[serde(default)]
    pub year: Option<i32>,
}

impl YearQuery {
    pub fn validated(&self) -> Result<Option<i32>, AppError> {
        match self.year {
            Some(y) if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&y) => Err(
                AppError::validation(format!("year must be between {} and {}", MIN_REPORT_YEAR, MAX_REPORT_YEAR)),
            ),
            other => Ok(other),
        }
    }
}

/// GET /reports/summary
pub async fn get_summary(
    service: web::Data<Arc<ReportService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.summary().await?))
}

/// GET /reports/dashboard
pub async fn get_dashboard(
    service: web::Data<Arc<ReportService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.dashboard().await?))
}

/// GET /reports/years
pub async fn get_years(service: web::Data<Arc<ReportService>>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.available_years().await?))
}

/// GET /reports/analytics
pub async fn get_analytics(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<YearQuery>,
) -> Result<HttpResponse, AppError> {
    let view = service.analytics(query.validated()?).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /reports/export
///
/// Four-section CSV download
pub async fn export_report(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<YearQuery>,
) -> Result<HttpResponse, AppError> {
    let report = service.export(query.validated()?).await?;
    Ok(csv_attachment(&report.filename, report.content))
}

/// Configure routes for reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/summary", web::get().to(get_summary))
            .route("/dashboard", web::get().to(get_dashboard))
            .route("/years", web::get().to(get_years))
            .route("/analytics", web::get().to(get_analytics))
            .route("/export", web::get().to(export_report)),
    );
}
