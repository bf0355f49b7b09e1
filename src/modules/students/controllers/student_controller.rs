use std::sync::Arc;

use actix_web::{http::header, web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::payments::models::PaymentResponse;
use crate::modules::students::models::{ClassType, StudentRequest, StudentResponse};
use crate::modules::students::services::{RosterFilter, RosterPeriod, SortOrder, StudentService};

/// Roster query parameters
#[derive(Debug, Default, Deserialize)]
pub struct RosterQuery {
    pub name: Option<String>,
    /// Class type wire name, or `all`
    pub class_type: Option<String>,
    pub student_id: Option<String>,
    pub sort: Option<SortOrder>,
    /// Export only
    pub period: Option<RosterPeriod>,
}

impl RosterQuery {
    pub fn to_filter(&self) -> Result<RosterFilter, AppError> {
        let class_type = match self.class_type.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(raw.parse::<ClassType>()?),
        };

        Ok(RosterFilter {
            name: non_empty(&self.name),
            class_type,
            student_id: non_empty(&self.student_id),
            sort: self.sort,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Attachment response for a generated CSV
pub fn csv_attachment(filename: &str, content: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(content)
}

/// GET /students
pub async fn list_students(
    service: web::Data<Arc<StudentService>>,
    query: web::Query<RosterQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.to_filter()?;
    let today = service.today();
    let students: Vec<StudentResponse> = service
        .roster(&filter)
        .await?
        .into_iter()
        .map(|s| StudentResponse::from_student(s, today))
        .collect();

    Ok(HttpResponse::Ok().json(students))
}

/// POST /students
pub async fn create_student(
    service: web::Data<Arc<StudentService>>,
    request: web::Json<StudentRequest>,
) -> Result<HttpResponse, AppError> {
    let student = service.create_student(request.into_inner()).await?;
    let response = StudentResponse::from_student(student, service.today());

    Ok(HttpResponse::Created().json(response))
}

/// GET /students/{id}
pub async fn get_student(
    service: web::Data<Arc<StudentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let student = service.get_student(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(StudentResponse::from_student(student, service.today())))
}

/// PUT /students/{id}
pub async fn update_student(
    service: web::Data<Arc<StudentService>>,
    path: web::Path<String>,
    request: web::Json<StudentRequest>,
) -> Result<HttpResponse, AppError> {
    let student = service
        .update_student(&path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(StudentResponse::from_student(student, service.today())))
}

/// GET /students/{id}/payments
pub async fn list_student_payments(
    service: web::Data<Arc<StudentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payments: Vec<PaymentResponse> = service
        .payment_history(&path.into_inner())
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(payments))
}

/// GET /students/active
pub async fn active_summary(
    service: web::Data<Arc<StudentService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.active_summary().await?))
}

/// GET /students/schedule
pub async fn schedule(service: web::Data<Arc<StudentService>>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.schedule().await?))
}

/// GET /students/export
pub async fn export_students(
    service: web::Data<Arc<StudentService>>,
    query: web::Query<RosterQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.to_filter()?;
    let file = service
        .export_roster(&filter, query.period.unwrap_or_default())
        .await?;

    Ok(csv_attachment(&file.filename, file.content))
}

/// Configure student routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/students")
            .route("", web::get().to(list_students))
            .route("", web::post().to(create_student))
            .route("/active", web::get().to(active_summary))
            .route("/schedule", web::get().to(schedule))
            .route("/export", web::get().to(export_students))
            .route("/{id}", web::get().to(get_student))
            .route("/{id}", web::put().to(update_student))
            .route("/{id}/payments", web::get().to(list_student_payments)),
    );
}
