use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::payments::models::{PaymentRequest, PaymentResponse};
use crate::modules::payments::services::PaymentService;

/// List payments, newest first
/// GET /payments
pub async fn list_payments(
    service: web::Data<Arc<PaymentService>>,
) -> Result<HttpResponse, AppError> {
    let payments: Vec<PaymentResponse> = service
        .list_payments()
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(payments))
}

/// Record a payment against a student
/// POST /payments
pub async fn add_payment(
    service: web::Data<Arc<PaymentService>>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = service.add_payment(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(PaymentResponse::from(payment)))
}

/// PUT /payments/{id}
pub async fn update_payment(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<String>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = service
        .update_payment(&path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}

/// DELETE /payments/{id}
pub async fn delete_payment(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_payment(&path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Latest payments with the owning student's name
/// GET /payments/recent
pub async fn recent_payments(
    service: web::Data<Arc<PaymentService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.recent_payments().await?))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(list_payments))
            .route("", web::post().to(add_payment))
            .route("/recent", web::get().to(recent_payments))
            .route("/{id}", web::put().to(update_payment))
            .route("/{id}", web::delete().to(delete_payment)),
    );
}
