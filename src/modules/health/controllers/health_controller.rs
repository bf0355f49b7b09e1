use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::modules::health::services::ReadinessProbe;

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// Readiness probe response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Probe name to pass/fail
    pub checks: BTreeMap<String, bool>,
}

/// Shared list of readiness probes
pub type Probes = Arc<Vec<Arc<dyn ReadinessProbe>>>;

fn health_body() -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

/// GET / - service banner
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(health_body())
}

/// GET /health - Liveness probe
/// Does not check dependencies
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(health_body())
}

/// GET /ready - Readiness probe
/// 503 when any dependency fails its check
pub async fn readiness_check(probes: web::Data<Probes>) -> impl Responder {
    let mut checks = BTreeMap::new();

    for probe in probes.iter() {
        let ok = match probe.check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(probe = probe.name(), "Readiness check failed: {}", e);
                false
            }
        };
        checks.insert(probe.name().to_string(), ok);
    }

    let ready = checks.values().all(|ok| *ok);
    let response = ReadinessResponse { ready, checks };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
