use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use classbook::config::{AppConfig, Config, ServerConfig};
use classbook::middleware::{ErrorLogger, RequestId, SessionContext, SessionGate};
use classbook::modules::health::controllers::Probes;
use classbook::modules::health::services::{DatabaseProbe, ReadinessProbe};
use classbook::payments::repositories::{MySqlPaymentRepository, PaymentRepository};
use classbook::payments::PaymentService;
use classbook::reports::ReportService;
use classbook::students::repositories::{MySqlStudentRepository, StudentRepository};
use classbook::students::StudentService;

fn init_tracing(app: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("classbook={},actix_web=info", app.log_level))
    });
    let json = app.log_format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

fn cors(server: &ServerConfig) -> Cors {
    match &server.cors_allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .expose_headers(["content-disposition", "x-request-id"])
            .max_age(3600),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    init_tracing(&config.app);

    tracing::info!("Starting classbook");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let clock = config.reporting.clock()?;
    let session = Arc::new(SessionContext::new(config.session.admin_token_hash.clone())?);
    if !session.is_protected() {
        tracing::warn!("ADMIN_TOKEN_HASH not set, admin API is open");
    }

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(
        "Database pool initialized ({}..{} connections)",
        config.database.pool_size,
        config.database.max_connections
    );

    let student_repo: Arc<dyn StudentRepository> =
        Arc::new(MySqlStudentRepository::new(db_pool.clone()));
    let payment_repo: Arc<dyn PaymentRepository> =
        Arc::new(MySqlPaymentRepository::new(db_pool.clone()));

    let student_service = Arc::new(StudentService::new(
        student_repo.clone(),
        payment_repo.clone(),
        clock,
    ));
    let payment_service = Arc::new(PaymentService::new(
        payment_repo.clone(),
        student_repo.clone(),
    ));
    let report_service = Arc::new(ReportService::new(
        student_repo,
        payment_repo,
        clock,
        config.reporting.opening_balance,
    ));
    let probe_list: Vec<Arc<dyn ReadinessProbe>> = vec![Arc::new(DatabaseProbe::new(db_pool))];
    let probes: Probes = Arc::new(probe_list);

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server_config = config.server.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(student_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .app_data(web::Data::new(probes.clone()))
            .configure(classbook::configure_routes)
            .wrap(SessionGate::new(session.clone()))
            .wrap(ErrorLogger)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .wrap(cors(&server_config))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
