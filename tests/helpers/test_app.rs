// In-process application for HTTP tests
//
// Usage:
//   let ctx = TestContext::seeded(&students);
//   let app = test::init_service(App::new().configure(ctx.configure())).await;

use std::sync::Arc;

use actix_web::web;
use chrono::NaiveDate;
use classbook::core::BusinessClock;
use classbook::payments::repositories::PaymentRepository;
use classbook::payments::PaymentService;
use classbook::reports::ReportService;
use classbook::students::models::Student;
use classbook::students::repositories::StudentRepository;
use classbook::students::StudentService;
use rust_decimal::Decimal;

use super::memory_store::InMemoryStore;

pub const TEST_OPENING_BALANCE: i64 = 1_027_277;

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub clock: BusinessClock,
    pub students: Arc<StudentService>,
    pub payments: Arc<PaymentService>,
    pub reports: Arc<ReportService>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::seeded(&[])
    }

    pub fn seeded(records: &[Student]) -> Self {
        let store = Arc::new(InMemoryStore::new());
        store.seed(records);

        let clock = BusinessClock::india();
        let student_repo: Arc<dyn StudentRepository> = store.clone();
        let payment_repo: Arc<dyn PaymentRepository> = store.clone();

        Self {
            students: Arc::new(StudentService::new(
                student_repo.clone(),
                payment_repo.clone(),
                clock,
            )),
            payments: Arc::new(PaymentService::new(payment_repo.clone(), student_repo.clone())),
            reports: Arc::new(ReportService::new(
                student_repo,
                payment_repo,
                clock,
                Decimal::from(TEST_OPENING_BALANCE),
            )),
            store,
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Service data plus every route
    pub fn configure(&self) -> impl FnOnce(&mut web::ServiceConfig) + 'static {
        let students = self.students.clone();
        let payments = self.payments.clone();
        let reports = self.reports.clone();

        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(web::Data::new(students))
                .app_data(web::Data::new(payments))
                .app_data(web::Data::new(reports));
            classbook::configure_routes(cfg);
        }
    }
}
