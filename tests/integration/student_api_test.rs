// Student endpoints: CRUD, roster filtering, schedule and CSV export
//
// Runs the real routes against the in-memory store.

use actix_web::{http::StatusCode, test, App};
use chrono::NaiveTime;
use classbook::core::BusinessClock;
use classbook::payments::models::PaymentMethod;
use classbook::students::models::{ClassType, StudentRow};
use rust_decimal_macros::dec;
use serde_json::Value;

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::{days_after, months_before, to_row, TestContext, TestDataFactory};

#[actix_web::test]
async fn test_create_and_fetch_student() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let today = ctx.today();

    let req = test::TestRequest::post()
        .uri("/students")
        .set_json(TestDataFactory::student_request(1, "Asha Rao", "ST-101", today))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["name"], "Asha Rao");
    assert_eq!(created["status"], "active");
    assert_eq!(created["payment"], "1000");
    assert_eq!(created["payment_method"], "UPI");
    assert_eq!(created["class_time"], "18:30");
    assert_eq!(created["payment_history"].as_array().unwrap().len(), 0);

    let id = created["id"].as_str().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/students/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched["student_id"], "ST-101");
    assert_eq!(fetched["class_type"], "Astrology");
}

#[actix_web::test]
async fn test_create_student_validation() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let today = ctx.today();

    let mut body = TestDataFactory::student_request(1, "A", "ST-101", today);
    let req = test::TestRequest::post()
        .uri("/students")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    body["name"] = "A".repeat(256).into();
    let req = test::TestRequest::post()
        .uri("/students")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    body["name"] = "Asha Rao".into();
    body["payment"] = "10000000000".into();
    let req = test::TestRequest::post()
        .uri("/students")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    body["payment"] = "1000".into();
    body["start_date"] = "05/03/2024".into();
    let req = test::TestRequest::post()
        .uri("/students")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: Value = test::read_body_json(resp).await;
    assert_eq!(error["error"]["code"], 422);
    assert!(error["error"]["message"]
        .as_str()
        .unwrap()
        .contains("start_date"));

    body["start_date"] = today.format("%Y-%m-%d").to_string().into();
    body["class_type"] = "Yoga".into();
    let req = test::TestRequest::post()
        .uri("/students")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_update_student_keeps_history() {
    let today = BusinessClock::india().today();
    let mut student = TestDataFactory::student("s1", "Asha Rao", months_before(today, 3), dec!(1000));
    student.payment_history = vec![TestDataFactory::payment(
        "s1",
        dec!(500),
        months_before(today, 1),
        PaymentMethod::Cash,
    )];
    let ctx = TestContext::seeded(&[student]);
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let mut body = TestDataFactory::student_request(7, "Asha R. Rao", "ST-101", months_before(ctx.today(), 3));
    body["end_date"] = days_after(ctx.today(), -1).format("%Y-%m-%d").to_string().into();

    let req = test::TestRequest::put()
        .uri("/students/s1")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["name"], "Asha R. Rao");
    assert_eq!(updated["serial_number"], 7);
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["payment_history"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::put()
        .uri("/students/missing")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_roster_filter_and_sort() {
    let today = BusinessClock::india().today();
    let start = months_before(today, 2);

    let mut first = TestDataFactory::student("a", "Asha Rao", start, dec!(1000));
    first.student_id = "ST-20".into();
    first.serial_number = 1;
    let mut second = TestDataFactory::student("b", "Ravi Kumar", start, dec!(1000));
    second.student_id = "ST-3".into();
    second.serial_number = 2;
    second.class_type = ClassType::Pooja;
    let mut third = TestDataFactory::student("c", "Ashok Mehta", start, dec!(1000));
    third.student_id = "ST-100".into();
    third.serial_number = 3;

    let ctx = TestContext::seeded(&[first, second, third]);
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get()
        .uri("/students?name=ASH&sort=desc")
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = rows.iter().map(|r| r["student_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["ST-100", "ST-20"]);

    let req = test::TestRequest::get()
        .uri("/students?sort=asc")
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = rows.iter().map(|r| r["student_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["ST-3", "ST-20", "ST-100"]);

    let req = test::TestRequest::get()
        .uri("/students?class_type=Pooja")
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Ravi Kumar");

    let req = test::TestRequest::get()
        .uri("/students?sort=sideways")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_active_summary_and_schedule() {
    let today = BusinessClock::india().today();

    let mut morning = TestDataFactory::student("a", "Asha Rao", months_before(today, 1), dec!(1000));
    morning.class_time = NaiveTime::from_hms_opt(7, 0, 0);
    let mut evening = TestDataFactory::student("b", "Ravi Kumar", months_before(today, 1), dec!(1000));
    evening.class_time = NaiveTime::from_hms_opt(18, 30, 0);
    evening.class_type = ClassType::Hooponopono;
    let unscheduled = TestDataFactory::student("c", "Meera", months_before(today, 1), dec!(1000));
    let mut future = TestDataFactory::student("d", "Kiran", days_after(today, 60), dec!(1000));
    future.class_time = NaiveTime::from_hms_opt(7, 0, 0);

    let ctx = TestContext::seeded(&[morning, evening, unscheduled, future]);
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/students/active").to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["active_count"], 3);
    assert_eq!(summary["scheduled_count"], 2);
    assert_eq!(summary["by_class"]["Astrology"], 2);
    assert_eq!(summary["by_class"]["Ho'oponopo"], 1);
    assert_eq!(summary["by_class"]["Pooja"], 0);
    assert_eq!(summary["preview"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::get().uri("/students/schedule").to_request();
    let slots: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(slots.len(), 36);

    let placed: usize = slots
        .iter()
        .map(|s| s["students"].as_array().unwrap().len())
        .sum();
    assert_eq!(placed, 2);
    assert_eq!(slots[2]["students"][0]["name"], "Asha Rao");
    assert_eq!(slots[25]["students"][0]["name"], "Ravi Kumar");
}

#[actix_web::test]
async fn test_roster_export_download() {
    let today = BusinessClock::india().today();
    let mut student = TestDataFactory::student("a", "Rao, Asha", months_before(today, 14), dec!(1200.50));
    student.payment_method = PaymentMethod::BankTransfer;
    let ctx = TestContext::seeded(&[student]);
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/students/export").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"student_data.csv\""
    );

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Serial Number,Name,Student ID,Start Date,Class Type,Payment,Payment Method")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("1,\"Rao, Asha\",ST-a,"));
    assert!(row.ends_with(",Astrology,1200.5,Bank Transfer"));

    let req = test::TestRequest::get()
        .uri("/students/export?period=month")
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(std::str::from_utf8(&body).unwrap().lines().count(), 1);
}

#[actix_web::test]
async fn test_malformed_stored_record_surfaces_as_data_error() {
    let today = BusinessClock::india().today();
    let ctx = TestContext::new();
    let mut row: StudentRow = to_row(&TestDataFactory::student("bad", "Broken", today, dec!(10)));
    row.class_type = "Yoga".into();
    ctx.store.insert_row(row);
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/students").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri("/students/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
