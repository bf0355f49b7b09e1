// Report endpoints: summary, dashboard, year picker, analytics and export

use actix_web::{http::StatusCode, test, App};
use chrono::Datelike;
use classbook::core::BusinessClock;
use classbook::payments::models::PaymentMethod;
use serde_json::Value;
use rust_decimal_macros::dec;

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::{months_before, TestContext, TestDataFactory};

/// One active student this month and one who finished over a year ago.
///
/// Revenue: 4500 in total, 1500 of it this month.
fn seeded() -> TestContext {
    let today = BusinessClock::india().today();

    let mut asha = TestDataFactory::student("s1", "Asha Rao", months_before(today, 0), dec!(1000));
    asha.payment_history = vec![TestDataFactory::payment(
        "s1",
        dec!(500),
        today,
        PaymentMethod::Upi,
    )];

    let mut ravi = TestDataFactory::student("s2", "Ravi Kumar", months_before(today, 13), dec!(2000));
    ravi.serial_number = 2;
    ravi.end_date = Some(months_before(today, 12));
    ravi.payment_method = PaymentMethod::BankTransfer;
    ravi.payment_history = vec![TestDataFactory::payment(
        "s2",
        dec!(1000),
        months_before(today, 13),
        PaymentMethod::Cash,
    )];

    TestContext::seeded(&[asha, ravi])
}

#[actix_web::test]
async fn test_summary_totals() {
    let ctx = seeded();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/reports/summary").to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(summary["total_revenue"], "4500");
    assert_eq!(summary["monthly_revenue"], "1500");
    assert_eq!(summary["yearly_revenue"], "1500");
    assert_eq!(summary["student_counts"]["Astrology"], 1);
    assert_eq!(summary["student_counts"]["Pooja"], 0);
    assert_eq!(summary["payments_by_method"]["Cash"], "2000");
    assert_eq!(summary["payments_by_method"]["Bank Transfer"], "2000");
    assert_eq!(summary["payments_by_method"]["UPI"], "500");
    assert_eq!(summary["payments_by_method"]["Other"], "0");
}

#[actix_web::test]
async fn test_dashboard_adds_opening_balance() {
    let ctx = seeded();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/reports/dashboard").to_request();
    let dashboard: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(dashboard["total_students"], 2);
    assert_eq!(dashboard["active_students"], 1);
    assert_eq!(dashboard["total_revenue"], "4500");
    assert_eq!(dashboard["opening_balance"], "1027277");
    assert_eq!(dashboard["total_revenue_with_opening_balance"], "1031777");
    assert_eq!(dashboard["total_revenue_display"], "₹10,31,777");
    assert_eq!(dashboard["students"].as_array().unwrap().len(), 2);
    assert_eq!(dashboard["students"][1]["status"], "completed");

    let load = dashboard["class_load"].as_array().unwrap();
    assert_eq!(load.len(), 3);
    let astrology = load.iter().find(|p| p["name"] == "Astrology").unwrap();
    assert_eq!(astrology["value"], "1");
    let pooja = load.iter().find(|p| p["name"] == "Pooja").unwrap();
    assert_eq!(pooja["value"], "0");

    let recent = dashboard["recent_payments"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["student_name"], "Asha Rao");
}

#[actix_web::test]
async fn test_years_cover_floor_and_data() {
    let ctx = seeded();
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let current = ctx.today().year();

    let req = test::TestRequest::get().uri("/reports/years").to_request();
    let years: Vec<i32> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(years, vec![current, current - 1, current - 2]);

    let empty = TestContext::new();
    let app = test::init_service(App::new().configure(empty.configure())).await;
    let req = test::TestRequest::get().uri("/reports/years").to_request();
    let years: Vec<i32> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(years, vec![current, current - 1, current - 2]);
}

#[actix_web::test]
async fn test_analytics_for_current_and_empty_year() {
    let ctx = seeded();
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let today = ctx.today();

    let req = test::TestRequest::get().uri("/reports/analytics").to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["year"], today.year());
    assert_eq!(view["has_data"], true);

    let months = view["monthly_revenue"].as_array().unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months[today.month0() as usize]["amount"], "1500");

    let top = view["top_students"].as_array().unwrap();
    assert_eq!(top[0]["name"], "Ravi Kumar");
    assert_eq!(top[0]["amount"], "3000");
    assert_eq!(top[1]["amount"], "1500");

    let methods: Vec<&str> = view["payment_methods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(methods, vec!["Cash", "UPI"]);

    let req = test::TestRequest::get()
        .uri("/reports/analytics?year=1990")
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["has_data"], false);
    assert!(view["payment_methods"].as_array().unwrap().is_empty());
    assert!(view["monthly_revenue"]
        .as_array()
        .unwrap()
        .iter()
        .all(|m| m["amount"] == "0"));
}

#[actix_web::test]
async fn test_analytics_rejects_bad_year() {
    let ctx = seeded();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    for uri in ["/reports/analytics?year=0", "/reports/analytics?year=abc"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], 400);
    }
}

#[actix_web::test]
async fn test_export_download() {
    let ctx = seeded();
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let year = ctx.today().year();

    let req = test::TestRequest::get().uri("/reports/export").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        resp.headers().get("content-disposition").unwrap().to_str().unwrap(),
        format!("attachment; filename=\"financial_report_{}.csv\"", year)
    );

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("Monthly Revenue Data\r\nMonth,Amount\r\n"));
    assert!(text.contains("Top Students Data\r\nStudent Name,Total Revenue\r\nRavi Kumar,3000\r\nAsha Rao,1500\r\n"));
    assert!(text.contains("Payment Method Data\r\nMethod,Amount\r\nCash,2000\r\nBank Transfer,2000\r\nUPI,500\r\n"));

    let req = test::TestRequest::get()
        .uri("/reports/export?year=2020")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"financial_report_2020.csv\""
    );
}
