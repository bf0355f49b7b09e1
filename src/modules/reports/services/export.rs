use chrono::NaiveDate;

use crate::core::currency::plain_amount;
use crate::core::error::AppError;
use crate::modules::students::models::Student;

use super::aggregation::{
    generate_class_type_data, generate_monthly_data, generate_top_students_data, summarize,
    DEFAULT_TOP_STUDENTS,
};
use super::chart_adapters::payment_method_bars;

pub const MONTHLY_SECTION: &str = "Monthly Revenue Data";
pub const CLASS_SECTION: &str = "Class Revenue Data";
pub const TOP_STUDENTS_SECTION: &str = "Top Students Data";
pub const PAYMENT_METHOD_SECTION: &str = "Payment Method Data";

/// A generated financial report download
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFile {
    pub filename: String,
    pub content: String,
}

pub fn report_filename(year: i32) -> String {
    format!("financial_report_{}.csv", year)
}

/// One labelled block: title line, column headers, rows
fn write_section<I>(title: &str, headers: [&str; 2], rows: I) -> Result<String, AppError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record([title])?;
    writer.write_record(headers)?;
    for (label, value) in rows {
        writer.write_record([label, value])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("Failed to flush report CSV: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::internal(format!("Report CSV is not UTF-8: {}", e)))
}

/// Four-section financial report for `year`.
///
/// Monthly figures cover `year`; class, top-student and payment-method
/// figures cover every record. Methods with no revenue are left out.
pub fn export_report(
    students: &[Student],
    year: i32,
    today: NaiveDate,
) -> Result<ReportFile, AppError> {
    let monthly = generate_monthly_data(students, year)
        .into_iter()
        .map(|m| (m.month.to_string(), plain_amount(m.amount)));

    let classes = generate_class_type_data(students)
        .into_iter()
        .map(|c| (c.class_type.to_string(), plain_amount(c.revenue)));

    let top = generate_top_students_data(students, DEFAULT_TOP_STUDENTS)
        .into_iter()
        .map(|t| (t.name, plain_amount(t.amount)));

    let methods = payment_method_bars(&summarize(students, today))
        .into_iter()
        .map(|bar| (bar.name, plain_amount(bar.amount)));

    let sections = [
        write_section(MONTHLY_SECTION, ["Month", "Amount"], monthly)?,
        write_section(CLASS_SECTION, ["Class Type", "Revenue"], classes)?,
        write_section(TOP_STUDENTS_SECTION, ["Student Name", "Total Revenue"], top)?,
        write_section(PAYMENT_METHOD_SECTION, ["Method", "Amount"], methods)?,
    ];

    Ok(ReportFile {
        filename: report_filename(year),
        content: sections.join("\r\n"),
    })
}
