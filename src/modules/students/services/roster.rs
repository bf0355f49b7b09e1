use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::calendar::{is_same_month, month_abbreviation};
use crate::core::currency::plain_amount;
use crate::core::error::AppError;
use crate::modules::students::models::{ClassType, Student};

const ROSTER_HEADERS: [&str; 7] = [
    "Serial Number",
    "Name",
    "Student ID",
    "Start Date",
    "Class Type",
    "Payment",
    "Payment Method",
];

const ACTIVE_PREVIEW_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Roster table filters; `None` fields match everything
#[derive(Debug, Clone, Default)]
pub struct RosterFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub class_type: Option<ClassType>,
    /// Case-insensitive substring of the business id
    pub student_id: Option<String>,
    pub sort: Option<SortOrder>,
}

impl RosterFilter {
    pub fn matches(&self, student: &Student) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .map_or(true, |n| contains_ignore_case(&student.name, n));
        let class_ok = self.class_type.map_or(true, |c| student.class_type == c);
        let id_ok = self
            .student_id
            .as_deref()
            .map_or(true, |id| contains_ignore_case(&student.student_id, id));

        name_ok && class_ok && id_ok
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Numeric part of a business id: the first run of digits, 0 when there is none
pub fn student_number(student_id: &str) -> u64 {
    let digits: String = student_id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Filters, then optionally sorts by `student_number` (stable)
pub fn apply(students: Vec<Student>, filter: &RosterFilter) -> Vec<Student> {
    let mut rows: Vec<Student> = students.into_iter().filter(|s| filter.matches(s)).collect();

    match filter.sort {
        Some(SortOrder::Asc) => rows.sort_by_key(|s| student_number(&s.student_id)),
        Some(SortOrder::Desc) => {
            rows.sort_by(|a, b| student_number(&b.student_id).cmp(&student_number(&a.student_id)))
        }
        None => {}
    }

    rows
}

/// Which start dates a roster export keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterPeriod {
    #[default]
    All,
    Year,
    Month,
}

impl RosterPeriod {
    fn includes(&self, start: NaiveDate, today: NaiveDate) -> bool {
        match self {
            RosterPeriod::All => true,
            RosterPeriod::Year => start.year() == today.year(),
            RosterPeriod::Month => is_same_month(start, today),
        }
    }

    pub fn filename(&self, today: NaiveDate) -> String {
        match self {
            RosterPeriod::All => "student_data.csv".to_string(),
            RosterPeriod::Year => format!("student_data_{}.csv", today.year()),
            RosterPeriod::Month => format!(
                "student_data_{}_{}.csv",
                month_abbreviation(today),
                today.year()
            ),
        }
    }
}

/// A downloadable roster
#[derive(Debug, Clone, PartialEq)]
pub struct RosterFile {
    pub filename: String,
    pub content: String,
}

/// Flat per-student CSV of the students starting in `period`
pub fn export_csv(
    students: &[Student],
    period: RosterPeriod,
    today: NaiveDate,
) -> Result<RosterFile, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(ROSTER_HEADERS)?;

    for student in students
        .iter()
        .filter(|s| period.includes(s.start_date, today))
    {
        writer.write_record([
            student.serial_number.to_string(),
            student.name.clone(),
            student.student_id.clone(),
            student.start_date.format("%d/%m/%Y").to_string(),
            student.class_type.to_string(),
            plain_amount(student.payment),
            student.payment_method.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("Failed to flush roster CSV: {}", e)))?;
    let content = String::from_utf8(bytes)
        .map_err(|e| AppError::internal(format!("Roster CSV is not UTF-8: {}", e)))?;

    Ok(RosterFile {
        filename: period.filename(today),
        content,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivePreview {
    pub id: String,
    pub name: String,
    pub class_type: ClassType,
    pub class_time: Option<String>,
}

/// Counts behind the "active students" card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveSummary {
    pub active_count: usize,
    /// Active students with a class time set
    pub scheduled_count: usize,
    /// Every class type present, zero when empty
    pub by_class: BTreeMap<ClassType, usize>,
    pub preview: Vec<ActivePreview>,
}

pub fn active_summary(students: &[Student], today: NaiveDate) -> ActiveSummary {
    let active: Vec<&Student> = students.iter().filter(|s| s.is_active(today)).collect();

    let mut by_class: BTreeMap<ClassType, usize> =
        ClassType::ALL.into_iter().map(|c| (c, 0)).collect();
    for student in &active {
        *by_class.entry(student.class_type).or_insert(0) += 1;
    }

    ActiveSummary {
        active_count: active.len(),
        scheduled_count: active.iter().filter(|s| s.class_time.is_some()).count(),
        by_class,
        preview: active
            .iter()
            .take(ACTIVE_PREVIEW_LEN)
            .map(|s| ActivePreview {
                id: s.id.clone(),
                name: s.name.clone(),
                class_type: s.class_type,
                class_time: s.class_time.map(|t| t.format("%H:%M").to_string()),
            })
            .collect(),
    }
}
