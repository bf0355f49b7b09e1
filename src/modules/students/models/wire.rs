use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::student::{ClassType, Student, StudentStatus};
use crate::core::calendar::{parse_class_time, parse_date, parse_optional_date};
use crate::core::currency::validate_amount;
use crate::core::{AppError, DataError};
use crate::modules::payments::models::{Payment, PaymentMethod, PaymentResponse};

/// `students` table row
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub serial_number: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub payment: Decimal,
    pub payment_method: String,
    pub class_type: String,
    pub class_time: Option<String>,
    pub class_section: Option<String>,
    pub picture_url: Option<String>,
}

impl StudentRow {
    pub fn into_student(self, payment_history: Vec<Payment>) -> Result<Student, DataError> {
        let class_time = match self.class_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_class_time(raw)?),
        };

        Ok(Student {
            payment_method: self.payment_method.parse()?,
            class_type: self.class_type.parse()?,
            class_time,
            id: self.id,
            student_id: self.student_id,
            name: self.name,
            serial_number: self.serial_number,
            start_date: self.start_date,
            end_date: self.end_date,
            payment: self.payment,
            class_section: self.class_section,
            picture_url: self.picture_url,
            payment_history,
        })
    }
}

/// Request body for POST /students and PUT /students/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct StudentRequest {
    pub serial_number: i32,
    pub name: String,
    pub student_id: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub payment: Decimal,
    pub payment_method: String,
    pub class_type: String,
    #[serde(default)]
    pub class_time: Option<String>,
    #[serde(default)]
    pub class_section: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
}

/// Validated student fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDraft {
    pub serial_number: i32,
    pub name: String,
    pub student_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub payment: Decimal,
    pub payment_method: PaymentMethod,
    pub class_type: ClassType,
    pub class_time: Option<NaiveTime>,
    pub class_section: Option<String>,
    pub picture_url: Option<String>,
}

impl StudentDraft {
    pub fn into_student(self, id: String, payment_history: Vec<Payment>) -> Student {
        Student {
            id,
            student_id: self.student_id,
            name: self.name,
            serial_number: self.serial_number,
            start_date: self.start_date,
            end_date: self.end_date,
            payment: self.payment,
            payment_method: self.payment_method,
            class_type: self.class_type,
            class_time: self.class_time,
            class_section: self.class_section,
            picture_url: self.picture_url,
            payment_history,
        }
    }
}

// Column widths in the students table
const MAX_NAME_CHARS: usize = 255;
const MAX_STUDENT_ID_CHARS: usize = 64;
const MAX_CLASS_SECTION_CHARS: usize = 64;
const MAX_PICTURE_URL_CHARS: usize = 1024;

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min {
        return Err(AppError::validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if len > max {
        return Err(AppError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<StudentRequest> for StudentDraft {
    type Error = AppError;

    fn try_from(request: StudentRequest) -> Result<Self, Self::Error> {
        if request.serial_number < 1 {
            return Err(AppError::validation("serial_number must be at least 1"));
        }
        let name = request.name.trim().to_string();
        check_length("name", &name, 2, MAX_NAME_CHARS)?;
        let student_id = request.student_id.trim().to_string();
        check_length("student_id", &student_id, 2, MAX_STUDENT_ID_CHARS)?;
        validate_amount(request.payment).map_err(AppError::Validation)?;

        let class_section = non_blank(request.class_section);
        if let Some(section) = &class_section {
            check_length("class_section", section, 1, MAX_CLASS_SECTION_CHARS)?;
        }
        let picture_url = non_blank(request.picture_url);
        if let Some(url) = &picture_url {
            check_length("picture_url", url, 1, MAX_PICTURE_URL_CHARS)?;
        }

        let class_time = match non_blank(request.class_time) {
            Some(raw) => Some(parse_class_time(&raw)?),
            None => None,
        };

        Ok(StudentDraft {
            serial_number: request.serial_number,
            name,
            student_id,
            start_date: parse_date("start_date", &request.start_date)?,
            end_date: parse_optional_date("end_date", request.end_date.as_deref())?,
            payment: request.payment,
            payment_method: request.payment_method.parse()?,
            class_type: request.class_type.parse()?,
            class_time,
            class_section,
            picture_url,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentResponse {
    pub id: String,
    pub serial_number: i32,
    pub name: String,
    pub student_id: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub payment: String,
    pub payment_method: PaymentMethod,
    pub class_type: ClassType,
    pub class_time: Option<String>,
    pub class_section: Option<String>,
    pub picture_url: Option<String>,
    pub status: StudentStatus,
    pub payment_history: Vec<PaymentResponse>,
}

impl StudentResponse {
    pub fn from_student(student: Student, today: NaiveDate) -> Self {
        let status = student.status(today);
        Self {
            id: student.id,
            serial_number: student.serial_number,
            name: student.name,
            student_id: student.student_id,
            start_date: student.start_date.format("%Y-%m-%d").to_string(),
            end_date: student.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            payment: student.payment.to_string(),
            payment_method: student.payment_method,
            class_type: student.class_type,
            class_time: student.class_time.map(|t| t.format("%H:%M").to_string()),
            class_section: student.class_section,
            picture_url: student.picture_url,
            status,
            payment_history: student
                .payment_history
                .into_iter()
                .map(PaymentResponse::from)
                .collect(),
        }
    }
}
