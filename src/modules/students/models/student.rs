// Record model for enrolled students.
//
// Status is derived against a reference date, never stored. Every service
// passes the business "today" from `BusinessClock` so tests can pin it.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::DataError;
use crate::modules::payments::models::{Payment, PaymentMethod};

/// The three class offerings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassType {
    #[serde(rename = "Ho'oponopo")]
    Hooponopono,
    Astrology,
    Pooja,
}

impl ClassType {
    pub const ALL: [ClassType; 3] = [ClassType::Hooponopono, ClassType::Astrology, ClassType::Pooja];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassType::Hooponopono => "Ho'oponopo",
            ClassType::Astrology => "Astrology",
            ClassType::Pooja => "Pooja",
        }
    }
}

impl std::fmt::Display for ClassType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClassType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClassType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DataError::UnknownClassType(s.to_string()))
    }
}

/// Enrollment status relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Upcoming,
    Completed,
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentStatus::Active => write!(f, "active"),
            StudentStatus::Upcoming => write!(f, "upcoming"),
            StudentStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    /// Record id (UUID)
    pub id: String,
    /// Business identifier shown on the roster, not unique
    pub student_id: String,
    pub name: String,
    /// Display ordering only
    pub serial_number: i32,
    pub start_date: NaiveDate,
    /// `None` means the enrollment is ongoing
    pub end_date: Option<NaiveDate>,
    /// Initial fee, separate from `payment_history`
    pub payment: Decimal,
    pub payment_method: PaymentMethod,
    pub class_type: ClassType,
    pub class_time: Option<NaiveTime>,
    pub class_section: Option<String>,
    pub picture_url: Option<String>,
    /// Newest first
    pub payment_history: Vec<Payment>,
}

impl Student {
    /// Started on or before `today` and not yet ended
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.start_date <= today && self.end_date.map_or(true, |end| end >= today)
    }

    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.start_date > today
    }

    pub fn status(&self, today: NaiveDate) -> StudentStatus {
        if self.is_active(today) {
            StudentStatus::Active
        } else if self.is_upcoming(today) {
            StudentStatus::Upcoming
        } else {
            StudentStatus::Completed
        }
    }

    /// Initial fee plus every recorded payment
    pub fn total_paid(&self) -> Decimal {
        self.payment
            + self
                .payment_history
                .iter()
                .filter(|p| p.student_id == self.id)
                .map(|p| p.amount)
                .sum::<Decimal>()
    }
}
