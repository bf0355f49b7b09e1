use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::calendar::parse_date;
use crate::core::currency::validate_amount;
use crate::core::{AppError, DataError};

/// Settlement channel of a fee or payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "UPI")]
    Upi,
    Check,
    Other,
}

impl PaymentMethod {
    /// Declaration order, used for every per-method breakdown
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::BankTransfer,
        PaymentMethod::Upi,
        PaymentMethod::Check,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Check => "Check",
            PaymentMethod::Other => "Other",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| DataError::UnknownPaymentMethod(s.to_string()))
    }
}

/// A payment recorded against one student
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: String,
    /// Owning student's record id (`Student::id`, not the business id)
    pub student_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub method: PaymentMethod,
}

/// Validated payment fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub student_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub method: PaymentMethod,
}

impl PaymentDraft {
    pub fn into_payment(self, id: String) -> Payment {
        Payment {
            id,
            student_id: self.student_id,
            amount: self.amount,
            date: self.date,
            method: self.method,
        }
    }
}

/// `payments` table row
#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub id: String,
    pub student_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub method: String,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DataError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            method: row.method.parse()?,
            id: row.id,
            student_id: row.student_id,
            amount: row.amount,
            date: row.date,
        })
    }
}

/// Request body for POST /payments and PUT /payments/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub student_id: String,
    pub amount: Decimal,
    pub date: String,
    pub method: String,
}

impl TryFrom<PaymentRequest> for PaymentDraft {
    type Error = AppError;

    fn try_from(request: PaymentRequest) -> Result<Self, Self::Error> {
        if request.student_id.trim().is_empty() {
            return Err(AppError::validation("student_id is required"));
        }
        validate_amount(request.amount).map_err(AppError::Validation)?;

        Ok(PaymentDraft {
            date: parse_date("date", &request.date)?,
            method: request.method.parse()?,
            student_id: request.student_id,
            amount: request.amount,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub student_id: String,
    pub amount: String,
    pub date: String,
    pub method: PaymentMethod,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            student_id: payment.student_id,
            amount: payment.amount.to_string(),
            date: payment.date.format("%Y-%m-%d").to_string(),
            method: payment.method,
        }
    }
}
