use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::error::AppError;
use crate::modules::payments::models::{Payment, PaymentRow};

const PAYMENT_COLUMNS: &str = "id, student_id, amount, date, method";

/// Persistence for payment records
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// All payments, newest `date` first
    async fn list(&self) -> Result<Vec<Payment>, AppError>;

    /// Payments of one student (record id), newest first
    async fn list_for_student(&self, student_id: &str) -> Result<Vec<Payment>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>, AppError>;

    async fn create(&self, payment: &Payment) -> Result<(), AppError>;

    /// Returns false when no row matched
    async fn update(&self, payment: &Payment) -> Result<bool, AppError>;

    /// Returns false when no row matched
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

pub struct MySqlPaymentRepository {
    pool: MySqlPool,
}

impl MySqlPaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn into_payments(rows: Vec<PaymentRow>) -> Result<Vec<Payment>, AppError> {
    rows.into_iter()
        .map(|row| Payment::try_from(row).map_err(AppError::from))
        .collect()
}

#[async_trait]
impl PaymentRepository for MySqlPaymentRepository {
    async fn list(&self) -> Result<Vec<Payment>, AppError> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM payments ORDER BY date DESC, created_at DESC",
            PAYMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        into_payments(rows)
    }

    async fn list_for_student(&self, student_id: &str) -> Result<Vec<Payment>, AppError> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM payments WHERE student_id = ? ORDER BY date DESC, created_at DESC",
            PAYMENT_COLUMNS
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        into_payments(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>, AppError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM payments WHERE id = ?",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Payment::try_from)
            .transpose()
            .map_err(AppError::from)
    }

    async fn create(&self, payment: &Payment) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, student_id, amount, date, method)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.student_id)
        .bind(payment.amount)
        .bind(payment.date)
        .bind(payment.method.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create payment: {}", e)))?;

        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET student_id = ?, amount = ?, date = ?, method = ?
            WHERE id = ?
            "#,
        )
        .bind(&payment.student_id)
        .bind(payment.amount)
        .bind(payment.date)
        .bind(payment.method.as_str())
        .bind(&payment.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update payment: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
