use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::AppError;
use crate::modules::payments::models::{Payment, PaymentDraft, PaymentRequest};
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::reports::models::RecentPayment;
use crate::modules::reports::services::aggregation;
use crate::modules::students::repositories::StudentRepository;
use crate::modules::students::services::load_students;

/// Number of entries on the "recent payments" card
pub const RECENT_PAYMENTS_LIMIT: usize = 5;

pub struct PaymentService {
    payment_repo: Arc<dyn PaymentRepository>,
    student_repo: Arc<dyn StudentRepository>,
}

impl PaymentService {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository>,
        student_repo: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            payment_repo,
            student_repo,
        }
    }

    /// All payments, newest first
    pub async fn list_payments(&self) -> Result<Vec<Payment>, AppError> {
        self.payment_repo.list().await
    }

    pub async fn add_payment(&self, request: PaymentRequest) -> Result<Payment, AppError> {
        let draft = PaymentDraft::try_from(request)?;
        self.ensure_student(&draft.student_id).await?;

        let payment = draft.into_payment(Uuid::new_v4().to_string());
        self.payment_repo.create(&payment).await?;

        tracing::info!(
            id = %payment.id,
            student_id = %payment.student_id,
            amount = %payment.amount,
            method = %payment.method,
            "Payment recorded"
        );

        Ok(payment)
    }

    pub async fn update_payment(
        &self,
        id: &str,
        request: PaymentRequest,
    ) -> Result<Payment, AppError> {
        let draft = PaymentDraft::try_from(request)?;
        if self.payment_repo.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(format!("Payment {} not found", id)));
        }
        self.ensure_student(&draft.student_id).await?;

        let payment = draft.into_payment(id.to_string());
        self.payment_repo.update(&payment).await?;

        tracing::info!(id = %payment.id, "Payment updated");

        Ok(payment)
    }

    pub async fn delete_payment(&self, id: &str) -> Result<(), AppError> {
        if !self.payment_repo.delete(id).await? {
            return Err(AppError::not_found(format!("Payment {} not found", id)));
        }

        tracing::info!(id = %id, "Payment deleted");
        Ok(())
    }

    pub async fn recent_payments(&self) -> Result<Vec<RecentPayment>, AppError> {
        let students = load_students(self.student_repo.as_ref(), self.payment_repo.as_ref()).await?;
        Ok(aggregation::recent_payments(&students, RECENT_PAYMENTS_LIMIT))
    }

    async fn ensure_student(&self, student_id: &str) -> Result<(), AppError> {
        match self.student_repo.find_by_id(student_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(format!(
                "Student {} not found",
                student_id
            ))),
        }
    }
}
