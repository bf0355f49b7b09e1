use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::calendar::BusinessClock;
use crate::core::error::AppError;
use crate::modules::payments::models::Payment;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::students::models::{Student, StudentDraft, StudentRequest, StudentRow};
use crate::modules::students::repositories::StudentRepository;

use super::roster::{self, ActiveSummary, RosterFile, RosterFilter, RosterPeriod};
use super::schedule::{self, ScheduleSlot};

/// Loads every student with its payment history attached.
///
/// Students come back in `serial_number` order and each history stays newest
/// first. Payments whose student is not in the batch are dropped.
pub async fn load_students(
    students: &dyn StudentRepository,
    payments: &dyn PaymentRepository,
) -> Result<Vec<Student>, AppError> {
    let rows = students.list().await?;
    let mut by_student: HashMap<String, Vec<Payment>> = HashMap::new();
    for payment in payments.list().await? {
        by_student
            .entry(payment.student_id.clone())
            .or_default()
            .push(payment);
    }

    rows.into_iter()
        .map(|row| attach_history(row, &mut by_student))
        .collect()
}

fn attach_history(
    row: StudentRow,
    by_student: &mut HashMap<String, Vec<Payment>>,
) -> Result<Student, AppError> {
    let history = by_student.remove(&row.id).unwrap_or_default();
    Ok(row.into_student(history)?)
}

/// Student records and the roster views built on them
pub struct StudentService {
    student_repo: Arc<dyn StudentRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    clock: BusinessClock,
}

impl StudentService {
    pub fn new(
        student_repo: Arc<dyn StudentRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        clock: BusinessClock,
    ) -> Self {
        Self {
            student_repo,
            payment_repo,
            clock,
        }
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        load_students(self.student_repo.as_ref(), self.payment_repo.as_ref()).await
    }

    pub async fn get_student(&self, id: &str) -> Result<Student, AppError> {
        let row = self
            .student_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student {} not found", id)))?;
        let history = self.payment_repo.list_for_student(id).await?;

        Ok(row.into_student(history)?)
    }

    pub async fn create_student(&self, request: StudentRequest) -> Result<Student, AppError> {
        let draft = StudentDraft::try_from(request)?;
        let student = draft.into_student(Uuid::new_v4().to_string(), Vec::new());

        self.student_repo.create(&student).await?;

        tracing::info!(
            id = %student.id,
            student_id = %student.student_id,
            class_type = %student.class_type,
            "Student created"
        );

        Ok(student)
    }

    /// Replaces the student's fields; payment history is left untouched
    pub async fn update_student(
        &self,
        id: &str,
        request: StudentRequest,
    ) -> Result<Student, AppError> {
        let draft = StudentDraft::try_from(request)?;
        if self.student_repo.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(format!("Student {} not found", id)));
        }

        let history = self.payment_repo.list_for_student(id).await?;
        let student = draft.into_student(id.to_string(), history);
        self.student_repo.update(&student).await?;

        tracing::info!(id = %student.id, "Student updated");

        Ok(student)
    }

    pub async fn payment_history(&self, id: &str) -> Result<Vec<Payment>, AppError> {
        if self.student_repo.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(format!("Student {} not found", id)));
        }
        self.payment_repo.list_for_student(id).await
    }

    pub async fn roster(&self, filter: &RosterFilter) -> Result<Vec<Student>, AppError> {
        let students = self.list_students().await?;
        Ok(roster::apply(students, filter))
    }

    pub async fn export_roster(
        &self,
        filter: &RosterFilter,
        period: RosterPeriod,
    ) -> Result<RosterFile, AppError> {
        let students = self.roster(filter).await?;
        let file = roster::export_csv(&students, period, self.today())?;

        tracing::info!(
            filename = %file.filename,
            rows = students.len(),
            "Roster exported"
        );

        Ok(file)
    }

    pub async fn active_summary(&self) -> Result<ActiveSummary, AppError> {
        let students = self.list_students().await?;
        Ok(roster::active_summary(&students, self.today()))
    }

    pub async fn schedule(&self) -> Result<Vec<ScheduleSlot>, AppError> {
        let students = self.list_students().await?;
        Ok(schedule::daily_schedule(&students, self.today()))
    }
}
