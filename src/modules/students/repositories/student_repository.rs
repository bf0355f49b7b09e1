use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::error::AppError;
use crate::modules::students::models::{Student, StudentRow};

const STUDENT_COLUMNS: &str = "id, student_id, name, serial_number, start_date, end_date, \
     payment, payment_method, class_type, class_time, class_section, picture_url";

/// Persistence for student records.
///
/// Rows come back without payment history; the service attaches it.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// All students, `serial_number` ascending
    async fn list(&self) -> Result<Vec<StudentRow>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<StudentRow>, AppError>;

    async fn create(&self, student: &Student) -> Result<(), AppError>;

    /// Returns false when no row matched
    async fn update(&self, student: &Student) -> Result<bool, AppError>;
}

pub struct MySqlStudentRepository {
    pool: MySqlPool,
}

impl MySqlStudentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn class_time_column(student: &Student) -> Option<String> {
    student.class_time.map(|t| t.format("%H:%M:%S").to_string())
}

#[async_trait]
impl StudentRepository for MySqlStudentRepository {
    async fn list(&self) -> Result<Vec<StudentRow>, AppError> {
        let rows = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {} FROM students ORDER BY serial_number ASC",
            STUDENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StudentRow>, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {} FROM students WHERE id = ?",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, student: &Student) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO students (
                id, student_id, name, serial_number, start_date, end_date,
                payment, payment_method, class_type, class_time, class_section, picture_url
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&student.id)
        .bind(&student.student_id)
        .bind(&student.name)
        .bind(student.serial_number)
        .bind(student.start_date)
        .bind(student.end_date)
        .bind(student.payment)
        .bind(student.payment_method.as_str())
        .bind(student.class_type.as_str())
        .bind(class_time_column(student))
        .bind(&student.class_section)
        .bind(&student.picture_url)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create student: {}", e)))?;

        Ok(())
    }

    async fn update(&self, student: &Student) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET student_id = ?, name = ?, serial_number = ?, start_date = ?, end_date = ?,
                payment = ?, payment_method = ?, class_type = ?, class_time = ?,
                class_section = ?, picture_url = ?
            WHERE id = ?
            "#,
        )
        .bind(&student.student_id)
        .bind(&student.name)
        .bind(student.serial_number)
        .bind(student.start_date)
        .bind(student.end_date)
        .bind(student.payment)
        .bind(student.payment_method.as_str())
        .bind(student.class_type.as_str())
        .bind(class_time_column(student))
        .bind(&student.class_section)
        .bind(&student.picture_url)
        .bind(&student.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update student: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
