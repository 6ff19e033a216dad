use crate::core::AppError;
use crate::models::enrollments::{Enrollment, EnrollmentSource};
use chrono::Utc;
use sqlx::MySqlPool;

const ENROLLMENT_COLUMNS: &str = "id, user_id, course_id, status, source, purchased_at";

pub async fn fetch_active_enrollment(
    pool: &MySqlPool,
    user_id: i32,
    course_id: i32,
) -> Result<Option<Enrollment>, AppError> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {} FROM tbl_enrollments \
         WHERE user_id = ? AND course_id = ? AND status = 'active'",
        ENROLLMENT_COLUMNS
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::db_error)
}

pub async fn fetch_enrollment_by_id(
    pool: &MySqlPool,
    enrollment_id: i32,
) -> Result<Enrollment, AppError> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {} FROM tbl_enrollments WHERE id = ?",
        ENROLLMENT_COLUMNS
    ))
    .bind(enrollment_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::db_error)?
    .ok_or_else(|| AppError::not_found("Enrollment not found"))
}

pub async fn fetch_user_enrollments(
    pool: &MySqlPool,
    user_id: i32,
) -> Result<Vec<Enrollment>, AppError> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {} FROM tbl_enrollments WHERE user_id = ? ORDER BY purchased_at DESC",
        ENROLLMENT_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)
}

pub async fn fetch_enrolled_course_ids(
    pool: &MySqlPool,
    user_id: i32,
) -> Result<Vec<i32>, AppError> {
    sqlx::query_scalar::<_, i32>(
        "SELECT course_id FROM tbl_enrollments WHERE user_id = ? AND status = 'active'",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)
}

pub async fn insert_enrollment(
    pool: &MySqlPool,
    user_id: i32,
    course_id: i32,
    source: EnrollmentSource,
) -> Result<Enrollment, AppError> {
    let now = Utc::now().naive_utc();

    let result = sqlx::query(
        "INSERT INTO tbl_enrollments (user_id, course_id, status, source, purchased_at) \
         VALUES (?, ?, 'active', ?, ?)",
    )
    .bind(user_id)
    .bind(course_id)
    .bind(source)
    .bind(now)
    .execute(pool)
    .await
    .map_err(AppError::db_error)?;

    let enrollment_id = i32::try_from(result.last_insert_id())
        .map_err(|_| AppError::internal_error("Inserted enrollment id out of range"))?;

    fetch_enrollment_by_id(pool, enrollment_id).await
}

/// Batch insert inside a single transaction: either every row of the delta
/// lands or none does. A retry after failure recomputes the delta and skips
/// rows that already exist.
pub async fn bulk_insert_enrollments(
    pool: &MySqlPool,
    user_id: i32,
    course_ids: &[i32],
    source: EnrollmentSource,
) -> Result<(), AppError> {
    if course_ids.is_empty() {
        return Ok(());
    }

    let now = Utc::now().naive_utc();
    let mut tx = pool.begin().await.map_err(AppError::db_error)?;

    for &course_id in course_ids {
        sqlx::query(
            "INSERT INTO tbl_enrollments (user_id, course_id, status, source, purchased_at) \
             VALUES (?, ?, 'active', ?, ?)",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(source)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(AppError::db_error)?;
    }

    tx.commit().await.map_err(AppError::db_error)?;

    Ok(())
}

/// Rows are never deleted; cancellation is a status transition.
pub async fn cancel_enrollment(
    pool: &MySqlPool,
    enrollment_id: i32,
    user_id: i32,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE tbl_enrollments SET status = 'cancelled' WHERE id = ? AND user_id = ?",
    )
    .bind(enrollment_id)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(AppError::db_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Enrollment not found"));
    }

    Ok(())
}
