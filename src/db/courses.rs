use crate::core::AppError;
use crate::models::courses::{Chapter, Course};
use crate::models::lessons::LessonSummary;
use sqlx::MySqlPool;

const COURSE_COLUMNS: &str =
    "id, title, description, price, thumbnail_url, created_at, updated_at";

pub async fn fetch_courses(pool: &MySqlPool) -> Result<Vec<Course>, AppError> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {} FROM tbl_courses ORDER BY created_at DESC",
        COURSE_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)
}

pub async fn fetch_course(pool: &MySqlPool, course_id: i32) -> Result<Course, AppError> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {} FROM tbl_courses WHERE id = ?",
        COURSE_COLUMNS
    ))
    .bind(course_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::db_error)?
    .ok_or_else(|| AppError::not_found("Course not found"))
}

pub async fn fetch_chapters(pool: &MySqlPool, course_id: i32) -> Result<Vec<Chapter>, AppError> {
    sqlx::query_as::<_, Chapter>(
        "SELECT id, course_id, title, position FROM tbl_chapters \
         WHERE course_id = ? ORDER BY position ASC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)
}

/// Catalog listing only: the summary shape has no `video_url`, so locked
/// source strings never travel through listing queries.
pub async fn fetch_course_lessons(
    pool: &MySqlPool,
    course_id: i32,
) -> Result<Vec<LessonSummary>, AppError> {
    sqlx::query_as::<_, LessonSummary>(
        "SELECT id, course_id, chapter_id, title, lecture_type, is_locked, position \
         FROM tbl_lessons WHERE course_id = ? ORDER BY position ASC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)
}

/// NULL price and zero price both mean free.
pub async fn fetch_free_course_ids(pool: &MySqlPool) -> Result<Vec<i32>, AppError> {
    sqlx::query_scalar::<_, i32>(
        "SELECT id FROM tbl_courses WHERE price IS NULL OR price = 0",
    )
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)
}
