use crate::core::AppError;
use crate::models::lessons::Lesson;
use sqlx::MySqlPool;

pub async fn fetch_lesson(pool: &MySqlPool, lesson_id: i32) -> Result<Lesson, AppError> {
    sqlx::query_as::<_, Lesson>(
        "SELECT id, course_id, chapter_id, title, video_url, lecture_type, is_locked, \
                position, created_at, updated_at \
         FROM tbl_lessons WHERE id = ?",
    )
    .bind(lesson_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::db_error)?
    .ok_or_else(|| AppError::not_found("Lesson not found"))
}
