use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum LectureType {
    Video,
    Pdf,
    Dpp,
    Notes,
    Test,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct Lesson {
    pub id: i32,
    pub course_id: i32,
    pub chapter_id: Option<i32>,
    pub title: String,
    // Free-form source string: YouTube/Vimeo/Drive/archive.org/direct file,
    // or a bare YouTube id. Classified at view time, never at write time.
    pub video_url: String,
    pub lecture_type: LectureType,
    pub is_locked: bool,
    pub position: i32,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

/// Catalog view of a lesson. Deliberately excludes `video_url` so listing
/// endpoints can never leak a locked lesson's source string.
#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct LessonSummary {
    pub id: i32,
    pub course_id: i32,
    pub chapter_id: Option<i32>,
    pub title: String,
    pub lecture_type: LectureType,
    pub is_locked: bool,
    pub position: i32,
}
