use serde::Serialize;

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    // NULL or 0 means the course is free
    pub price: Option<f64>,
    pub thumbnail_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Course {
    pub fn is_free(&self) -> bool {
        match self.price {
            None => true,
            Some(p) => p == 0.0,
        }
    }
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct Chapter {
    pub id: i32,
    pub course_id: i32,
    pub title: String,
    pub position: i32,
}

#[derive(Serialize)]
pub struct CourseDetails {
    pub course: Course,
    pub chapters: Vec<Chapter>,
    pub lessons: Vec<crate::models::lessons::LessonSummary>,
}
