use actix_web::{
    get,
    web::{self},
    HttpResponse, Responder,
};
use sqlx::MySqlPool;
use tracing::instrument;

use crate::{
    core::{AppError, AppSuccessResponse},
    db,
    models::courses::CourseDetails,
};

#[instrument(name = "Get Courses", skip(pool))]
#[get("")]
pub async fn get_courses(pool: web::Data<MySqlPool>) -> Result<impl Responder, AppError> {
    let courses = db::courses::fetch_courses(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Courses retrieved successfully".to_string(),
        data: courses,
    }))
}

/// Catalog view: chapters and lesson summaries with lock flags, but no
/// source strings. Those only leave through the lesson view flow, behind
/// the access decision.
#[instrument(name = "Get Course Details", skip(pool))]
#[get("/{course_id}")]
pub async fn get_course_details(
    pool: web::Data<MySqlPool>,
    course_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let course_id = course_id.into_inner();

    let course = db::courses::fetch_course(pool.get_ref(), course_id).await?;
    let chapters = db::courses::fetch_chapters(pool.get_ref(), course_id).await?;
    let lessons = db::courses::fetch_course_lessons(pool.get_ref(), course_id).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Course retrieved successfully".to_string(),
        data: CourseDetails {
            course,
            chapters,
            lessons,
        },
    }))
}

#[instrument(name = "Get Course Lessons", skip(pool))]
#[get("/{course_id}/lessons")]
pub async fn get_course_lessons(
    pool: web::Data<MySqlPool>,
    course_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let lessons =
        db::courses::fetch_course_lessons(pool.get_ref(), course_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Lessons retrieved successfully".to_string(),
        data: lessons,
    }))
}
