use actix_web::{
    get, post,
    web::{self},
    HttpResponse, Responder,
};
use sqlx::MySqlPool;
use tracing::instrument;

use crate::{
    access::enrollment,
    core::{jwt_auth::JwtMiddleware, AppConfig, AppError, AppSuccessResponse},
    db::{self, MySqlAccessStore},
    models::enrollments::{
        AdminEnrollRequest, AutoEnrollOutcome, EnrollRequest, EnrollmentSource,
    },
};

/// Self-enrollment, invoked once the purchase flow reports approval (payment
/// itself is handled outside this service; only its effect lands here).
/// Idempotent: a duplicate attempt answers with the existing enrollment.
#[instrument(name = "Enroll in Course", skip(pool))]
#[post("")]
pub async fn enroll(
    pool: web::Data<MySqlPool>,
    auth: JwtMiddleware,
    request: web::Json<EnrollRequest>,
) -> Result<impl Responder, AppError> {
    let course_id = request.into_inner().course_id;
    let course = db::courses::fetch_course(pool.get_ref(), course_id).await?;

    let source = if course.is_free() {
        EnrollmentSource::FreeAuto
    } else {
        EnrollmentSource::Paid
    };

    let store = MySqlAccessStore::new(pool.get_ref().clone());
    let outcome = enrollment::enroll(&store, auth.user_id, course_id, source).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: if outcome.created {
            "Enrolled successfully".to_string()
        } else {
            "Already enrolled".to_string()
        },
        data: outcome,
    }))
}

#[instrument(name = "Auto Enroll Free Courses", skip(pool))]
#[post("/auto-free")]
pub async fn auto_enroll_free(
    pool: web::Data<MySqlPool>,
    auth: JwtMiddleware,
) -> Result<impl Responder, AppError> {
    let store = MySqlAccessStore::new(pool.get_ref().clone());
    let enrolled_course_ids = enrollment::auto_enroll_free(&store, auth.user_id).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Free courses enrolled".to_string(),
        data: AutoEnrollOutcome { enrolled_course_ids },
    }))
}

/// Bypass-enrollment for admins and teachers. Privilege is re-verified
/// against the store inside the coordinator, not taken from the token.
#[instrument(name = "Admin Enroll", skip(pool, config))]
#[post("/admin")]
pub async fn admin_enroll(
    pool: web::Data<MySqlPool>,
    config: web::Data<AppConfig>,
    auth: JwtMiddleware,
    request: web::Json<AdminEnrollRequest>,
) -> Result<impl Responder, AppError> {
    let request = request.into_inner();
    let student_user_id = request.user_id.unwrap_or(auth.user_id);

    let store = MySqlAccessStore::new(pool.get_ref().clone());
    let outcome = enrollment::admin_enroll(
        &store,
        &config.admin.allowlist_emails,
        &auth.request_user(),
        student_user_id,
        request.course_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Enrollment granted".to_string(),
        data: outcome,
    }))
}

#[instrument(name = "My Enrollments", skip(pool))]
#[get("/mine")]
pub async fn my_enrollments(
    pool: web::Data<MySqlPool>,
    auth: JwtMiddleware,
) -> Result<impl Responder, AppError> {
    let enrollments = db::enrollments::fetch_user_enrollments(pool.get_ref(), auth.user_id).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Enrollments retrieved successfully".to_string(),
        data: enrollments,
    }))
}

#[instrument(name = "Cancel Enrollment", skip(pool))]
#[post("/{enrollment_id}/cancel")]
pub async fn cancel_enrollment(
    pool: web::Data<MySqlPool>,
    auth: JwtMiddleware,
    enrollment_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    db::enrollments::cancel_enrollment(pool.get_ref(), enrollment_id.into_inner(), auth.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Enrollment cancelled".to_string(),
        data: (),
    }))
}
