use std::collections::HashSet;

use crate::access::{with_store_timeout, AccessStore};
use crate::core::AppError;
use crate::models::enrollments::{EnrollmentOutcome, EnrollmentSource};
use crate::models::users::RequestUser;

/// Idempotent enrollment. Double-clicked buy buttons and retried requests
/// are a normal race: an existing active row is a success with
/// `created = false`, never an error and never a duplicate row.
///
/// The check-then-insert sequence is race-safe within one process; the
/// store schema must carry a unique index on active (user_id, course_id)
/// to hold the at-most-one-active-row invariant across processes.
#[tracing::instrument(name = "Enroll user", skip(store))]
pub async fn enroll(
    store: &dyn AccessStore,
    user_id: i32,
    course_id: i32,
    source: EnrollmentSource,
) -> Result<EnrollmentOutcome, AppError> {
    if let Some(existing) =
        with_store_timeout(store.lookup_active_enrollment(user_id, course_id)).await?
    {
        tracing::info!(
            user_id,
            course_id,
            enrollment_id = existing.id,
            "already enrolled; treating as success"
        );
        return Ok(EnrollmentOutcome {
            created: false,
            enrollment_id: existing.id,
        });
    }

    let enrollment = with_store_timeout(store.create_enrollment(user_id, course_id, source))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, course_id, "enrollment write failed");
            AppError::enrollment_write_failed(e)
        })?;

    Ok(EnrollmentOutcome {
        created: true,
        enrollment_id: enrollment.id,
    })
}

/// Enrolls the user into every free course they do not already hold. The
/// delta is inserted as one all-or-nothing batch, so re-running after a
/// failure (or at any later time) enrolls exactly the remainder.
#[tracing::instrument(name = "Auto enroll free courses", skip(store))]
pub async fn auto_enroll_free(
    store: &dyn AccessStore,
    user_id: i32,
) -> Result<Vec<i32>, AppError> {
    let free_courses = with_store_timeout(store.list_free_course_ids()).await?;
    let owned: HashSet<i32> = with_store_timeout(store.enrolled_course_ids(user_id))
        .await?
        .into_iter()
        .collect();

    let delta: Vec<i32> = free_courses
        .into_iter()
        .filter(|course_id| !owned.contains(course_id))
        .collect();

    if delta.is_empty() {
        return Ok(delta);
    }

    with_store_timeout(store.bulk_create_enrollments(
        user_id,
        &delta,
        EnrollmentSource::FreeAuto,
    ))
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "free-course batch enrollment failed");
        AppError::enrollment_write_failed(e)
    })?;

    tracing::info!(user_id, count = delta.len(), "auto-enrolled free courses");
    Ok(delta)
}

/// Admin-forced enrollment. The caller's privilege is re-verified at call
/// time through every layer; the resulting row is marked `admin_grant` so
/// audit can tell it apart from a paid enrollment.
#[tracing::instrument(name = "Admin enroll", skip(store, allowlist))]
pub async fn admin_enroll(
    store: &dyn AccessStore,
    allowlist: &[String],
    admin: &RequestUser,
    student_user_id: i32,
    course_id: i32,
) -> Result<EnrollmentOutcome, AppError> {
    if !super::privileges::verify_privilege(admin, store, allowlist).await {
        return Err(AppError::forbidden_error(
            "You are not allowed to perform this action",
        ));
    }

    tracing::info!(
        admin_id = admin.id,
        student_user_id,
        course_id,
        "admin-forced enrollment"
    );

    enroll(store, student_user_id, course_id, EnrollmentSource::AdminGrant).await
}
