use crate::access::{with_store_timeout, AccessStore};
use crate::models::content::AccessDecision;
use crate::models::lessons::Lesson;
use crate::models::users::RequestUser;

/// Generic message shown when an access check cannot be completed. Internal
/// error detail never reaches the denied user.
pub const ACCESS_CHECK_FAILED_MESSAGE: &str = "Unable to verify access, please retry";

/// The gating facts of a content item, detached from the full lesson row so
/// the engine can be driven from any call site (page, modal, table row).
#[derive(Debug, Clone, Copy)]
pub struct ContentGate {
    pub is_locked: bool,
    pub course_id: i32,
}

impl From<&Lesson> for ContentGate {
    fn from(lesson: &Lesson) -> Self {
        ContentGate {
            is_locked: lesson.is_locked,
            course_id: lesson.course_id,
        }
    }
}

/// Computes the access decision for a (user, content) pair.
///
/// Rules run in order and the first match decides:
/// 1. unlocked content is visible to everyone, including anonymous users;
/// 2. anonymous users see locked content as locked;
/// 3. a verified admin/teacher bypasses enrollment (logged distinctly);
/// 4. an active enrollment grants access;
/// 5. otherwise locked.
///
/// The privilege check re-verifies against the store at decision time; a
/// token claim or cached profile is never enough. Store failures and
/// timeouts fail closed to `Locked`.
#[tracing::instrument(name = "Access decision", skip(user, store, allowlist), fields(course_id = content.course_id))]
pub async fn decide(
    user: Option<&RequestUser>,
    content: &ContentGate,
    store: &dyn AccessStore,
    allowlist: &[String],
) -> AccessDecision {
    if !content.is_locked {
        return AccessDecision::Granted;
    }

    let user = match user {
        Some(user) => user,
        None => return AccessDecision::Locked,
    };

    if super::privileges::verify_privilege(user, store, allowlist).await {
        return AccessDecision::AdminOverride;
    }

    match with_store_timeout(store.lookup_active_enrollment(user.id, content.course_id)).await {
        Ok(Some(enrollment)) if enrollment.is_active() => AccessDecision::Granted,
        Ok(_) => AccessDecision::Locked,
        Err(e) => {
            tracing::error!(
                error = %e,
                user_id = user.id,
                course_id = content.course_id,
                "enrollment lookup failed; failing closed"
            );
            AccessDecision::Locked
        }
    }
}
