pub mod enrollment;
pub mod policy;
pub mod privileges;

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::core::AppError;
use crate::models::enrollments::{Enrollment, EnrollmentSource};
use crate::models::users::Role;

/// Bounded timeout applied to every call that crosses the store boundary.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Boundary to the enrollment/role store. The store owns this data
/// exclusively; decisions re-query it every time instead of trusting a
/// long-lived cache, so a concurrent revocation takes effect on the next
/// request.
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// Role from the users table. Authoritative, independent of any token
    /// claim or cached profile.
    async fn authoritative_role(&self, user_id: i32) -> Result<Option<Role>, AppError>;

    /// Independent grant lookup from the role-grants table. Must agree with
    /// `authoritative_role` before any privileged path is taken.
    async fn role_grant(&self, user_id: i32) -> Result<Option<Role>, AppError>;

    async fn lookup_active_enrollment(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> Result<Option<Enrollment>, AppError>;

    async fn list_free_course_ids(&self) -> Result<Vec<i32>, AppError>;

    async fn enrolled_course_ids(&self, user_id: i32) -> Result<Vec<i32>, AppError>;

    async fn create_enrollment(
        &self,
        user_id: i32,
        course_id: i32,
        source: EnrollmentSource,
    ) -> Result<Enrollment, AppError>;

    /// All-or-nothing batch insert. A partial failure must leave no rows
    /// behind; the caller retries wholesale.
    async fn bulk_create_enrollments(
        &self,
        user_id: i32,
        course_ids: &[i32],
        source: EnrollmentSource,
    ) -> Result<(), AppError>;
}

pub(crate) async fn with_store_timeout<T, F>(fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::internal_error("Store call timed out")),
    }
}

#[cfg(test)]
pub(crate) mod test_store {
    use super::*;
    use crate::models::enrollments::EnrollmentStatus;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Mutex;

    /// In-memory store double for engine tests. `fail_lookups` /
    /// `fail_writes` simulate an unreachable store.
    #[derive(Default)]
    pub struct MemoryStore {
        pub roles: Mutex<HashMap<i32, Role>>,
        pub grants: Mutex<HashMap<i32, Role>>,
        pub enrollments: Mutex<Vec<Enrollment>>,
        pub free_courses: Mutex<Vec<i32>>,
        pub fail_lookups: bool,
        pub fail_writes: bool,
        pub next_id: AtomicI32,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self {
                next_id: AtomicI32::new(1),
                ..Default::default()
            }
        }

        pub fn with_role(self, user_id: i32, role: Role) -> Self {
            self.roles.lock().unwrap().insert(user_id, role);
            self
        }

        pub fn with_grant(self, user_id: i32, role: Role) -> Self {
            self.grants.lock().unwrap().insert(user_id, role);
            self
        }

        pub fn with_free_courses(self, ids: &[i32]) -> Self {
            self.free_courses.lock().unwrap().extend_from_slice(ids);
            self
        }

        pub fn with_active_enrollment(self, user_id: i32, course_id: i32) -> Self {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.enrollments.lock().unwrap().push(Enrollment {
                id,
                user_id,
                course_id,
                status: EnrollmentStatus::Active,
                source: EnrollmentSource::Paid,
                purchased_at: chrono::Utc::now().naive_utc(),
            });
            self
        }

        pub fn active_rows(&self, user_id: i32, course_id: i32) -> usize {
            self.enrollments
                .lock()
                .unwrap()
                .iter()
                .filter(|e| {
                    e.user_id == user_id && e.course_id == course_id && e.is_active()
                })
                .count()
        }
    }

    #[async_trait]
    impl AccessStore for MemoryStore {
        async fn authoritative_role(&self, user_id: i32) -> Result<Option<Role>, AppError> {
            if self.fail_lookups {
                return Err(AppError::db_error("store unreachable"));
            }
            Ok(self.roles.lock().unwrap().get(&user_id).copied())
        }

        async fn role_grant(&self, user_id: i32) -> Result<Option<Role>, AppError> {
            if self.fail_lookups {
                return Err(AppError::db_error("store unreachable"));
            }
            Ok(self.grants.lock().unwrap().get(&user_id).copied())
        }

        async fn lookup_active_enrollment(
            &self,
            user_id: i32,
            course_id: i32,
        ) -> Result<Option<Enrollment>, AppError> {
            if self.fail_lookups {
                return Err(AppError::db_error("store unreachable"));
            }
            Ok(self
                .enrollments
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.user_id == user_id && e.course_id == course_id && e.is_active())
                .cloned())
        }

        async fn list_free_course_ids(&self) -> Result<Vec<i32>, AppError> {
            if self.fail_lookups {
                return Err(AppError::db_error("store unreachable"));
            }
            Ok(self.free_courses.lock().unwrap().clone())
        }

        async fn enrolled_course_ids(&self, user_id: i32) -> Result<Vec<i32>, AppError> {
            if self.fail_lookups {
                return Err(AppError::db_error("store unreachable"));
            }
            Ok(self
                .enrollments
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.user_id == user_id && e.is_active())
                .map(|e| e.course_id)
                .collect())
        }

        async fn create_enrollment(
            &self,
            user_id: i32,
            course_id: i32,
            source: EnrollmentSource,
        ) -> Result<Enrollment, AppError> {
            if self.fail_writes {
                return Err(AppError::db_error("store unreachable"));
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let enrollment = Enrollment {
                id,
                user_id,
                course_id,
                status: EnrollmentStatus::Active,
                source,
                purchased_at: chrono::Utc::now().naive_utc(),
            };
            self.enrollments.lock().unwrap().push(enrollment.clone());
            Ok(enrollment)
        }

        async fn bulk_create_enrollments(
            &self,
            user_id: i32,
            course_ids: &[i32],
            source: EnrollmentSource,
        ) -> Result<(), AppError> {
            if self.fail_writes {
                // All-or-nothing: no partial batch on failure.
                return Err(AppError::db_error("store unreachable"));
            }
            for &course_id in course_ids {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                self.enrollments.lock().unwrap().push(Enrollment {
                    id,
                    user_id,
                    course_id,
                    status: EnrollmentStatus::Active,
                    source,
                    purchased_at: chrono::Utc::now().naive_utc(),
                });
            }
            Ok(())
        }
    }
}
