pub mod courses;
pub mod enrollments;
pub mod lessons;
pub mod users;

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::access::AccessStore;
use crate::core::AppError;
use crate::models::enrollments::{Enrollment, EnrollmentSource};
use crate::models::users::Role;

/// Production store boundary, backed by the MySQL pool.
#[derive(Clone)]
pub struct MySqlAccessStore {
    pool: MySqlPool,
}

impl MySqlAccessStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlAccessStore { pool }
    }
}

#[async_trait]
impl AccessStore for MySqlAccessStore {
    async fn authoritative_role(&self, user_id: i32) -> Result<Option<Role>, AppError> {
        users::fetch_role(&self.pool, user_id).await
    }

    async fn role_grant(&self, user_id: i32) -> Result<Option<Role>, AppError> {
        users::fetch_role_grant(&self.pool, user_id).await
    }

    async fn lookup_active_enrollment(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> Result<Option<Enrollment>, AppError> {
        enrollments::fetch_active_enrollment(&self.pool, user_id, course_id).await
    }

    async fn list_free_course_ids(&self) -> Result<Vec<i32>, AppError> {
        courses::fetch_free_course_ids(&self.pool).await
    }

    async fn enrolled_course_ids(&self, user_id: i32) -> Result<Vec<i32>, AppError> {
        enrollments::fetch_enrolled_course_ids(&self.pool, user_id).await
    }

    async fn create_enrollment(
        &self,
        user_id: i32,
        course_id: i32,
        source: EnrollmentSource,
    ) -> Result<Enrollment, AppError> {
        enrollments::insert_enrollment(&self.pool, user_id, course_id, source).await
    }

    async fn bulk_create_enrollments(
        &self,
        user_id: i32,
        course_ids: &[i32],
        source: EnrollmentSource,
    ) -> Result<(), AppError> {
        enrollments::bulk_insert_enrollments(&self.pool, user_id, course_ids, source).await
    }
}
