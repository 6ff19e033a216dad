use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Cancelled,
}

/// How the enrollment came to exist. `AdminGrant` rows bypass commercial
/// gating and are logged distinctly for audit.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentSource {
    Paid,
    FreeAuto,
    AdminGrant,
}

#[derive(Debug, sqlx::FromRow, Serialize, Clone)]
pub struct Enrollment {
    pub id: i32,
    pub user_id: i32,
    pub course_id: i32,
    pub status: EnrollmentStatus,
    pub source: EnrollmentSource,
    pub purchased_at: chrono::NaiveDateTime,
}

impl Enrollment {
    pub fn is_active(&self) -> bool {
        // Any status other than active means "no grant". Finer-grained
        // statuses (pending, expired) are not modelled.
        self.status == EnrollmentStatus::Active
    }
}

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub course_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct AdminEnrollRequest {
    /// Defaults to the calling admin when absent.
    pub user_id: Option<i32>,
    pub course_id: i32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EnrollmentOutcome {
    pub created: bool,
    pub enrollment_id: i32,
}

#[derive(Debug, Serialize)]
pub struct AutoEnrollOutcome {
    pub enrolled_course_ids: Vec<i32>,
}
