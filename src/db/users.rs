use crate::core::AppError;
use crate::models::users::{RegisterRequest, Role, User};
use chrono::Utc;
use sqlx::MySqlPool;

const USER_COLUMNS: &str =
    "id, name, email, password, role, status, created_at, updated_at";

pub async fn create_user(pool: &MySqlPool, request: &RegisterRequest) -> Result<User, AppError> {
    let now = Utc::now().naive_utc();

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;

    // Role is always student at signup; promotion is a separate privileged
    // action.
    let result = sqlx::query(
        "INSERT INTO tbl_users (name, email, password, role, status, created_at, updated_at) \
         VALUES (?, ?, ?, 'student', 1, ?, ?)",
    )
    .bind(&request.name)
    .bind(&request.email)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(AppError::db_error)?;

    let user_id = i32::try_from(result.last_insert_id())
        .map_err(|_| AppError::internal_error("Inserted user id out of range"))?;

    get_user_by_id(pool, user_id).await
}

pub async fn get_user_by_email(pool: &MySqlPool, email: &str) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM tbl_users WHERE email = ? AND status = 1",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(AppError::db_error)
}

pub async fn get_user_by_id(pool: &MySqlPool, user_id: i32) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM tbl_users WHERE id = ? AND status = 1",
        USER_COLUMNS
    ))
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(AppError::db_error)
}

/// Authoritative role lookup, independent of any token claim.
pub async fn fetch_role(pool: &MySqlPool, user_id: i32) -> Result<Option<Role>, AppError> {
    sqlx::query_scalar::<_, Role>("SELECT role FROM tbl_users WHERE id = ? AND status = 1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::db_error)
}

/// Second verification layer: the role-grants table, maintained alongside
/// the users table but queried independently.
pub async fn fetch_role_grant(pool: &MySqlPool, user_id: i32) -> Result<Option<Role>, AppError> {
    sqlx::query_scalar::<_, Role>("SELECT role FROM tbl_role_grants WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::db_error)
}

/// Updates both role layers in one transaction so they cannot drift.
pub async fn set_role(pool: &MySqlPool, user_id: i32, role: Role) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();
    let mut tx = pool.begin().await.map_err(AppError::db_error)?;

    let updated = sqlx::query("UPDATE tbl_users SET role = ?, updated_at = ? WHERE id = ?")
        .bind(role)
        .bind(now)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::db_error)?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("User not found"));
    }

    sqlx::query("REPLACE INTO tbl_role_grants (user_id, role) VALUES (?, ?)")
        .bind(user_id)
        .bind(role)
        .execute(&mut *tx)
        .await
        .map_err(AppError::db_error)?;

    tx.commit().await.map_err(AppError::db_error)?;

    Ok(())
}
