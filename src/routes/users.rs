use actix_web::{
    get, post,
    web::{self},
    HttpResponse, Responder,
};
use sqlx::MySqlPool;
use tracing::instrument;
use validator::Validate;

use crate::{
    access::privileges::verify_privilege,
    core::{
        jwt_auth::{generate_token, JwtMiddleware},
        AppConfig, AppError, AppSuccessResponse,
    },
    db::{self, MySqlAccessStore},
    models::users::{LoginRequest, LoginResponse, RegisterRequest, SetRoleRequest},
};

#[instrument(name = "Register User", skip(pool, request))]
#[post("/register")]
pub async fn register(
    pool: web::Data<MySqlPool>,
    request: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let request = request.into_inner();
    request.validate().map_err(AppError::validation_error)?;

    let user = db::users::create_user(pool.get_ref(), &request).await?;

    Ok(HttpResponse::Created().json(AppSuccessResponse {
        success: true,
        message: "Account created successfully".to_string(),
        data: user,
    }))
}

#[instrument(name = "Login", skip(pool, config, request))]
#[post("/login")]
pub async fn login(
    pool: web::Data<MySqlPool>,
    config: web::Data<AppConfig>,
    request: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let request = request.into_inner();

    let user = db::users::get_user_by_email(pool.get_ref(), &request.email)
        .await
        .map_err(|_| AppError::unauthorized("Invalid login credentials"))?;

    if !bcrypt::verify(&request.password, &user.password)? {
        return Err(AppError::unauthorized("Invalid login credentials"));
    }

    let token = generate_token(&user, config.get_ref())?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Login successful".to_string(),
        data: LoginResponse {
            token,
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
    }))
}

#[instrument(name = "Get Profile", skip(pool))]
#[get("/profile")]
pub async fn get_profile(
    pool: web::Data<MySqlPool>,
    auth: JwtMiddleware,
) -> Result<impl Responder, AppError> {
    let user = db::users::get_user_by_id(pool.get_ref(), auth.user_id).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Profile retrieved successfully".to_string(),
        data: user,
    }))
}

/// Role mutation keeps both verification layers in sync and is itself gated
/// behind the full privilege check.
#[instrument(name = "Set Role", skip(pool, config))]
#[post("/role")]
pub async fn set_role(
    pool: web::Data<MySqlPool>,
    config: web::Data<AppConfig>,
    auth: JwtMiddleware,
    request: web::Json<SetRoleRequest>,
) -> Result<impl Responder, AppError> {
    let store = MySqlAccessStore::new(pool.get_ref().clone());

    if !verify_privilege(
        &auth.request_user(),
        &store,
        &config.admin.allowlist_emails,
    )
    .await
    {
        return Err(AppError::forbidden_error(
            "You are not allowed to perform this action",
        ));
    }

    let request = request.into_inner();
    db::users::set_role(pool.get_ref(), request.user_id, request.role).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Role updated successfully".to_string(),
        data: (),
    }))
}
