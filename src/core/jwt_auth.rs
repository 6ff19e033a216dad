use actix_web::web::Data;
use actix_web::{dev::Payload, Error as ActixWebError};
use actix_web::{error::ErrorUnauthorized, http, FromRequest, HttpMessage, HttpRequest};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

use crate::core::{AppConfig, AppError};
use crate::models::users::{RequestUser, Role, User};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(&self).unwrap())
    }
}

/// The `role` claim is a display convenience only. Every security-relevant
/// path re-reads the role from the store at decision time.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub sub: String, // user ID
    pub email: String,
    pub role: String,
    pub exp: usize, // expiration time
}

pub fn generate_token(user: &User, config: &AppConfig) -> Result<String, AppError> {
    let expiration =
        Utc::now().timestamp() + config.jwt_auth_config.token_expiration_time;

    let claims = JwtClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_auth_config.secret.expose_secret().as_ref()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to issue token: {}", e)))
}

fn decode_claims(token: &str, config: &AppConfig) -> Option<JwtClaims> {
    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_auth_config.secret.expose_secret().as_ref()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|auth_header| {
            auth_header
                .strip_prefix("Bearer ")
                .map(|token| token.to_string())
        })
}

/// Optional identity extraction for pages that render for anonymous users
/// too (free content is visible without a session).
pub fn maybe_request_user(req: &HttpRequest, config: &AppConfig) -> Option<RequestUser> {
    let token = bearer_token(req)?;
    let claims = decode_claims(&token, config)?;

    Some(RequestUser {
        id: claims.sub.parse().ok()?,
        email: claims.email,
    })
}

#[derive(Debug)]
pub struct JwtMiddleware {
    pub user_id: i32,
    pub claims: JwtClaims,
}

impl JwtMiddleware {
    pub fn request_user(&self) -> RequestUser {
        RequestUser {
            id: self.user_id,
            email: self.claims.email.clone(),
        }
    }

    /// Claimed role, for display only. Never authoritative.
    pub fn claimed_role(&self) -> Option<Role> {
        self.claims.role.parse().ok()
    }
}

impl FromRequest for JwtMiddleware {
    type Error = ActixWebError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let config = match req.app_data::<Data<AppConfig>>() {
            Some(config) => config,
            None => {
                return ready(Err(ErrorUnauthorized(ErrorResponse {
                    message: "Authentication is not configured".to_string(),
                    success: false,
                })))
            }
        };

        let token = match bearer_token(req) {
            Some(token) => token,
            None => {
                return ready(Err(ErrorUnauthorized(ErrorResponse {
                    message: "Invalid login credentials".to_string(),
                    success: false,
                })))
            }
        };

        let claims = match decode_claims(&token, config) {
            Some(claims) => claims,
            None => {
                return ready(Err(ErrorUnauthorized(ErrorResponse {
                    message: "Invalid or expired token".to_string(),
                    success: false,
                })))
            }
        };

        let user_id: i32 = match claims.sub.parse() {
            Ok(id) => id,
            Err(_) => {
                return ready(Err(ErrorUnauthorized(ErrorResponse {
                    message: "Invalid or expired token".to_string(),
                    success: false,
                })))
            }
        };

        req.extensions_mut().insert(claims.clone());

        ready(Ok(JwtMiddleware { user_id, claims }))
    }
}
