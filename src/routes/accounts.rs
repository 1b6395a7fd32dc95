use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::normalize_preferences;
use crate::error::ApiError;
use crate::models::{AuthPayload, Envelope, LoginRequest, NewUser, RegisterRequest};
use crate::routes::AppState;
use crate::services::auth::{hash_password_off_thread, verify_password_off_thread};
use crate::services::PostgresError;

/// Configure account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login));
}

/// Register endpoint
///
/// POST /api/v1/register
///
/// Request body:
/// ```json
/// {
///   "username": "string",
///   "password": "string",
///   "email": "string",
///   "firstName": "string",
///   "lastName": "string",
///   "role": "mentor|mentee",
///   "preferences": ["string"],
///   "bio": "string"
/// }
/// ```
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for register request: {:?}", errors);
        return Err(errors.into());
    }

    let req = req.into_inner();
    let password_hash = hash_password_off_thread(req.password).await?;
    let new_user = NewUser {
        username: req.username,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email.trim().to_lowercase(),
        password_hash,
        role: req.role,
        preferences: normalize_preferences(&req.preferences),
        bio: req.bio,
    };

    let user = match state.postgres.insert_user(new_user).await {
        Ok(user) => user,
        Err(PostgresError::Conflict(constraint)) => {
            tracing::info!("Registration rejected, duplicate value on {}", constraint);
            return Err(ApiError::bad_request(
                "Could not create user: username or email is already taken",
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let access_token = state.tokens.issue(&user)?;
    state.invalidate_user(user.id).await;

    tracing::info!("Registered {} {} ({})", user.role, user.username, user.id);

    Ok(HttpResponse::Created().json(Envelope::ok(AuthPayload {
        username: user.username,
        id: user.id,
        access_token,
        message: None,
    })))
}

/// Login endpoint
///
/// POST /api/v1/login
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let req = req.into_inner();
    let user = match state.postgres.find_user_by_username(&req.username).await? {
        Some(user) => user,
        None => return Err(ApiError::bad_request("Credentials do not match")),
    };

    if !verify_password_off_thread(req.password, user.password_hash.clone()).await? {
        return Err(ApiError::bad_request("Credentials do not match"));
    }

    let access_token = state.tokens.issue(&user)?;
    tracing::info!("User {} logged in", user.id);

    Ok(HttpResponse::Ok().json(Envelope::ok(AuthPayload {
        username: user.username,
        id: user.id,
        access_token,
        message: Some("Login successful".to_string()),
    })))
}
