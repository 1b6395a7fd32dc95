use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{CreateSecretRequest, Envelope};
use crate::routes::AppState;
use crate::services::AuthUser;

/// How many secrets the listing returns
const RECENT_SECRETS_LIMIT: i64 = 20;

/// Configure secret note routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/secrets", web::get().to(list_secrets))
        .route("/secrets", web::post().to(create_secret))
        .route("/secrets/{secret_id}", web::delete().to(delete_secret));
}

/// The caller's most recent secrets, newest first
///
/// GET /api/v1/secrets
async fn list_secrets(
    state: web::Data<AppState>,
    auth: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let secrets = state
        .postgres
        .recent_secrets(auth.id, RECENT_SECRETS_LIMIT)
        .await?;

    Ok(HttpResponse::Ok().json(Envelope::ok(secrets)))
}

/// Store a new secret for the caller
///
/// POST /api/v1/secrets
///
/// Request body:
/// ```json
/// { "message": "string" }
/// ```
async fn create_secret(
    state: web::Data<AppState>,
    auth: AuthUser,
    req: web::Json<CreateSecretRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let secret = state.postgres.insert_secret(auth.id, &req.message).await?;
    tracing::debug!("Stored secret {} for {}", secret.id, auth.username);

    Ok(HttpResponse::Created().json(Envelope::ok(secret)))
}

/// Delete one of the caller's secrets
///
/// DELETE /api/v1/secrets/{secretId}
async fn delete_secret(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let secret_id = path.into_inner();

    if state.postgres.delete_secret(auth.id, secret_id).await? {
        Ok(HttpResponse::Ok().json(Envelope::ok(serde_json::json!({ "id": secret_id }))))
    } else {
        Err(ApiError::not_found("Secret not found"))
    }
}
