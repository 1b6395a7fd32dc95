use actix_web::{http::header, web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use uuid::Uuid;
use validator::Validate;

use crate::core::{normalize_preferences, preference_catalog, sharing_preferences};
use crate::error::ApiError;
use crate::models::{
    Envelope, ListUsersQuery, PreferencesPayload, UpdateUserRequest, User, UserChanges, UserPayload,
    UserSummary,
};
use crate::routes::AppState;
use crate::services::auth::hash_password_off_thread;
use crate::services::{AuthUser, CacheKey, UploadError};

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/users", web::get().to(list_users))
        .route("/preferences", web::get().to(list_preferences))
        .route("/user/{user_id}", web::get().to(get_user))
        .route("/user/{user_id}", web::patch().to(update_user))
        .route("/user/{user_id}", web::delete().to(delete_user))
        .route("/user/{user_id}/picture", web::put().to(upload_picture))
        .route("/user/{user_id}/picture", web::get().to(get_picture));
}

async fn load_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    state
        .postgres
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

fn user_payload(user: UserSummary, message: &str) -> Envelope<UserPayload> {
    Envelope::ok(UserPayload {
        user,
        message: message.to_string(),
    })
}

/// Get a single user, mentor or mentee
///
/// GET /api/v1/user/{userId}
async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let summary = state
        .find_summary(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(user_payload(summary, "User found")))
}

/// Update the caller's own profile
///
/// PATCH /api/v1/user/{userId}
///
/// Every field is optional; preferences replace the stored list.
async fn update_user(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.ensure_self(user_id)?;
    req.validate()?;

    let req = req.into_inner();
    let password_hash = match req.password {
        Some(password) => Some(hash_password_off_thread(password).await?),
        None => None,
    };
    let changes = UserChanges {
        username: req.username,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email.map(|e| e.trim().to_lowercase()),
        password_hash,
        role: req.role,
        preferences: req.preferences.map(normalize_preferences),
        bio: req.bio,
    };

    let user = if changes.is_empty() {
        load_user(&state, user_id).await?
    } else {
        state
            .postgres
            .update_user(user_id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?
    };

    state.invalidate_user(user_id).await;
    let summary = state.cache_summary(&user).await;

    tracing::info!("Updated user {}", user_id);
    Ok(HttpResponse::Ok().json(user_payload(summary, "User updated")))
}

/// Delete the caller's own account, its secrets and its picture
///
/// DELETE /api/v1/user/{userId}
async fn delete_user(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.ensure_self(user_id)?;

    let user = state
        .postgres
        .delete_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(picture) = &user.picture_path {
        if let Err(e) = state.pictures.remove(picture).await {
            tracing::warn!("Failed to remove picture {} of deleted user {}: {}", picture, user_id, e);
        }
    }
    state.invalidate_user(user_id).await;

    Ok(HttpResponse::Ok().json(user_payload(user.summary(), "User deleted")))
}

/// List users on the other side of a pairing from the caller
///
/// GET /api/v1/users?matching=true
///
/// Mentors get mentees and mentees get mentors. With `matching=true` only
/// users sharing at least one preference with the caller are returned.
async fn list_users(
    state: web::Data<AppState>,
    auth: AuthUser,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut users = state
        .postgres
        .list_users_by_role(auth.role.counterpart())
        .await?;

    if query.matching {
        users = sharing_preferences(&auth.preferences, users);
    }

    tracing::debug!("Listing {} users for {} {}", users.len(), auth.role, auth.id);

    let summaries: Vec<UserSummary> = users.iter().map(User::summary).collect();
    Ok(HttpResponse::Ok().json(Envelope::ok(summaries)))
}

/// Every preference in use across all users
///
/// GET /api/v1/preferences
async fn list_preferences(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let key = CacheKey::preference_catalog();

    let preferences = match state.cache.get::<Vec<String>>(&key).await {
        Ok(preferences) => preferences,
        Err(e) => {
            if !matches!(e, crate::services::CacheError::CacheMiss(_)) {
                tracing::warn!("Cache read failed for {}: {}", key, e);
            }
            let users = state.postgres.list_users().await?;
            let catalog = preference_catalog(users.iter().map(|u| u.preferences.as_slice()));
            if let Err(e) = state.cache.set(&key, &catalog).await {
                tracing::warn!("Failed to cache {}: {}", key, e);
            }
            catalog
        }
    };

    Ok(HttpResponse::Ok().json(Envelope::ok(PreferencesPayload { preferences })))
}

/// Upload or replace the caller's profile picture
///
/// PUT /api/v1/user/{userId}/picture
///
/// The raw image is the request body; `Content-Type` must be one of
/// `image/png`, `image/jpeg`, `image/gif` or `image/webp`.
async fn upload_picture(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<Uuid>,
    http_req: HttpRequest,
    mut payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.ensure_self(user_id)?;

    let content_type = http_req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if crate::services::uploads::extension_for(&content_type).is_none() {
        return Err(UploadError::UnsupportedType(content_type).into());
    }

    let limit = state.pictures.max_bytes();
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
        if body.len() + chunk.len() > limit {
            return Err(UploadError::TooLarge { limit }.into());
        }
        body.extend_from_slice(&chunk);
    }

    let previous = load_user(&state, user_id).await?.picture_path;
    let stored = state.pictures.save(user_id, &content_type, &body).await?;

    let user = match state.postgres.set_picture(user_id, &stored, &content_type).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            discard_picture(&state, &stored).await;
            return Err(ApiError::not_found("User not found"));
        }
        Err(e) => {
            discard_picture(&state, &stored).await;
            return Err(e.into());
        }
    };

    if let Some(old) = previous {
        if let Err(e) = state.pictures.remove(&old).await {
            tracing::warn!("Failed to remove replaced picture {}: {}", old, e);
        }
    }

    let summary = state.cache_summary(&user).await;
    tracing::info!("Stored {} byte picture for {}", body.len(), user_id);

    Ok(HttpResponse::Ok().json(user_payload(summary, "Picture updated")))
}

/// Remove a picture written for an upload that did not go through
async fn discard_picture(state: &AppState, stored: &str) {
    if let Err(e) = state.pictures.remove(stored).await {
        tracing::warn!("Failed to remove orphaned picture {}: {}", stored, e);
    }
}

/// Serve a user's profile picture
///
/// GET /api/v1/user/{userId}/picture
async fn get_picture(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user = load_user(&state, path.into_inner()).await?;

    let (Some(picture), Some(content_type)) = (user.picture_path, user.picture_content_type) else {
        return Err(ApiError::not_found("User has no picture"));
    };

    match state.pictures.load(&picture).await? {
        Some(bytes) => Ok(HttpResponse::Ok().content_type(content_type).body(bytes)),
        None => {
            tracing::warn!("Picture {} of user {} is missing on disk", picture, user.id);
            Err(ApiError::not_found("User has no picture"))
        }
    }
}
