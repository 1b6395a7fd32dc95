use crate::models::Envelope;
use crate::services::{AuthError, PostgresError, UploadError};
use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

/// Error type returned by every handler
///
/// Renders as `{ "success": false, "response": "<message>" }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] PostgresError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Auth(AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::UnknownUser)
        )
    }

    fn public_message(&self) -> String {
        if self.is_unauthorized() {
            return "Please log in".to_string();
        }
        match self {
            ApiError::Store(PostgresError::Conflict(_)) => "Username or email is already taken".to_string(),
            other => other.to_string(),
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(PostgresError::Conflict(_)) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::UnknownUser) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Upload(UploadError::UnsupportedType(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Upload(UploadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upload(UploadError::Empty) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_)
            | ApiError::Store(_)
            | ApiError::Auth(AuthError::Hashing(_))
            | ApiError::Upload(UploadError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let mut body = Envelope::failure(self.public_message());
        if self.is_unauthorized() {
            body = body.logged_out();
        }
        HttpResponse::build(status).json(body)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        ApiError::BadRequest(messages.join("; "))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid query: {}", err)).into()
}

/// Handle path parameter errors (e.g. a malformed user id)
pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid path: {}", err)).into()
}
