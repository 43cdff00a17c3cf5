//! Error types for the LDP HTTP front end.
//!
//! This module defines all error types used throughout the REST API layer,
//! with automatic conversion to JSON error responses.
//!
//! # Error Mapping
//!
//! Errors from the persistence and model layers are mapped to HTTP status
//! codes:
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Model errors (Link, RDF, SPARQL, membership, path) | 400 |
//! | Unsupported RDF media type | 415 |
//! | NotFound | 404 |
//! | OperationNotAllowed | 405 |
//! | AlreadyExists, ParentNotFound, NotAContainer | 409 |
//! | ServerManagedTriple, InteractionModelMismatch | 409 |
//! | PreconditionFailed | 412 |
//! | VersionConflict | 409 |
//! | Forbidden | 403 |
//! | Backend errors | 500 |
//!
//! Every 4xx response except 401 carries a `Link` to the constraints
//! document with `rel="http://www.w3.org/ns/ldp#constrainedBy"`.

use std::fmt;

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use ldp_model::ModelError;
use ldp_model::vocab::ldp;
use ldp_persistence::error::{
    AccessError, BackendError, ConcurrencyError, ConstraintError, ResourceError, StorageError,
};
use tracing::error;

use crate::responses::headers::allowed_methods;

/// Path of the constraints document.
pub const CONSTRAINTS_PATH: &str = "/constraints";

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Malformed request (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Missing or invalid credentials (HTTP 401).
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// The principal may not perform the operation (HTTP 403).
    Forbidden {
        /// Error message.
        message: String,
    },

    /// Resource not found (HTTP 404).
    NotFound {
        /// The request path.
        path: String,
    },

    /// Method not allowed for the resource (HTTP 405).
    MethodNotAllowed {
        /// The method that was attempted.
        method: String,
        /// The request path.
        path: String,
        /// Value of the `Allow` header.
        allow: &'static str,
    },

    /// No acceptable representation (HTTP 406).
    NotAcceptable {
        /// Error message.
        message: String,
    },

    /// The request conflicts with the resource state (HTTP 409).
    Conflict {
        /// Error message.
        message: String,
    },

    /// If-Match or If-None-Match failed (HTTP 412).
    PreconditionFailed {
        /// Message describing why the precondition failed.
        message: String,
    },

    /// Unsupported request media type (HTTP 415).
    UnsupportedMediaType {
        /// The unsupported content type.
        content_type: String,
    },

    /// Internal server error (HTTP 500). The message is logged, never sent.
    InternalError {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RestError::Forbidden { message } => write!(f, "Forbidden: {}", message),
            RestError::NotFound { path } => write!(f, "Resource not found: {}", path),
            RestError::MethodNotAllowed { method, path, .. } => {
                write!(f, "Method {} not allowed on {}", method, path)
            }
            RestError::NotAcceptable { message } => write!(f, "Not acceptable: {}", message),
            RestError::Conflict { message } => write!(f, "Conflict: {}", message),
            RestError::PreconditionFailed { message } => {
                write!(f, "Precondition failed: {}", message)
            }
            RestError::UnsupportedMediaType { content_type } => {
                write!(f, "Unsupported media type: {}", content_type)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl RestError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            RestError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            RestError::Conflict { .. } => StatusCode::CONFLICT,
            RestError::PreconditionFailed { .. } => StatusCode::PRECONDITION_FAILED,
            RestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message sent to the client.
    fn client_message(&self) -> String {
        match self {
            RestError::BadRequest { message }
            | RestError::Unauthorized { message }
            | RestError::Forbidden { message }
            | RestError::NotAcceptable { message }
            | RestError::Conflict { message }
            | RestError::PreconditionFailed { message } => message.clone(),
            RestError::NotFound { path } => format!("Resource {} not found", path),
            RestError::MethodNotAllowed { method, path, .. } => {
                format!("Method {} is not allowed on {}", method, path)
            }
            RestError::UnsupportedMediaType { content_type } => {
                format!("Content type '{}' is not supported", content_type)
            }
            RestError::InternalError { .. } => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut headers = HeaderMap::new();

        match &self {
            RestError::Unauthorized { .. } => {
                headers.insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static("Basic realm=\"ldp\""),
                );
            }
            RestError::MethodNotAllowed { allow, .. } => {
                headers.insert(header::ALLOW, HeaderValue::from_static(allow));
            }
            RestError::InternalError { message } => {
                error!(error = %message, "Request failed with an internal error");
            }
            _ => {}
        }

        if status.is_client_error() && status != StatusCode::UNAUTHORIZED {
            if let Ok(value) = HeaderValue::from_str(&constrained_by_link()) {
                headers.insert(header::LINK, value);
            }
        }

        let body = serde_json::json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.client_message(),
        });
        (status, headers, Json(body)).into_response()
    }
}

/// Returns the `Link` header value pointing at the constraints document.
pub fn constrained_by_link() -> String {
    format!(
        "<{}>; rel=\"{}\"",
        CONSTRAINTS_PATH,
        ldp::CONSTRAINED_BY.as_str()
    )
}

impl From<ModelError> for RestError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnsupportedMediaType { media_type } => RestError::UnsupportedMediaType {
                content_type: media_type,
            },
            other => RestError::BadRequest {
                message: other.to_string(),
            },
        }
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Constraint(e) => e.into(),
            StorageError::Concurrency(e) => e.into(),
            StorageError::Access(e) => e.into(),
            StorageError::Model(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { path } => RestError::NotFound {
                path: path.to_string(),
            },
            ResourceError::OperationNotAllowed {
                path,
                operation,
                model,
                description,
            } => RestError::MethodNotAllowed {
                allow: allowed_methods(model, description, path.is_root()),
                method: operation,
                path: path.to_string(),
            },
            e @ (ResourceError::AlreadyExists { .. }
            | ResourceError::ParentNotFound { .. }
            | ResourceError::NotAContainer { .. }) => RestError::Conflict {
                message: e.to_string(),
            },
        }
    }
}

impl From<ConstraintError> for RestError {
    fn from(err: ConstraintError) -> Self {
        RestError::Conflict {
            message: err.to_string(),
        }
    }
}

impl From<ConcurrencyError> for RestError {
    fn from(err: ConcurrencyError) -> Self {
        match err {
            e @ ConcurrencyError::PreconditionFailed { .. } => RestError::PreconditionFailed {
                message: e.to_string(),
            },
            e @ ConcurrencyError::VersionConflict { .. } => RestError::Conflict {
                message: e.to_string(),
            },
        }
    }
}

impl From<AccessError> for RestError {
    fn from(err: AccessError) -> Self {
        RestError::Forbidden {
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

/// Result type for REST operations.
pub type RestResult<T> = Result<T, RestError>;
