//! Structured API errors.
//!
//! Handler failures leave the server as
//! `{"error": {"code": "<Code>", "message": "...", ...details}}`.

use std::fmt;

use salvo::{
    oapi::{Components, EndpointOutRegister, Operation},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::error;

/// An error response with a machine-readable code.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ApiError {
    status: StatusCode,
    code: String,
    message: String,
    details: Map<String, Value>,
}

/// Error Response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error Body
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ErrorBody {
    /// Error code, e.g. `InsufficientStock`
    pub code: String,

    /// Human-readable description
    pub message: String,

    /// Code-specific fields
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ApiError {
    pub(crate) fn new(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: Map::new(),
        }
    }

    pub(crate) fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "InternalServerError",
            "Internal Server Error",
        )
    }

    /// Attach a detail field to the error body.
    #[must_use]
    pub(crate) fn with_detail(mut self, key: &str, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.details.insert(key.to_string(), value);
            }
            Err(source) => error!(key, "failed to encode error detail: {source}"),
        }

        self
    }

    pub(crate) fn code(&self) -> &str {
        &self.code
    }

    pub(crate) fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        }));
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<StatusError> for ApiError {
    fn from(error: StatusError) -> Self {
        let code = error.name.replace(' ', "");

        Self::new(error.code, code, error.brief)
    }
}

#[async_trait]
impl Writer for ApiError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        self.render(res);
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        StatusError::register(components, operation);
    }
}
