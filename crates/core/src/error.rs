use serde::Serialize;
use thiserror::Error;

/// Error returned by the HTTP surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }
}

/// JSON error envelope: `{ "error": { "code": "…", "message": "…", "details": {} } }`
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(e: &ApiError) -> Self {
        Self {
            error: ErrorBody {
                code: e.code().to_string(),
                message: e.to_string(),
                details: serde_json::Value::Object(serde_json::Map::new()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_code_and_message() {
        let err = ApiError::Conflict("row r1 is already being looked up".into());
        assert_eq!(err.status_code(), 409);

        let json = serde_json::to_value(ErrorEnvelope::from(&err)).unwrap();
        assert_eq!(json["error"]["code"], "conflict");
        assert_eq!(
            json["error"]["message"],
            "conflict: row r1 is already being looked up"
        );
        assert!(json["error"]["details"].as_object().unwrap().is_empty());
    }
}
