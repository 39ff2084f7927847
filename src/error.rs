use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use std::env;
use std::fmt::{self, Debug};
use validator::ValidationErrors;

const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
    pub details: Option<Value>,
}

impl Error {
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_internal(&self) -> bool {
        (1..=99).contains(&self.code)
    }

    pub fn is_invalid_input_error(&self) -> bool {
        self.code == 101
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == 102
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        config_error(format!("environment variable error: {}", err))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => not_found_error(),
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                missing_trip_error()
            }
            _ => database_error(err),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
        invalid_input_error().with_details(details)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self.code {
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            102 => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };

        let body = if self.is_internal() {
            json!({
                "code": self.code,
                "error": "Internal Server Error",
            })
        } else {
            match self.details {
                Some(details) => json!({
                    "code": self.code,
                    "error": self.message,
                    "details": details,
                }),
                None => json!({
                    "code": self.code,
                    "error": self.message,
                }),
            }
        };

        (status, Json(body)).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
        details: None,
    }
}

pub fn not_found_error() -> Error {
    Error {
        code: 102,
        message: "not found".into(),
        details: None,
    }
}

/// A stop or log sheet that points at a trip which is not stored.
pub fn missing_trip_error() -> Error {
    invalid_input_error().with_details(json!({ "trip": ["referenced trip does not exist"] }))
}

pub fn config_error(message: impl Into<String>) -> Error {
    Error {
        code: 1,
        message: message.into(),
        details: None,
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!(error = ?err, "database error");

    Error {
        code: 2,
        message: "database error".into(),
        details: None,
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    Error {
        code: 3,
        message: format!("reqwest error: {}", err),
        details: None,
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
        details: None,
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
        details: None,
    }
}
