use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, RequestParts},
    http::{header, HeaderMap},
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use validator::Validate;

use crate::error::{invalid_input_error, Error};

/// Details key for errors that cannot be pinned to a single field.
const NON_FIELD_ERRORS: &str = "non_field_errors";

/// JSON body that has been deserialized and then checked with `validator`.
///
/// Both a malformed body and a failed check are rejected as invalid input,
/// with `details` keyed by the offending field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for ValidatedJson<T>
where
    Bytes: FromRequest<B, Rejection = BytesRejection>,
    T: DeserializeOwned + Validate + Send,
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Err(invalid_input_error().with_details(json!({
                NON_FIELD_ERRORS: ["expected a request with `Content-Type: application/json`"]
            })));
        }

        let bytes = Bytes::from_request(req).await.map_err(|rejection| {
            invalid_input_error().with_details(json!({ NON_FIELD_ERRORS: [rejection.to_string()] }))
        })?;

        let value: T = from_slice(&bytes)?;
        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().starts_with("application/json"))
        .unwrap_or(false)
}

/// Deserializes a JSON body, reporting failures against the field that caused them.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    let deserializer = &mut serde_json::Deserializer::from_slice(bytes);

    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let message = without_position(err.inner().to_string());
        let field = failing_field(&path, &message);

        let mut details = Map::new();
        details.insert(field, json!([message]));

        invalid_input_error().with_details(Value::Object(details))
    })
}

fn without_position(message: String) -> String {
    match message.rsplit_once(" at line ") {
        Some((message, _)) => message.to_string(),
        None => message,
    }
}

// Flattened fields are buffered before they are deserialized, so their
// errors surface at the root path and the name has to come from the message.
fn failing_field(path: &str, message: &str) -> String {
    if path != "." {
        return path.to_string();
    }

    message
        .strip_prefix("missing field `")
        .or_else(|| message.strip_prefix("unknown field `"))
        .and_then(|rest| rest.split('`').next())
        .unwrap_or(NON_FIELD_ERRORS)
        .to_string()
}
