use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::GatewayVariant;

pub const MESSAGE_MAX_CHARS: usize = 1000;
pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

/// Raw contact-form payload as it arrives on the wire.
///
/// Fields are kept as loose JSON values so that presence and type can be
/// checked in a fixed precedence order instead of being rejected wholesale
/// by deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
}

/// A validated, normalized submission. Transient: consumed by the push
/// sender and dropped, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub message: String,
    pub phone: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name and message are required fields")]
    MissingFields,
    #[error("invalid data format")]
    InvalidFormat,
    #[error("name must be at least 2 characters")]
    NameTooShort,
    #[error("message must be at least 10 characters")]
    MessageTooShort,
    #[error("message must be 1000 characters or fewer")]
    MessageTooLong,
}

impl ContactRequest {
    /// Validate and normalize the payload. First failing check wins:
    /// missing fields, then (strict only) type, name length, message
    /// minimum, then the message cap shared by both variants.
    pub fn validate(&self, variant: GatewayVariant) -> Result<ContactSubmission, ValidationError> {
        if is_missing(&self.name) || is_missing(&self.message) {
            return Err(ValidationError::MissingFields);
        }

        if variant == GatewayVariant::Strict
            && (!self.name.as_ref().is_some_and(Value::is_string)
                || !self.message.as_ref().is_some_and(Value::is_string))
        {
            return Err(ValidationError::InvalidFormat);
        }

        let name = self
            .name
            .as_ref()
            .and_then(as_text)
            .ok_or(ValidationError::InvalidFormat)?;
        let message = self
            .message
            .as_ref()
            .and_then(as_text)
            .ok_or(ValidationError::InvalidFormat)?;

        if variant == GatewayVariant::Strict {
            if name.trim().chars().count() < NAME_MIN_CHARS {
                return Err(ValidationError::NameTooShort);
            }
            if message.trim().chars().count() < MESSAGE_MIN_CHARS {
                return Err(ValidationError::MessageTooShort);
            }
        }

        // Cap applies pre-trim, matching the spam guard on raw input.
        if message.chars().count() > MESSAGE_MAX_CHARS {
            return Err(ValidationError::MessageTooLong);
        }

        let phone = self
            .phone
            .as_ref()
            .and_then(as_text)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(ContactSubmission {
            name: name.trim().to_string(),
            message: message.trim().to_string(),
            phone,
        })
    }
}

/// Absent, JSON null, and empty-string values all count as missing.
fn is_missing(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Render a loose JSON value as text. Scalars are stringified (permissive
/// variant accepts them); arrays and objects are not representable.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
