//! Request and response bodies exchanged with the IUMS API

use crate::state::forms::{AccountStatus, FieldName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Fields the API can check for uniqueness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    Username,
    Email,
    Phone,
}

impl UniqueField {
    /// Path segment and query key used by the check endpoint
    pub fn key(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    pub fn field(&self) -> FieldName {
        match self {
            Self::Username => FieldName::Username,
            Self::Email => FieldName::Email,
            Self::Phone => FieldName::Phone,
        }
    }
}

impl TryFrom<FieldName> for UniqueField {
    type Error = FieldName;

    fn try_from(field: FieldName) -> Result<Self, Self::Error> {
        match field {
            FieldName::Username => Ok(Self::Username),
            FieldName::Email => Ok(Self::Email),
            FieldName::Phone => Ok(Self::Phone),
            other => Err(other),
        }
    }
}

/// Answer of a uniqueness check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub exists: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the create-user request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserPayload {
    pub name: String,
    pub last_name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub employment_type: u32,
    pub directorate: u32,
    pub position: String,
    pub deputy_ministry: String,
    pub device_limit: u32,
    pub device_types: Vec<u32>,
    pub groups: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    pub status: AccountStatus,
    pub violation_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Errors from talking to the IUMS API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{}", .message.as_deref().unwrap_or("request rejected by server"))]
    Server {
        status: u16,
        message: Option<String>,
        field_errors: BTreeMap<String, Vec<String>>,
    },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message the server wants shown to the user, if it sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Per-field messages from a rejected request
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            Self::Server { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    errors: BTreeMap<String, serde_json::Value>,
}

/// Turn a non-success response body into an [`ApiError::Server`].
///
/// The user-facing message is taken from `message`, then `detail`, then the
/// first field error. Field errors may be a string or a list of strings.
pub fn parse_error_body(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let field_errors: BTreeMap<String, Vec<String>> = parsed
        .errors
        .into_iter()
        .map(|(key, value)| {
            let messages = match value {
                serde_json::Value::String(s) => vec![s],
                serde_json::Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
                other => vec![other.to_string()],
            };
            (key, messages)
        })
        .filter(|(_, messages)| !messages.is_empty())
        .collect();

    let message = parsed
        .message
        .or(parsed.detail)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            field_errors
                .values()
                .find_map(|messages| messages.first().cloned())
        });

    ApiError::Server {
        status,
        message,
        field_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod unique_field {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_try_from_watched_fields() {
            assert_eq!(UniqueField::try_from(FieldName::Email), Ok(UniqueField::Email));
            assert_eq!(
                UniqueField::try_from(FieldName::Position),
                Err(FieldName::Position)
            );
        }

        #[test]
        fn test_field_round_trip() {
            for unique in [UniqueField::Username, UniqueField::Email, UniqueField::Phone] {
                assert_eq!(UniqueField::try_from(unique.field()), Ok(unique));
                assert_eq!(unique.key(), unique.field().key());
            }
        }
    }

    mod payload {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_optional_fields_are_omitted() {
            let payload = CreateUserPayload {
                name: "Ahmad".into(),
                last_name: String::new(),
                username: "ahmadi".into(),
                email: None,
                phone: None,
                employment_type: 1,
                directorate: 10,
                position: "Clerk".into(),
                deputy_ministry: "Administration and Finance".into(),
                device_limit: 1,
                device_types: vec![2],
                groups: vec![3],
                mac_address: None,
                status: AccountStatus::Deactive,
                violation_count: 0,
                comment: None,
            };
            let json = serde_json::to_value(&payload).unwrap();
            assert!(json.get("email").is_none());
            assert!(json.get("mac_address").is_none());
            assert_eq!(json["status"], "deactive");
            assert_eq!(json["device_types"], serde_json::json!([2]));
        }
    }

    mod error_body {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_message_preferred() {
            let err = parse_error_body(400, r#"{"message": "Username taken", "detail": "x"}"#);
            assert_eq!(err.server_message(), Some("Username taken"));
            assert_eq!(err.to_string(), "Username taken");
        }

        #[test]
        fn test_detail_used_when_no_message() {
            let err = parse_error_body(403, r#"{"detail": "Not allowed"}"#);
            assert_eq!(err.server_message(), Some("Not allowed"));
        }

        #[test]
        fn test_field_errors_collected() {
            let err = parse_error_body(
                400,
                r#"{"errors": {"email": ["Enter a valid email."], "phone": "Too short"}}"#,
            );
            let fields = err.field_errors().unwrap();
            assert_eq!(fields["email"], vec!["Enter a valid email.".to_string()]);
            assert_eq!(fields["phone"], vec!["Too short".to_string()]);
            assert_eq!(err.server_message(), Some("Enter a valid email."));
        }

        #[test]
        fn test_unparseable_body_has_no_message() {
            let err = parse_error_body(502, "<html>Bad Gateway</html>");
            assert_eq!(
                err,
                ApiError::Server {
                    status: 502,
                    message: None,
                    field_errors: BTreeMap::new(),
                }
            );
            assert_eq!(err.to_string(), "request rejected by server");
        }

        #[test]
        fn test_network_error_has_no_server_message() {
            let err = ApiError::Network("connection refused".into());
            assert!(err.server_message().is_none());
            assert!(err.field_errors().is_none());
        }
    }
}
