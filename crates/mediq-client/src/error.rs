//! Client error types and backend error-body parsing.

use mediq_core::ErrorKind;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors from a backend call. Every variant maps onto one [`ErrorKind`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("{kind} ({status}): {}", detail.summary())]
    Api {
        kind: ErrorKind,
        status: u16,
        detail: ApiDetail,
    },

    /// The request never got a response (connect, timeout, reset).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response arrived but its body was not what we expected.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network(error)
        }
    }
}

impl ClientError {
    /// Build an API error from a status code and raw body.
    #[must_use]
    pub fn api(status: u16, body: &str) -> Self {
        Self::Api {
            kind: ErrorKind::from_status(status),
            status,
            detail: ApiDetail::parse(body),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { kind, .. } => *kind,
            Self::Network(_) => ErrorKind::NetworkError,
            Self::Decode(_) => ErrorKind::UnknownError,
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-supplied detail, when the backend sent one.
    #[must_use]
    pub fn detail_message(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } => detail.message.as_deref(),
            _ => None,
        }
    }
}

/// One field-level message from a 422 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Dotted location with the leading `body` segment removed.
    pub field: String,
    pub message: String,
}

/// Parsed FastAPI-style error body.
///
/// Accepts `{"detail": "text"}`, `{"detail": {"message": "text"}}`,
/// `{"detail": [{"loc": [...], "msg": "..."}]}`, and a bare
/// `{"message": "text"}`. Anything else keeps only the raw body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiDetail {
    pub message: Option<String>,
    pub fields: Vec<FieldIssue>,
    pub raw: String,
}

impl ApiDetail {
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let mut detail = Self {
            raw: body.to_string(),
            ..Self::default()
        };

        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return detail;
        };

        match value.get("detail") {
            Some(Value::String(text)) => detail.message = Some(text.clone()),
            Some(Value::Object(map)) => {
                detail.message = map
                    .get("message")
                    .or_else(|| map.get("msg"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
            }
            Some(Value::Array(items)) => {
                detail.fields = items.iter().filter_map(field_issue).collect();
            }
            _ => {
                detail.message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string);
            }
        }

        detail
    }

    /// One line suitable for a log or a card body.
    #[must_use]
    pub fn summary(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        if !self.fields.is_empty() {
            return self
                .fields
                .iter()
                .map(|f| format!("{}: {}", f.field, f.message))
                .collect::<Vec<_>>()
                .join("; ");
        }
        let raw = self.raw.trim();
        if raw.is_empty() {
            "no details".to_string()
        } else {
            raw.chars().take(200).collect()
        }
    }
}

fn field_issue(item: &Value) -> Option<FieldIssue> {
    let message = item.get("msg").and_then(Value::as_str)?.to_string();
    let field = item
        .get("loc")
        .and_then(Value::as_array)
        .map(|loc| {
            loc.iter()
                .filter_map(|part| match part {
                    Value::String(s) if s != "body" => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(".")
        })
        .unwrap_or_default();
    Some(FieldIssue { field, message })
}
