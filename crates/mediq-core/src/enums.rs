//! Roles, message roles, and the user-facing error taxonomy.
//!
//! Wire enums use the exact spelling the backend emits: `snake_case` for roles,
//! upper-case letters for sex, `SCREAMING_SNAKE_CASE` for error kinds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Account role. Decides which chat agent and which appointment view a caller gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Doctor,
    Patient,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Patient => "patient",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "doctor" => Ok(Self::Doctor),
            "patient" => Ok(Self::Patient),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Ok(Self::Male),
            "F" | "FEMALE" => Ok(Self::Female),
            other => Err(format!("unknown sex '{other}' (expected M or F)")),
        }
    }
}

// ---------------------------------------------------------------------------
// MessageRole
// ---------------------------------------------------------------------------

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Closed taxonomy of failures surfaced to the user.
///
/// Every boundary failure maps onto exactly one of these, so the UI always has
/// a renderable fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    AuthenticationFailed,
    Forbidden,
    ValidationError,
    ServerError,
    NetworkError,
    UnknownError,
}

impl ErrorKind {
    /// Map an HTTP status code onto the taxonomy.
    ///
    /// ```text
    /// 401      → AUTHENTICATION_FAILED
    /// 403      → FORBIDDEN
    /// 422      → VALIDATION_ERROR
    /// 500..599 → SERVER_ERROR
    /// other    → UNKNOWN_ERROR
    /// ```
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::AuthenticationFailed,
            403 => Self::Forbidden,
            422 => Self::ValidationError,
            500..=599 => Self::ServerError,
            _ => Self::UnknownError,
        }
    }

    /// Whether the UI offers a retry affordance carrying the original text.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::ServerError | Self::NetworkError | Self::UnknownError
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::Forbidden => "FORBIDDEN",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ServerError => "SERVER_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(401, ErrorKind::AuthenticationFailed)]
    #[case(403, ErrorKind::Forbidden)]
    #[case(422, ErrorKind::ValidationError)]
    #[case(500, ErrorKind::ServerError)]
    #[case(503, ErrorKind::ServerError)]
    #[case(404, ErrorKind::UnknownError)]
    #[case(409, ErrorKind::UnknownError)]
    fn status_maps_to_kind(#[case] status: u16, #[case] expected: ErrorKind) {
        assert_eq!(ErrorKind::from_status(status), expected);
    }

    #[test]
    fn only_transient_kinds_are_retryable() {
        assert!(ErrorKind::ServerError.is_retryable());
        assert!(ErrorKind::NetworkError.is_retryable());
        assert!(ErrorKind::UnknownError.is_retryable());
        assert!(!ErrorKind::AuthenticationFailed.is_retryable());
        assert!(!ErrorKind::Forbidden.is_retryable());
        assert!(!ErrorKind::ValidationError.is_retryable());
    }

    #[test]
    fn error_kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorKind::AuthenticationFailed).unwrap();
        assert_eq!(json, "\"AUTHENTICATION_FAILED\"");
        assert_eq!(ErrorKind::NetworkError.to_string(), "NETWORK_ERROR");
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Doctor".parse::<Role>(), Ok(Role::Doctor));
        assert_eq!(" patient ".parse::<Role>(), Ok(Role::Patient));
        assert!("nurse".parse::<Role>().is_err());
    }

    #[test]
    fn sex_uses_single_letter_on_the_wire() {
        assert_eq!(serde_json::to_string(&Sex::Female).unwrap(), "\"F\"");
        let parsed: Sex = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(parsed, Sex::Male);
        assert_eq!("female".parse::<Sex>(), Ok(Sex::Female));
    }
}
