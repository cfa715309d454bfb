use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// Lightweight authenticated caller identity for cross-crate passing.
///
/// Produced by `mediq-session` after verifying a session token. Contains only
/// data fields, no verification logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SessionIdentity {
    /// Backend user id (from the token `sub` claim).
    pub user_id: String,
    /// Role claim, when the token carries one.
    pub role: Option<Role>,
}

