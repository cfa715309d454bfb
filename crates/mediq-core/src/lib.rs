//! # mediq-core
//!
//! Core types shared across all Mediq crates:
//! - Entity structs for the JSON fragments exchanged with the backend
//!   (users, profiles, appointments, chat turns)
//! - Role, sex, and message-role enums
//! - The closed error taxonomy surfaced to users
//! - Lightweight session identity for cross-crate passing

pub mod entities;
pub mod enums;
pub mod identity;

pub use enums::{ErrorKind, MessageRole, Role, Sex};
pub use identity::SessionIdentity;
