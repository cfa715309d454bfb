pub mod appointments;
pub mod auth;
pub mod chat;
pub mod dispatch;
pub mod gate;
pub mod shared;
