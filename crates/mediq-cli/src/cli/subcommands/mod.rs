pub mod appointments;
pub mod auth;
pub mod chat;

pub use appointments::AppointmentCommands;
pub use auth::AuthCommands;
pub use chat::ChatCommands;
