//! Entity structs for the JSON fragments exchanged with the backend.
//!
//! The backend and its database own every record; these types only
//! deserialize what the API returns and serialize what it accepts. All structs
//! derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod appointment;
mod chat;
mod user;

pub use appointment::{Appointment, AppointmentDoctor, AppointmentPatient};
pub use chat::{ChatMessage, ChatRequest, ChatResponse};
pub use user::{AuthTokens, DoctorProfile, PatientProfile, UserProfile};
