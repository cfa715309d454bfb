use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Role, Sex};

/// Patient demographics, sent nested as `patient_profile` on registration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PatientProfile {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub sex: Sex,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DoctorProfile {
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
}

/// The caller as returned by `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub patient_profile: Option<PatientProfile>,
    #[serde(default)]
    pub doctor_profile: Option<DoctorProfile>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Human-facing name from whichever profile is attached, else the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(doctor) = &self.doctor_profile {
            return format!("Dr. {} {}", doctor.first_name, doctor.last_name);
        }
        if let Some(patient) = &self.patient_profile {
            return format!("{} {}", patient.first_name, patient.last_name);
        }
        self.email.clone()
    }
}

/// Token pair returned by login, registration, and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}
