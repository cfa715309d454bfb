use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Doctor summary embedded in an appointment (patient view).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AppointmentDoctor {
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
}

/// Patient summary embedded in an appointment (doctor view).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AppointmentPatient {
    pub first_name: String,
    pub last_name: String,
}

/// An appointment as listed by `GET /appointments`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub doctor_profile: Option<AppointmentDoctor>,
    #[serde(default)]
    pub patient_profile: Option<AppointmentPatient>,
}

impl Appointment {
    #[must_use]
    pub fn doctor_display_name(&self) -> String {
        self.doctor_profile.as_ref().map_or_else(
            || format!("Doctor #{}", self.doctor_id),
            |d| format!("Dr. {} {}", d.first_name, d.last_name),
        )
    }

    #[must_use]
    pub fn patient_display_name(&self) -> String {
        self.patient_profile.as_ref().map_or_else(
            || format!("Patient #{}", self.patient_id),
            |p| format!("{} {}", p.first_name, p.last_name),
        )
    }

    /// Still relevant to the sidebar: it has not ended yet.
    #[must_use]
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.ends_at >= now
    }
}
