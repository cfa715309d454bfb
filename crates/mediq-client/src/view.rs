//! Role-differentiated appointment cards for the sidebar.
//!
//! Doctors see a read-only list keyed by patient; patients see their doctors
//! and may cancel. Rendering is pure; [`BackendClient::cancel_and_refetch`]
//! is the only operation with side effects.

use chrono::{DateTime, Utc};
use mediq_core::Role;
use mediq_core::entities::Appointment;
use serde::Serialize;

use crate::appointments::AppointmentQuery;
use crate::{BackendClient, ClientError, SessionContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentCard {
    pub id: i64,
    /// Counterpart's name: the patient for doctors, the doctor for patients.
    pub title: String,
    pub subtitle: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: String,
    pub notes: Option<String>,
    pub cancellable: bool,
}

impl AppointmentCard {
    /// `Mon 05 May 2025, 09:00–09:30 UTC`
    #[must_use]
    pub fn when(&self) -> String {
        format!(
            "{}–{} UTC",
            self.starts_at.format("%a %d %b %Y, %H:%M"),
            self.ends_at.format("%H:%M")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentView {
    pub role: Role,
    pub cards: Vec<AppointmentCard>,
}

impl AppointmentView {
    /// Build the view as of now.
    #[must_use]
    pub fn for_role(role: Role, appointments: &[Appointment]) -> Self {
        Self::for_role_at(role, appointments, Utc::now())
    }

    /// Build the view as of `now`: upcoming only, soonest first.
    #[must_use]
    pub fn for_role_at(role: Role, appointments: &[Appointment], now: DateTime<Utc>) -> Self {
        let mut upcoming: Vec<&Appointment> =
            appointments.iter().filter(|a| a.is_upcoming(now)).collect();
        upcoming.sort_by_key(|a| (a.starts_at, a.id));

        let cards = upcoming
            .into_iter()
            .map(|appointment| card_for(role, appointment))
            .collect();

        Self { role, cards }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Plain-text rendering, one block per card.
    #[must_use]
    pub fn render(&self) -> String {
        if self.cards.is_empty() {
            return "No upcoming appointments.\n".to_string();
        }

        let mut out = String::new();
        for card in &self.cards {
            out.push_str(&format!("#{} {}\n", card.id, card.title));
            if let Some(subtitle) = &card.subtitle {
                out.push_str(&format!("    {subtitle}\n"));
            }
            out.push_str(&format!("    {}\n", card.when()));
            out.push_str(&format!("    {}\n", card.location));
            if let Some(notes) = &card.notes {
                out.push_str(&format!("    Notes: {notes}\n"));
            }
            if card.cancellable {
                out.push_str(&format!("    [cancel: mq appointments cancel {}]\n", card.id));
            }
        }
        out
    }
}

fn card_for(role: Role, appointment: &Appointment) -> AppointmentCard {
    let (title, subtitle) = match role {
        Role::Patient => (
            appointment.doctor_display_name(),
            appointment
                .doctor_profile
                .as_ref()
                .map(|d| d.specialty.clone()),
        ),
        Role::Doctor => (appointment.patient_display_name(), None),
        Role::Admin => (
            appointment.patient_display_name(),
            Some(format!("with {}", appointment.doctor_display_name())),
        ),
    };

    AppointmentCard {
        id: appointment.id,
        title,
        subtitle,
        starts_at: appointment.starts_at,
        ends_at: appointment.ends_at,
        location: appointment.location.clone(),
        notes: appointment.notes.clone().filter(|n| !n.trim().is_empty()),
        cancellable: role == Role::Patient,
    }
}

impl BackendClient {
    /// Cancel, then re-fetch the list so the view reflects the backend.
    ///
    /// No optimistic removal: on failure the error is logged and returned and
    /// the caller keeps showing what it had.
    ///
    /// # Errors
    ///
    /// Returns the [`ClientError`] from whichever call failed.
    pub async fn cancel_and_refetch(
        &self,
        ctx: &SessionContext,
        id: i64,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, ClientError> {
        if let Err(error) = self.cancel_appointment(ctx, id).await {
            tracing::warn!(appointment_id = id, %error, "cancel failed");
            return Err(error);
        }
        self.list_appointments(ctx, query).await
    }
}
