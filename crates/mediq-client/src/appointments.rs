//! `/appointments` endpoints. All use bearer auth.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use mediq_core::entities::Appointment;

use crate::http::check_response;
use crate::{AuthStyle, BackendClient, ClientError, SessionContext};

/// Optional filters for `GET /appointments`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub doctor_id: Option<i64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl AppointmentQuery {
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(skip) = self.skip {
            pairs.push(format!("skip={skip}"));
        }
        if let Some(limit) = self.limit {
            pairs.push(format!("limit={limit}"));
        }
        if let Some(doctor_id) = self.doctor_id {
            pairs.push(format!("doctor_id={doctor_id}"));
        }
        if let Some(from) = self.date_from {
            pairs.push(format!("date_from={}", urlencoding::encode(&from.to_rfc3339())));
        }
        if let Some(to) = self.date_to {
            pairs.push(format!("date_to={}", urlencoding::encode(&to.to_rfc3339())));
        }
        pairs.join("&")
    }
}

impl BackendClient {
    /// `GET /appointments` for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, a non-success status, or
    /// an unparseable body.
    pub async fn list_appointments(
        &self,
        ctx: &SessionContext,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, ClientError> {
        let query = query.to_query_string();
        let url = if query.is_empty() {
            self.url("/appointments")
        } else {
            format!("{}?{query}", self.url("/appointments"))
        };
        let builder = self.authorized(self.http.get(&url), ctx, AuthStyle::Bearer);
        let resp = check_response(builder.send().await?).await?;
        Ok(resp.json().await?)
    }

    /// `DELETE /appointments/{id}` (204).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-success status.
    pub async fn cancel_appointment(&self, ctx: &SessionContext, id: i64) -> Result<(), ClientError> {
        let url = self.url(&format!("/appointments/{id}"));
        let builder = self.authorized(self.http.delete(&url), ctx, AuthStyle::Bearer);
        check_response(builder.send().await?).await?;
        tracing::info!(appointment_id = id, "appointment cancelled");
        Ok(())
    }

    /// `GET /appointments/availability/{doctor_id}?date=`: open slots for one day.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, a non-success status, or
    /// a slot that is not a timestamp.
    pub async fn doctor_availability(
        &self,
        ctx: &SessionContext,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<DateTime<Utc>>, ClientError> {
        let day = format!("{}T00:00:00", date.format("%Y-%m-%d"));
        let url = format!(
            "{}?date={}",
            self.url(&format!("/appointments/availability/{doctor_id}")),
            urlencoding::encode(&day)
        );
        let builder = self.authorized(self.http.get(&url), ctx, AuthStyle::Bearer);
        let resp = check_response(builder.send().await?).await?;
        let raw: Vec<String> = resp.json().await?;
        raw.iter().map(String::as_str).map(parse_backend_datetime).collect()
    }
}

/// Timestamps come back with an offset or naive (UTC).
fn parse_backend_datetime(raw: &str) -> Result<DateTime<Utc>, ClientError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| ClientError::Decode(format!("invalid slot timestamp '{raw}': {e}")))
}
