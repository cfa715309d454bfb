use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Appointment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AppointmentCommands {
    /// Upcoming appointments for the logged-in user.
    List(AppointmentListArgs),
    /// Cancel an appointment (patients).
    Cancel(AppointmentCancelArgs),
    /// Open slots for a doctor on a day.
    Availability(AvailabilityArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AppointmentListArgs {
    /// Max appointments to fetch.
    #[arg(short, long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub doctor_id: Option<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct AppointmentCancelArgs {
    pub id: i64,
}

#[derive(Clone, Debug, Args)]
pub struct AvailabilityArgs {
    pub doctor_id: i64,
    #[arg(long)]
    pub date: NaiveDate,
}
