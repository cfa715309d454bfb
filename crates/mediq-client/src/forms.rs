//! Login and registration forms.
//!
//! Client-side validation mirrors the backend schema so most mistakes are
//! reported without a round trip. It does not replace the backend checks:
//! server-side 422 messages are merged back into the same [`FieldErrors`].

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use mediq_config::RoutesConfig;
use mediq_core::entities::{DoctorProfile, PatientProfile};
use mediq_core::{ErrorKind, Sex};
use serde::Serialize;

use crate::auth::{LoginRequest, RegisterRequest};
use crate::{BackendClient, ClientError};

/// Key for messages that belong to the form as a whole.
pub const FORM_FIELD: &str = "form";

const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 128;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
pub const EMAIL_TAKEN: &str = "Email already registered.";

/// Field name → messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// A single form-level message.
    #[must_use]
    pub fn form(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(FORM_FIELD, message);
        errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

// ── Login ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns every field problem found.
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        errors.into_result(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

// ── Registration ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFields {
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`
    pub dob: String,
    /// `M` or `F`
    pub sex: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFields {
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
}

/// The profile half of registration. Exactly one kind is ever submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileFields {
    Patient(PatientFields),
    Doctor(DoctorFields),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub profile: ProfileFields,
}

impl RegisterForm {
    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns every field problem found. Profile fields are keyed as
    /// `patient_profile.<field>` / `doctor_profile.<field>`, matching the
    /// locations the backend reports.
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if self.password != self.confirm_password {
            errors.add("confirm_password", "Passwords do not match.");
        }

        let email = self.email.trim().to_string();
        let password = self.password.clone();

        match &self.profile {
            ProfileFields::Patient(fields) => {
                let profile = validate_patient(fields, &mut errors);
                match profile {
                    Some(profile) => {
                        errors.into_result(RegisterRequest::patient(email, password, profile))
                    }
                    None => Err(errors),
                }
            }
            ProfileFields::Doctor(fields) => {
                let profile = validate_doctor(fields, &mut errors);
                errors.into_result(RegisterRequest::doctor(email, password, profile))
            }
        }
    }
}

fn validate_patient(fields: &PatientFields, errors: &mut FieldErrors) -> Option<PatientProfile> {
    const P: &str = "patient_profile";
    require(&fields.first_name, &format!("{P}.first_name"), errors);
    require(&fields.last_name, &format!("{P}.last_name"), errors);
    require(&fields.phone, &format!("{P}.phone"), errors);
    require(&fields.address, &format!("{P}.address"), errors);

    let dob = match NaiveDate::parse_from_str(fields.dob.trim(), "%Y-%m-%d") {
        Ok(dob) if dob > Utc::now().date_naive() => {
            errors.add(format!("{P}.dob"), "Date of birth cannot be in the future.");
            None
        }
        Ok(dob) => Some(dob),
        Err(_) => {
            errors.add(format!("{P}.dob"), "Use the format YYYY-MM-DD.");
            None
        }
    };

    let sex = if let Ok(sex) = fields.sex.parse::<Sex>() {
        Some(sex)
    } else {
        errors.add(format!("{P}.sex"), "Choose M or F.");
        None
    };

    Some(PatientProfile {
        first_name: fields.first_name.trim().to_string(),
        last_name: fields.last_name.trim().to_string(),
        dob: dob?,
        sex: sex?,
        phone: fields.phone.trim().to_string(),
        address: fields.address.trim().to_string(),
    })
}

fn validate_doctor(fields: &DoctorFields, errors: &mut FieldErrors) -> DoctorProfile {
    const P: &str = "doctor_profile";
    require(&fields.first_name, &format!("{P}.first_name"), errors);
    require(&fields.last_name, &format!("{P}.last_name"), errors);
    require(&fields.specialty, &format!("{P}.specialty"), errors);
    DoctorProfile {
        first_name: fields.first_name.trim().to_string(),
        last_name: fields.last_name.trim().to_string(),
        specialty: fields.specialty.trim().to_string(),
    }
}

fn require(value: &str, field: &str, errors: &mut FieldErrors) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
    }
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if !is_plausible_email(email.trim()) {
        errors.add("email", "Enter a valid email address.");
    }
}

fn check_password(password: &str, errors: &mut FieldErrors) {
    let len = password.chars().count();
    if len < PASSWORD_MIN {
        errors.add(
            "password",
            format!("Password must be at least {PASSWORD_MIN} characters."),
        );
    } else if len > PASSWORD_MAX {
        errors.add(
            "password",
            format!("Password must be at most {PASSWORD_MAX} characters."),
        );
    }
}

/// `local@domain.tld`, no whitespace, one `@`.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

// ── Submission ─────────────────────────────────────────────────────

/// What the UI should do after a submit. Never an `Err`: every failure has a
/// renderable shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Navigate to `to`. Login also hands back the session and refresh tokens to keep.
    Redirect {
        to: String,
        session_token: Option<String>,
        refresh_token: Option<String>,
    },
    /// Show field or form-level messages and stay on the form.
    Invalid(FieldErrors),
    /// Show a generic failure for `kind`.
    Failed { kind: ErrorKind, message: String },
}

/// Validate, `POST /auth/login`, and map the result.
pub async fn submit_login(
    client: &BackendClient,
    form: &LoginForm,
    routes: &RoutesConfig,
) -> FormOutcome {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => return FormOutcome::Invalid(errors),
    };

    match client.login(&request).await {
        Ok(session) => FormOutcome::Redirect {
            to: routes.home_path.clone(),
            session_token: Some(session.session_token),
            refresh_token: Some(session.refresh_token),
        },
        Err(ClientError::Api {
            kind: ErrorKind::AuthenticationFailed,
            ..
        }) => FormOutcome::Invalid(FieldErrors::form(INVALID_CREDENTIALS)),
        Err(error) => failure_outcome(&error),
    }
}

/// Validate, `POST /auth/register`, and map the result.
pub async fn submit_register(
    client: &BackendClient,
    form: &RegisterForm,
    routes: &RoutesConfig,
) -> FormOutcome {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => return FormOutcome::Invalid(errors),
    };

    match client.register(&request).await {
        Ok(_) => FormOutcome::Redirect {
            to: routes.login_path.clone(),
            session_token: None,
            refresh_token: None,
        },
        Err(ClientError::Api { status: 409, .. }) => {
            let mut errors = FieldErrors::new();
            errors.add("email", EMAIL_TAKEN);
            FormOutcome::Invalid(errors)
        }
        Err(error) => failure_outcome(&error),
    }
}

fn failure_outcome(error: &ClientError) -> FormOutcome {
    if let ClientError::Api {
        kind: ErrorKind::ValidationError,
        detail,
        ..
    } = error
    {
        let mut errors = FieldErrors::new();
        for issue in &detail.fields {
            let field = if issue.field.is_empty() { FORM_FIELD } else { issue.field.as_str() };
            errors.add(field, issue.message.clone());
        }
        if errors.is_empty() {
            errors.add(FORM_FIELD, detail.summary());
        }
        return FormOutcome::Invalid(errors);
    }

    tracing::warn!(%error, "form submission failed");
    FormOutcome::Failed {
        kind: error.kind(),
        message: error
            .detail_message()
            .map_or_else(|| error.to_string(), str::to_string),
    }
}
