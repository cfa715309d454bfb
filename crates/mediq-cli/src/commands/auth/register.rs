use mediq_client::forms::{
    self, DoctorFields, FormOutcome, PatientFields, ProfileFields, RegisterForm,
};
use mediq_config::MediqConfig;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthRegisterArgs;
use crate::commands::shared::input::{describe_field_errors, read_secret};
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct AuthRegisterResponse {
    registered: bool,
    email: String,
    role: &'static str,
    redirect_to: String,
}

pub async fn handle(
    args: &AuthRegisterArgs,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = bootstrap::client(config)?;
    let (password, confirm_password) = match &args.password {
        Some(password) => (password.clone(), password.clone()),
        None => (read_secret("Password")?, read_secret("Confirm password")?),
    };

    let form = RegisterForm {
        email: args.email.clone(),
        password,
        confirm_password,
        profile: profile_fields(args),
    };
    let role = match form.profile {
        ProfileFields::Patient(_) => "patient",
        ProfileFields::Doctor(_) => "doctor",
    };

    let spinner = Progress::spinner("Creating account");
    let outcome = forms::submit_register(&client, &form, &config.routes).await;
    spinner.finish_clear();

    match outcome {
        FormOutcome::Redirect { to, .. } => output(
            &AuthRegisterResponse {
                registered: true,
                email: args.email.clone(),
                role,
                redirect_to: to,
            },
            flags.format,
        ),
        FormOutcome::Invalid(errors) => {
            anyhow::bail!("registration failed: {}", describe_field_errors(&errors))
        }
        FormOutcome::Failed { kind, message } => {
            anyhow::bail!("registration failed [{kind}]: {message}")
        }
    }
}

fn profile_fields(args: &AuthRegisterArgs) -> ProfileFields {
    match &args.specialty {
        Some(specialty) => ProfileFields::Doctor(DoctorFields {
            first_name: args.first_name.clone(),
            last_name: args.last_name.clone(),
            specialty: specialty.clone(),
        }),
        None => ProfileFields::Patient(PatientFields {
            first_name: args.first_name.clone(),
            last_name: args.last_name.clone(),
            dob: args.dob.clone().unwrap_or_default(),
            sex: args.sex.clone().unwrap_or_default(),
            phone: args.phone.clone().unwrap_or_default(),
            address: args.address.clone().unwrap_or_default(),
        }),
    }
}
