use mediq_client::forms::{self, FormOutcome, LoginForm};
use mediq_config::MediqConfig;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::commands::shared::input::{describe_field_errors, read_secret};
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    email: String,
    redirect_to: String,
    token_source: Option<&'static str>,
}

pub async fn handle(
    args: &AuthLoginArgs,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = bootstrap::client(config)?;
    let password = match &args.password {
        Some(password) => password.clone(),
        None => read_secret("Password")?,
    };
    let form = LoginForm {
        email: args.email.clone(),
        password,
    };

    let spinner = Progress::spinner("Logging in");
    let outcome = forms::submit_login(&client, &form, &config.routes).await;
    spinner.finish_clear();

    match outcome {
        FormOutcome::Redirect {
            to,
            session_token,
            refresh_token,
        } => {
            if let Some(token) = session_token {
                mediq_session::token_store::store(&token)?;
            }
            if let Some(token) = refresh_token {
                mediq_session::token_store::store_refresh(&token)?;
            }
            output(
                &AuthLoginResponse {
                    authenticated: true,
                    email: args.email.clone(),
                    redirect_to: to,
                    token_source: mediq_session::token_store::detect_token_source()
                        .map(|source| source.as_str()),
                },
                flags.format,
            )
        }
        FormOutcome::Invalid(errors) => {
            anyhow::bail!("login failed: {}", describe_field_errors(&errors))
        }
        FormOutcome::Failed { kind, message } => anyhow::bail!("login failed [{kind}]: {message}"),
    }
}
