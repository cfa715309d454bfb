use mediq_config::MediqConfig;
use mediq_session::{GateDecision, SessionClaims, SessionGate};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::GateArgs;
use crate::output::output;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct GateReport {
    path: String,
    decision: &'static str,
    location: Option<String>,
    protected: bool,
    public_auth: bool,
    /// Value the gate would inject as the user-id header.
    user_id: Option<String>,
    role: Option<String>,
}

/// Show what the session middleware decides for `path`.
pub fn handle(args: &GateArgs, config: &MediqConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let gate = SessionGate::new(&config.routes, &config.session)?;
    if !config.session.is_configured() {
        tracing::warn!("no session secret configured; every token will be treated as anonymous");
    }

    let token = if args.anonymous {
        None
    } else {
        args.token.clone().or_else(mediq_session::resolve_token)
    };
    let claims = token.as_deref().and_then(|token| gate.verify_token(token));

    output(&report(&gate, &args.path, claims.as_ref()), flags.format)
}

fn report(gate: &SessionGate, path: &str, claims: Option<&SessionClaims>) -> GateReport {
    let decision = gate.decide_path(path, claims);
    let (label, location, identity) = match decision {
        GateDecision::Continue { identity } => ("continue", None, identity),
        GateDecision::Redirect { location } => ("redirect", Some(location), None),
    };

    GateReport {
        path: path.to_string(),
        decision: label,
        location,
        protected: gate.policy().is_protected(path),
        public_auth: gate.policy().is_public_auth(path),
        user_id: identity.as_ref().map(|i| i.user_id.clone()),
        role: identity.and_then(|i| i.role).map(|role| role.to_string()),
    }
}
