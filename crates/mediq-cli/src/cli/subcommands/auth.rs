use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in with email and password.
    Login(AuthLoginArgs),
    /// Create a patient or doctor account.
    Register(AuthRegisterArgs),
    /// Exchange the stored refresh token for a new session.
    Refresh,
    /// End the session and clear stored credentials.
    Logout,
    /// Show the account behind the stored session.
    Whoami,
    /// Show local session status.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long)]
    pub email: String,
    /// Read from stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Args)]
#[command(group = clap::ArgGroup::new("profile").required(true).multiple(true))]
pub struct AuthRegisterArgs {
    #[arg(long)]
    pub email: String,
    /// Read from stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,

    /// Date of birth, `YYYY-MM-DD` (patients).
    #[arg(long, group = "profile", requires_all = ["sex", "phone", "address"])]
    pub dob: Option<String>,
    /// `M` or `F` (patients).
    #[arg(long, requires = "dob")]
    pub sex: Option<String>,
    #[arg(long, requires = "dob")]
    pub phone: Option<String>,
    #[arg(long, requires = "dob")]
    pub address: Option<String>,

    /// Medical specialty (doctors).
    #[arg(long, group = "profile", conflicts_with_all = ["dob", "sex", "phone", "address"])]
    pub specialty: Option<String>,
}
