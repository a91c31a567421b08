use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Log in and store the session token
    Login(LoginArgs),

    /// Create a new account
    Register(RegisterArgs),

    /// Clear the local session
    Logout,

    /// Show the current session
    Session {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Configure or show the client
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Manage users (requires a session)
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) username: String,
    #[arg(long, env = "USER_PORTAL_PASSWORD", hide_env_values = true)]
    pub(crate) password: String,
}

#[derive(Args)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    pub(crate) first_name: String,
    #[arg(long)]
    pub(crate) last_name: String,
    #[arg(long)]
    pub(crate) username: String,
    #[arg(long)]
    pub(crate) email: String,
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Persist the API base URL
    Set {
        #[arg(long)]
        api_url: String,
    },
}

/// Fields of the add/update forms. On update, omitted fields keep their
/// current values.
#[derive(Args, Default)]
pub(crate) struct UserFormArgs {
    #[arg(long)]
    pub(crate) first_name: Option<String>,
    #[arg(long)]
    pub(crate) last_name: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Role: user|hr|manager|admin|super_admin
    #[arg(long)]
    pub(crate) role: Option<String>,
    #[arg(long)]
    pub(crate) active: Option<bool>,
    #[arg(long)]
    pub(crate) not_locked: Option<bool>,
    /// Profile image to upload with the form
    #[arg(long)]
    pub(crate) image: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum UsersCommands {
    /// List users
    List {
        /// Case-insensitive filter over names and user id
        #[arg(long)]
        search: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one user
    Show {
        username: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a user
    Add {
        username: String,
        #[command(flatten)]
        form: UserFormArgs,
    },

    /// Update a user
    Update {
        username: String,
        /// Act as the logged-in user instead of the edited one
        #[arg(long)]
        as_me: bool,
        #[command(flatten)]
        form: UserFormArgs,
    },

    /// Delete a user
    Delete { username: String },

    /// Email a new password to a user
    ResetPassword { email: String },

    /// Upload a new profile image for the logged-in user
    ProfileImage { path: PathBuf },
}
