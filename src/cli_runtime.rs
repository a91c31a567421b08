use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::Commands;

#[derive(Parser)]
#[command(name = "user-portal")]
#[command(about = "User management client", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding config.json and the session storage
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// API base URL (overrides config.json)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

pub(crate) struct Context {
    pub(crate) data_dir: PathBuf,
    pub(crate) api_url: Option<String>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    user_portal::logging::init(cli.verbose);

    let ctx = Context {
        data_dir: user_portal::config::resolve_data_dir(cli.data_dir),
        api_url: cli.api_url,
    };
    crate::cli_exec::handle_command(&ctx, cli.command)
}
