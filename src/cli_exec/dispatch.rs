use super::auth::{
    handle_login_command, handle_logout_command, handle_register_command, handle_session_command,
};
use super::config::handle_config_command;
use super::users::handle_users_command;
use super::*;

pub(crate) fn handle_command(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Login(args) => handle_login_command(ctx, args.username, args.password)?,
        Commands::Register(args) => handle_register_command(ctx, args)?,
        Commands::Logout => handle_logout_command(ctx)?,
        Commands::Session { json } => handle_session_command(ctx, json)?,
        Commands::Config { command } => handle_config_command(ctx, command)?,
        Commands::Users { command } => handle_users_command(ctx, command)?,
    }
    Ok(())
}
