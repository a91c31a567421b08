use user_portal::guard::Route;
use user_portal::model::{Authority, Credentials, NewUser};
use user_portal::screen::{LoginScreen, RegisterScreen, UserScreen};

use anyhow::Context as _;

use super::*;
use crate::RegisterArgs;

pub(super) fn handle_login_command(ctx: &Context, username: String, password: String) -> Result<()> {
    let client = open_client(ctx)?;
    let notifier = notifier();
    let mut screen = LoginScreen::new(client.auth.clone(), notifier.clone());
    if screen.init().is_some() {
        if let Some(session) = client.session().current() {
            println!("Already logged in as {}", session.username);
        }
        return Ok(());
    }

    screen.login(Credentials {
        user_name: username,
        password,
    });
    screen.wait_idle();
    ensure_no_errors(&notifier, "login")?;

    match screen.navigation() {
        Some(Route::UserManagement) => {
            let session = client
                .session()
                .current()
                .context("server issued a token that is not usable")?;
            println!("Logged in as {}", session.username);
            Ok(())
        }
        _ => anyhow::bail!("login failed"),
    }
}

pub(super) fn handle_register_command(ctx: &Context, args: RegisterArgs) -> Result<()> {
    let client = open_client(ctx)?;
    let notifier = notifier();
    let mut screen = RegisterScreen::new(client.auth.clone(), notifier.clone());
    screen.register(NewUser {
        first_name: args.first_name,
        last_name: args.last_name,
        user_name: args.username,
        email: args.email,
    });
    screen.wait_idle();
    ensure_no_errors(&notifier, "register")
}

pub(super) fn handle_logout_command(ctx: &Context) -> Result<()> {
    let client = open_client(ctx)?;
    let mut screen = UserScreen::new(client.auth.clone(), client.users.clone(), notifier());
    screen.logout();
    Ok(())
}

pub(super) fn handle_session_command(ctx: &Context, json: bool) -> Result<()> {
    let client = open_client(ctx)?;
    let Some(session) = client.session().current() else {
        if json {
            println!("{}", serde_json::json!({ "logged_in": false }));
        } else {
            println!("Not logged in");
        }
        return Ok(());
    };
    let user = client.auth.user_from_cache()?;

    let expires_at = session
        .expires_at
        .and_then(|t| {
            t.format(&time::format_description::well_known::Rfc3339)
                .ok()
        })
        .unwrap_or_else(|| "never".to_string());
    let role = user.as_ref().and_then(|u| u.role);
    let authorities: Vec<&str> = [
        Authority::UserRead,
        Authority::UserUpdate,
        Authority::UserCreate,
        Authority::UserDelete,
    ]
    .into_iter()
    .filter(|a| user.as_ref().is_some_and(|u| u.can(*a)))
    .map(Authority::as_str)
    .collect();

    if json {
        let out = serde_json::json!({
            "logged_in": true,
            "username": session.username,
            "expires_at": expires_at,
            "role": role,
            "authorities": authorities,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("serialize session json")?
        );
    } else {
        println!("user: {}", session.username);
        println!("expires: {}", expires_at);
        println!(
            "role: {}",
            role.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
        );
        println!("authorities: {}", authorities.join(", "));
    }
    Ok(())
}
