use anyhow::Context as _;

use user_portal::guard::{Navigation, Route, RouteGuard};
use user_portal::model::{ProfileImage, Role, User, UserForm};
use user_portal::screen::{ListState, UploadPhase, UserScreen};

use super::*;

pub(super) fn handle_users_command(ctx: &Context, command: UsersCommands) -> Result<()> {
    let client = open_client(ctx)?;
    // Keep stdout pure JSON when a command prints JSON.
    let json_output = matches!(
        command,
        UsersCommands::List { json: true, .. } | UsersCommands::Show { json: true, .. }
    );
    let notifier = if json_output {
        stderr_notifier()
    } else {
        notifier()
    };

    match RouteGuard::new(client.session()).navigate(Route::UserManagement) {
        Navigation::Allow(_) => {}
        Navigation::Redirect(to) => anyhow::bail!(
            "not logged in (run `user-portal login --username ...`; redirected to {})",
            to.path()
        ),
    }

    let mut screen = UserScreen::new(client.auth.clone(), client.users.clone(), notifier.clone());
    screen.init();
    screen.wait_idle();
    ensure_session(&screen)?;
    if let ListState::Error(msg) = screen.list_state() {
        anyhow::bail!("load users: {}", msg);
    }

    match command {
        UsersCommands::List { search, json } => {
            if let Some(term) = search {
                screen.search_users(&term);
            }
            print_users(screen.users(), json)?;
        }
        UsersCommands::Show { username, json } => {
            let user = find_user(&screen, &username)?.clone();
            screen.select_user(&user);
            print_user(&user, json)?;
        }
        UsersCommands::Add { username, form } => {
            let image = load_image(form.image.as_deref())?;
            if let Some(image) = image {
                screen.set_profile_image(image);
            }
            let form = apply_form_args(
                UserForm {
                    user_name: username,
                    active: true,
                    not_locked: true,
                    ..UserForm::default()
                },
                form,
            )?;
            screen.add_user(form);
            screen.wait_idle();
            ensure_no_errors(&notifier, "add user")?;
        }
        UsersCommands::Update {
            username,
            as_me,
            form,
        } => {
            let existing = find_user(&screen, &username)?.clone();
            if let Some(image) = load_image(form.image.as_deref())? {
                screen.set_profile_image(image);
            }
            let updated = apply_form_args(UserForm::from(&existing), form)?;
            if as_me {
                screen.update_current_user(updated);
            } else {
                screen.edit_user(&existing);
                screen.set_edit_form(updated);
                screen.update_user();
            }
            screen.wait_idle();
            ensure_no_errors(&notifier, "update user")?;
        }
        UsersCommands::Delete { username } => {
            screen.delete_user(&username);
            screen.wait_idle();
            ensure_no_errors(&notifier, "delete user")?;
        }
        UsersCommands::ResetPassword { email } => {
            screen.reset_password(&email);
            screen.wait_idle();
            ensure_no_errors(&notifier, "reset password")?;
        }
        UsersCommands::ProfileImage { path } => {
            screen.set_profile_image(ProfileImage::from_path(&path)?);
            screen.update_profile_image();
            screen.wait_idle();
            ensure_no_errors(&notifier, "update profile image")?;
            let status = screen.file_status();
            if status.status == UploadPhase::Done
                && let Some(user) = screen.user()
            {
                println!("profile image: {}", user.profile_image_url);
            }
        }
    }

    ensure_session(&screen)
}

fn ensure_session(screen: &UserScreen) -> Result<()> {
    if screen.navigation() == Some(Route::Login) {
        anyhow::bail!("session rejected by the server; run `user-portal login` again");
    }
    Ok(())
}

fn find_user<'a>(screen: &'a UserScreen, username: &str) -> Result<&'a User> {
    screen
        .users()
        .iter()
        .find(|u| u.user_name == username)
        .with_context(|| format!("no user named {}", username))
}

fn load_image(path: Option<&std::path::Path>) -> Result<Option<ProfileImage>> {
    path.map(ProfileImage::from_path).transpose()
}

fn apply_form_args(mut form: UserForm, args: UserFormArgs) -> Result<UserForm> {
    if let Some(v) = args.first_name {
        form.first_name = v;
    }
    if let Some(v) = args.last_name {
        form.last_name = v;
    }
    if let Some(v) = args.email {
        form.email = v;
    }
    if let Some(v) = args.role {
        form.role = Some(v.parse::<Role>().map_err(anyhow::Error::msg)?);
    }
    if let Some(v) = args.active {
        form.active = v;
    }
    if let Some(v) = args.not_locked {
        form.not_locked = v;
    }
    Ok(form)
}

fn print_users(users: &[User], json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(users).context("serialize users json")?
        );
        return Ok(());
    }
    for u in users {
        println!(
            "{} {} <{}> {} {}{}",
            u.user_id,
            u.user_name,
            u.email,
            u.role.map(|r| r.as_str()).unwrap_or("-"),
            if u.active { "active" } else { "inactive" },
            if u.not_locked { "" } else { " locked" },
        );
    }
    Ok(())
}

fn print_user(u: &User, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(u).context("serialize user json")?
        );
        return Ok(());
    }
    println!("id: {}", u.user_id);
    println!("username: {}", u.user_name);
    println!("name: {}", u.full_name());
    println!("email: {}", u.email);
    println!(
        "role: {}",
        u.role.map(|r| r.as_str()).unwrap_or("-")
    );
    println!("authorities: {}", u.authorities.join(", "));
    println!("active: {}", u.active);
    println!("locked: {}", !u.not_locked);
    if let Some(t) = &u.join_date {
        println!("joined: {}", t.to_display());
    }
    if let Some(t) = &u.last_login_date_display {
        println!("last login: {}", t.to_display());
    }
    if !u.profile_image_url.is_empty() {
        println!("image: {}", u.profile_image_url);
    }
    Ok(())
}
