use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context as _, Result};

use user_portal::Client;
use user_portal::notify::{NotificationType, Notifier, TracingNotifier};

use crate::cli_runtime::Context;
use crate::{Commands, ConfigCommands, UserFormArgs, UsersCommands};

mod auth;
mod config;
mod dispatch;
mod users;

pub(crate) use self::dispatch::handle_command;

/// Prints notifications and remembers whether any reported an error, so the
/// process can exit non-zero.
#[derive(Default)]
pub(crate) struct CliNotifier {
    inner: TracingNotifier,
    errors: AtomicUsize,
}

impl CliNotifier {
    pub(crate) fn failed(&self) -> bool {
        self.errors.load(Ordering::SeqCst) > 0
    }
}

impl Notifier for CliNotifier {
    fn notify(&self, kind: NotificationType, message: &str) {
        if kind == NotificationType::Error {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.notify(kind, message);
    }
}

pub(crate) fn open_client(ctx: &Context) -> Result<Client> {
    let cfg = user_portal::config::read_config(&ctx.data_dir)?;
    let api_url = user_portal::config::resolve_api_url(ctx.api_url.as_deref(), &cfg);
    Client::open(&api_url, &ctx.data_dir)
        .with_context(|| format!("open client state in {}", ctx.data_dir.display()))
}

pub(crate) fn ensure_no_errors(notifier: &CliNotifier, action: &str) -> Result<()> {
    if notifier.failed() {
        anyhow::bail!("{} failed", action);
    }
    Ok(())
}

pub(crate) fn notifier() -> Arc<CliNotifier> {
    Arc::new(CliNotifier::default())
}

/// Like `notifier`, but every message goes to stderr.
pub(crate) fn stderr_notifier() -> Arc<CliNotifier> {
    Arc::new(CliNotifier {
        inner: TracingNotifier::stderr_only(),
        errors: AtomicUsize::new(0),
    })
}
