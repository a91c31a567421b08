//! Key/value persistence standing in for browser local storage.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

mod file;
mod memory;

pub use self::file::FileStorage;
pub use self::memory::MemoryStorage;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const USERS_KEY: &str = "users";

/// Durable string map. Implementations must tolerate concurrent use from
/// request worker threads.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store/storage_tests.rs"]
mod tests;
