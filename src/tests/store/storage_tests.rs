use super::*;

#[test]
fn file_storage_persists_across_instances() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let a = FileStorage::open(dir.path())?;
    a.set_item(TOKEN_KEY, "abc")?;
    a.set_item(USER_KEY, "{}")?;

    let b = FileStorage::open(dir.path())?;
    assert_eq!(b.get_item(TOKEN_KEY)?.as_deref(), Some("abc"));
    assert_eq!(b.get_item(USER_KEY)?.as_deref(), Some("{}"));
    assert_eq!(b.get_item(USERS_KEY)?, None);
    Ok(())
}

#[test]
fn file_storage_remove_is_idempotent() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let s = FileStorage::open(dir.path())?;
    s.remove_item(TOKEN_KEY)?;
    s.set_item(TOKEN_KEY, "abc")?;
    s.remove_item(TOKEN_KEY)?;
    s.remove_item(TOKEN_KEY)?;
    assert_eq!(s.get_item(TOKEN_KEY)?, None);
    Ok(())
}

#[test]
fn file_storage_rejects_corrupt_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let s = FileStorage::open(dir.path())?;
    std::fs::write(s.path(), b"not json")?;
    assert!(s.get_item(TOKEN_KEY).is_err());
    Ok(())
}

#[test]
fn memory_storage_round_trips_values() -> Result<()> {
    let s = MemoryStorage::new();
    s.set_item(USERS_KEY, "[]")?;
    assert_eq!(s.get_item(USERS_KEY)?.as_deref(), Some("[]"));
    s.remove_item(USERS_KEY)?;
    assert_eq!(s.get_item(USERS_KEY)?, None);
    Ok(())
}
