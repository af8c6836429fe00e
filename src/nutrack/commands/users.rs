use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::names::to_display_name;
use crate::store::RecordStore;
use std::path::Path;

pub fn list(store: &RecordStore) -> Result<CmdResult> {
    let users = store.list_users()?;
    let mut result = CmdResult::default();
    if users.is_empty() {
        result.add_message(CmdMessage::info("No users registered."));
    }
    Ok(result.with_listed_users(users))
}

pub fn add(store: &RecordStore, name: &str) -> Result<CmdResult> {
    let user = store.register_user(name)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Registered user {}.",
        to_display_name(&user)
    )));
    Ok(result)
}

/// Removes a user, optionally archiving their folder into `backup` first.
pub fn remove(store: &RecordStore, name: &str, backup: Option<&Path>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut paths = Vec::new();

    if let Some(dir) = backup {
        let archive = store.backup_user(name, dir)?;
        result.add_message(CmdMessage::info(format!(
            "Backed up to {}",
            archive.display()
        )));
        paths.push(archive);
    }

    store.remove_user(name)?;
    result.add_message(CmdMessage::success(format!("Removed user {}.", name)));
    Ok(result.with_paths(paths))
}
