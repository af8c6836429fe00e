use crate::bootstrap::{resolve_orphan, OrphanAction};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecordStore;

pub fn run(store: &RecordStore, name: &str, action: OrphanAction) -> Result<CmdResult> {
    resolve_orphan(store.layout(), name, action)?;
    let mut result = CmdResult::default();
    let message = match action {
        OrphanAction::Restore => format!("Restored user {} to the registry.", name),
        OrphanAction::Delete => format!("Deleted user folder {}.", name),
    };
    result.add_message(CmdMessage::success(message));
    Ok(result)
}
