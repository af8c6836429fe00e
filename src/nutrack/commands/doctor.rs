use crate::bootstrap::{Bootstrap, BootstrapReport};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecordStore;

pub fn run(store: &RecordStore) -> Result<CmdResult> {
    let report = Bootstrap::new(store.layout(), store.calendar()).run()?;
    let mut result = CmdResult::default();
    for message in summarize(&report) {
        result.add_message(message);
    }
    Ok(result.with_report(report))
}

/// Human-readable lines for a bootstrap run.
pub fn summarize(report: &BootstrapReport) -> Vec<CmdMessage> {
    let mut messages = if report.is_clean() {
        vec![CmdMessage::success("No inconsistencies found.")]
    } else {
        repair_summary(report)
    };
    if !report.fresh {
        messages.extend(orphan_hints(report));
    }
    messages
}

/// What a bootstrap run had to fix. Empty when nothing was touched.
pub fn repair_summary(report: &BootstrapReport) -> Vec<CmdMessage> {
    let mut messages = Vec::new();
    if report.fresh {
        messages.push(CmdMessage::success("Created a new, empty data folder."));
        return messages;
    }
    if report.is_clean() {
        return messages;
    }

    messages.push(CmdMessage::warning("Inconsistencies found and fixed:"));
    if report.registry_created {
        messages.push(CmdMessage::info("  - Created a missing user registry."));
    }
    if report.registry_repaired {
        messages.push(CmdMessage::info("  - Repaired the user registry."));
    }
    if report.registry_reset {
        messages.push(CmdMessage::warning(
            "  - User registry had no valid entry and was emptied.",
        ));
    }
    let tree = &report.tree;
    let counts = [
        (tree.shadows_restored, "file(s) restored from an interrupted write"),
        (tree.shadows_discarded, "incomplete backup copy(ies) discarded"),
        (tree.files_repaired, "file(s) repaired"),
        (tree.files_removed, "unusable file(s) removed"),
        (tree.entries_purged, "stray file(s) or folder(s) removed"),
    ];
    for (count, what) in counts {
        if count > 0 {
            messages.push(CmdMessage::info(format!("  - {} {}.", count, what)));
        }
    }
    messages
}

/// One warning per unregistered user folder, naming the commands that resolve it.
pub fn orphan_hints(report: &BootstrapReport) -> Vec<CmdMessage> {
    report
        .orphans
        .iter()
        .map(|orphan| {
            CmdMessage::warning(format!(
                "User folder '{}' is not registered. Run `nutrack orphans restore {}` or `nutrack orphans delete {}`.",
                orphan, orphan, orphan
            ))
        })
        .collect()
}
