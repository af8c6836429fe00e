//! # Bootstrap
//!
//! Brings the data root into a consistent state before anything reads it.
//! Runs once per process start:
//!
//! 1. A missing data root is created fresh (`usr/` plus an empty registry).
//! 2. The registry's lingering shadow is resolved, then the registry is
//!    validated. A registry with no valid record is truncated to empty.
//! 3. Anything under the data root other than the registry and `usr/` goes.
//! 4. Every user folder is tree-validated. Folders that end up empty or have
//!    an illegal name are purged; the rest are checked against the registry,
//!    and unregistered ones are reported as orphans.
//!
//! Orphans are left on disk. [`resolve_orphan`] decides their fate.
//!
//! Filesystem failures abort the run. Running again after fixing the cause
//! continues from wherever the first run stopped.

use crate::calendar::Calendar;
use crate::error::{IoOp, NutrackError, Result};
use crate::layout::{DataLayout, REGISTRY_FILE, USERS_DIR};
use crate::model::{Record, RecordKind};
use crate::names::validate_name;
use crate::shadow;
use crate::store::RecordStore;
use crate::tree::{is_empty_dir, list_entries, purge_entry, Node, NodeStatus, TreeReport, TreeValidator};
use crate::validate::{load_records, validate_and_repair, Outcome};
use std::collections::HashSet;
use std::fs;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// The data root did not exist and was created.
    pub fresh: bool,
    pub registry_created: bool,
    pub registry_repaired: bool,
    /// The registry had no valid record and was truncated.
    pub registry_reset: bool,
    /// Registered and unregistered user folders that survived validation.
    pub users_checked: usize,
    pub tree: TreeReport,
    /// Unregistered user folders, sorted by name.
    pub orphans: Vec<String>,
}

impl BootstrapReport {
    /// Nothing on disk was changed.
    pub fn is_clean(&self) -> bool {
        !self.fresh
            && !self.registry_created
            && !self.registry_repaired
            && !self.registry_reset
            && self.tree.is_clean()
    }
}

pub struct Bootstrap<'a> {
    layout: &'a DataLayout,
    calendar: &'a dyn Calendar,
}

impl<'a> Bootstrap<'a> {
    pub fn new(layout: &'a DataLayout, calendar: &'a dyn Calendar) -> Self {
        Self { layout, calendar }
    }

    pub fn run(&self) -> Result<BootstrapReport> {
        let mut report = BootstrapReport::default();
        let root = self.layout.root();

        if !root.exists() {
            let users_dir = self.layout.users_dir();
            fs::create_dir_all(&users_dir).map_err(NutrackError::io(IoOp::Create, &users_dir))?;
            let registry = self.layout.registry();
            fs::write(&registry, "").map_err(NutrackError::io(IoOp::Create, &registry))?;
            info!(root = %root.display(), "created new data root");
            report.fresh = true;
            return Ok(report);
        }

        self.ensure_users_dir(&mut report)?;
        self.check_registry(&mut report)?;
        self.purge_root(&mut report)?;
        self.check_users(&mut report)?;

        Ok(report)
    }

    fn ensure_users_dir(&self, report: &mut BootstrapReport) -> Result<()> {
        let users_dir = self.layout.users_dir();
        if users_dir.is_dir() {
            return Ok(());
        }
        if users_dir.symlink_metadata().is_ok() {
            purge_entry(&users_dir)?;
            report.tree.entries_purged += 1;
        }
        fs::create_dir(&users_dir).map_err(NutrackError::io(IoOp::Create, &users_dir))
    }

    fn check_registry(&self, report: &mut BootstrapReport) -> Result<()> {
        let registry = self.layout.registry();
        report.tree.record_recovery(shadow::recover(&registry)?);

        if !registry.is_file() {
            if registry.symlink_metadata().is_ok() {
                purge_entry(&registry)?;
                report.tree.entries_purged += 1;
            }
            fs::write(&registry, "").map_err(NutrackError::io(IoOp::Create, &registry))?;
            info!("created empty registry");
            report.registry_created = true;
            return Ok(());
        }

        match validate_and_repair(&registry, RecordKind::User)? {
            Outcome::Repaired { .. } => report.registry_repaired = true,
            Outcome::Corrupted => {
                fs::write(&registry, "").map_err(NutrackError::io(IoOp::Write, &registry))?;
                warn!("registry had no valid user, truncated");
                report.registry_reset = true;
            }
            Outcome::NotFound | Outcome::Empty | Outcome::AlreadyValid => {}
        }
        Ok(())
    }

    fn purge_root(&self, report: &mut BootstrapReport) -> Result<()> {
        for entry in list_entries(self.layout.root())? {
            let name = entry.file_name();
            if name == REGISTRY_FILE || name == USERS_DIR {
                continue;
            }
            purge_entry(&entry.path())?;
            report.tree.entries_purged += 1;
        }
        Ok(())
    }

    fn check_users(&self, report: &mut BootstrapReport) -> Result<()> {
        let registered: HashSet<String> = load_records(&self.layout.registry(), RecordKind::User)?
            .into_iter()
            .filter_map(|r| match r {
                Record::User(user) => Some(user.name),
                _ => None,
            })
            .collect();

        let validator = TreeValidator::new(self.calendar);
        for entry in list_entries(&self.layout.users_dir())? {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry
                .file_type()
                .map_err(NutrackError::io(IoOp::Read, &path))?
                .is_dir();

            let keep = is_dir
                && validate_name(&name).is_ok()
                && !is_empty_dir(&path)?
                && validator.validate(&path, &Node::UserRoot { user: name.clone() }, &mut report.tree)?
                    == NodeStatus::Ok;
            if !keep {
                purge_entry(&path)?;
                report.tree.entries_purged += 1;
                continue;
            }

            report.users_checked += 1;
            if !registered.contains(&name) {
                debug!(user = %name, "unregistered user folder");
                report.orphans.push(name);
            }
        }
        report.orphans.sort();
        Ok(())
    }
}

/// What to do with an unregistered user folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanAction {
    /// Add the user back to the registry.
    Restore,
    /// Delete the folder and everything in it.
    Delete,
}

/// Restores or deletes an orphaned user folder. `name` is the folder name.
pub fn resolve_orphan(layout: &DataLayout, name: &str, action: OrphanAction) -> Result<()> {
    let store = RecordStore::new(layout.clone());
    let user = crate::store::normalize_name(name)?;
    let dir = layout.user_dir(&user);
    if !dir.is_dir() {
        return Err(NutrackError::NotFound(dir));
    }
    if store.is_registered(&user)? {
        return Err(NutrackError::UserExists(user));
    }

    match action {
        OrphanAction::Restore => {
            store.register_user(&user)?;
        }
        OrphanAction::Delete => {
            purge_entry(&dir)?;
            info!(user = %user, "deleted orphaned user folder");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Gregorian;
    use crate::shadow::ShadowError;
    use crate::test_utils::TestEnv;

    fn run(env: &TestEnv) -> BootstrapReport {
        Bootstrap::new(&env.layout, &Gregorian).run().unwrap()
    }

    #[test]
    fn test_fresh_root() {
        let env = TestEnv::new();
        let report = run(&env);
        assert!(report.fresh);
        assert!(env.layout.users_dir().is_dir());
        assert_eq!(env.read("users.dat"), "");

        let second = run(&env);
        assert!(second.is_clean());
    }

    #[test]
    fn test_missing_pieces_recreated() {
        let env = TestEnv::new();
        fs::create_dir_all(&env.root).unwrap();
        let report = run(&env);
        assert!(!report.fresh);
        assert!(report.registry_created);
        assert!(env.layout.users_dir().is_dir());
    }

    #[test]
    fn test_corrupted_registry_truncated() {
        let env = TestEnv::initialized();
        env.write("users.dat", "{1}|garbage|");
        let report = run(&env);
        assert!(report.registry_reset);
        assert_eq!(env.read("users.dat"), "");
    }

    #[test]
    fn test_registry_repaired() {
        let env = TestEnv::initialized();
        env.write("users.dat", "{alice}|{alice}|{bob}|");
        let report = run(&env);
        assert!(report.registry_repaired);
        assert_eq!(env.read("users.dat"), "{alice}|{bob}|");
    }

    #[test]
    fn test_registry_shadow_restored() {
        let env = TestEnv::initialized();
        env.write("users.dat", "{ali");
        env.write(".shadow_users.dat", "{alice}|{bob}|{_END_}|");
        let report = run(&env);
        assert_eq!(report.tree.shadows_restored, 1);
        assert_eq!(env.read("users.dat"), "{alice}|{bob}|");
        assert!(!env.root.join(".shadow_users.dat").exists());
    }

    #[test]
    fn test_foreign_root_entries_purged() {
        let env = TestEnv::initialized();
        env.write("notes.txt", "x");
        env.write("cache/a", "x");
        let report = run(&env);
        assert_eq!(report.tree.entries_purged, 2);
        let mut names: Vec<_> = fs::read_dir(&env.root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["usr", "users.dat"]);
    }

    #[test]
    fn test_user_folders_checked_and_orphans_reported() {
        let env = TestEnv::initialized();
        env.write("users.dat", "{alice}|");
        env.write("usr/alice/alice_foods.dat", "{apple/52/0.3/14/0.2/2.4/100}|");
        env.write("usr/zed/zed_foods.dat", "{rice/130/2.7/28/0.3/0.4/100}|");
        env.write("usr/carol/carol_foods.dat", "{rice/130/2.7/28/0.3/0.4/100}|");
        fs::create_dir_all(env.root.join("usr/empty")).unwrap();
        env.write("usr/r2d2/r2d2_foods.dat", "{rice/130/2.7/28/0.3/0.4/100}|");
        env.write("usr/stray.txt", "x");
        // Only a corrupted foods file: emptied by the walk, then purged.
        env.write("usr/dave/dave_foods.dat", "garbage|");

        let report = run(&env);
        assert_eq!(report.orphans, vec!["carol", "zed"]);
        assert_eq!(report.users_checked, 3);
        assert!(!env.root.join("usr/empty").exists());
        assert!(!env.root.join("usr/r2d2").exists());
        assert!(!env.root.join("usr/stray.txt").exists());
        assert!(!env.root.join("usr/dave").exists());
        assert!(env.root.join("usr/zed").exists());
    }

    #[test]
    fn test_resolve_orphan_restore() {
        let env = TestEnv::initialized();
        env.write("usr/zed/zed_foods.dat", "{rice/130/2.7/28/0.3/0.4/100}|");
        assert_eq!(run(&env).orphans, vec!["zed"]);

        resolve_orphan(&env.layout, "zed", OrphanAction::Restore).unwrap();
        assert_eq!(env.read("users.dat"), "{zed}|");
        assert!(run(&env).orphans.is_empty());
    }

    #[test]
    fn test_resolve_orphan_delete() {
        let env = TestEnv::initialized();
        env.write("usr/zed/zed_foods.dat", "{rice/130/2.7/28/0.3/0.4/100}|");

        resolve_orphan(&env.layout, "zed", OrphanAction::Delete).unwrap();
        assert!(!env.root.join("usr/zed").exists());
        assert_eq!(env.read("users.dat"), "");
    }

    #[test]
    fn test_upper_case_user_folder_purged_not_orphaned() {
        let env = TestEnv::initialized();
        env.write("usr/Zed/Zed_foods.dat", "{rice/130/2.7/28/0.3/0.4/100}|");

        let report = run(&env);
        assert!(report.orphans.is_empty());
        assert_eq!(report.tree.entries_purged, 1);
        assert!(!env.root.join("usr/Zed").exists());
        assert!(run(&env).is_clean());
    }

    #[test]
    fn test_io_failure_aborts_run_untouched() {
        let env = TestEnv::initialized();
        env.write("users.dat", "{alice}|{alice}|");
        env.write("stray.txt", "x");
        env.write("usr/zed/zed_foods.dat", "{rice/130/2.7/28/0.3/0.4/100}|");
        // The repair has to write its shadow here, and cannot.
        fs::create_dir_all(env.root.join(".shadow_users.dat/inner")).unwrap();

        let err = Bootstrap::new(&env.layout, &Gregorian).run().unwrap_err();
        assert!(
            matches!(
                err,
                NutrackError::Io { .. } | NutrackError::Shadow(ShadowError::Io { .. })
            ),
            "{:?}",
            err
        );
        assert_eq!(env.read("users.dat"), "{alice}|{alice}|");
        assert_eq!(env.read("stray.txt"), "x");
        assert!(env.root.join(".shadow_users.dat/inner").is_dir());
        assert!(env.root.join("usr/zed/zed_foods.dat").is_file());
    }

    #[test]
    fn test_resolve_orphan_rejects_registered_and_missing() {
        let env = TestEnv::initialized();
        env.write("users.dat", "{alice}|");
        env.write("usr/alice/alice_foods.dat", "{rice/130/2.7/28/0.3/0.4/100}|");

        assert!(matches!(
            resolve_orphan(&env.layout, "alice", OrphanAction::Delete),
            Err(NutrackError::UserExists(_))
        ));
        assert!(env.root.join("usr/alice").exists());
        assert!(matches!(
            resolve_orphan(&env.layout, "nobody", OrphanAction::Restore),
            Err(NutrackError::NotFound(_))
        ));
    }
}
