//! # Directory Tree Validation
//!
//! A user folder is a fixed four-level tree:
//!
//! ```text
//! usr/<user>/                     UserRoot   <user>_foods.dat + year folders
//!   <year>/                       Year       month folders (1-12)
//!     <month>/                    Month      day folders (1..=month length)
//!       <day>/                    Day        <weekday>_day.dat only
//! ```
//!
//! [`TreeValidator::validate`] walks it post-order. At each node it heals the
//! node's data file (if the depth has one), recurses into legal child folders
//! and schedules everything else for purge. Once the children are done the
//! schedule is purged and the node reports [`NodeStatus::Empty`] if nothing is
//! left, so its parent removes it in turn. One pass therefore removes whole
//! empty subtrees.
//!
//! Numeric folder names must be canonical (`3`, not `03` or `+3`): a folder is
//! legal only if it is exactly the name the store would create.

use crate::calendar::Calendar;
use crate::error::{IoOp, NutrackError, Result};
use crate::layout::{day_file_name, foods_file_name};
use crate::model::RecordKind;
use crate::shadow::{self, Recovery};
use crate::validate::{validate_and_repair, Outcome};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    UserRoot { user: String },
    Year { year: i32 },
    Month { year: i32, month: u8 },
    Day { year: i32, month: u8, day: u8 },
}

impl Node {
    /// The node a child folder named `name` would be, if that name is legal
    /// at this depth.
    fn child(&self, name: &str, calendar: &dyn Calendar) -> Option<Node> {
        match *self {
            Node::UserRoot { .. } => canonical_number::<i32>(name)
                .filter(|year| calendar.supports_year(*year))
                .map(|year| Node::Year { year }),
            Node::Year { year } => canonical_number::<u8>(name)
                .filter(|m| (1..=12).contains(m))
                .map(|month| Node::Month { year, month }),
            Node::Month { year, month } => canonical_number::<u8>(name)
                .filter(|d| (1..=calendar.month_length(month, year)).contains(d))
                .map(|day| Node::Day { year, month, day }),
            Node::Day { .. } => None,
        }
    }

    /// The single data file this depth owns, with its schema.
    fn data_file(&self, calendar: &dyn Calendar) -> Option<(String, RecordKind)> {
        match self {
            Node::UserRoot { user } => Some((foods_file_name(user), RecordKind::Food)),
            Node::Day { year, month, day } => {
                let weekday = calendar.day_of_week(*year, *month, *day);
                Some((day_file_name(weekday), RecordKind::Day))
            }
            Node::Year { .. } | Node::Month { .. } => None,
        }
    }
}

fn canonical_number<T: FromStr>(name: &str) -> Option<T> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if name.len() > 1 && name.starts_with('0') {
        return None;
    }
    name.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    NotFound,
    Empty,
    Ok,
}

/// Everything a walk changed on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeReport {
    pub files_repaired: usize,
    pub files_removed: usize,
    pub entries_purged: usize,
    pub shadows_restored: usize,
    pub shadows_discarded: usize,
}

impl TreeReport {
    pub fn merge(&mut self, other: &TreeReport) {
        self.files_repaired += other.files_repaired;
        self.files_removed += other.files_removed;
        self.entries_purged += other.entries_purged;
        self.shadows_restored += other.shadows_restored;
        self.shadows_discarded += other.shadows_discarded;
    }

    pub fn record_recovery(&mut self, recovery: Recovery) {
        match recovery {
            Recovery::Restored => self.shadows_restored += 1,
            Recovery::Discarded => self.shadows_discarded += 1,
            Recovery::NoShadow => {}
        }
    }

    pub fn is_clean(&self) -> bool {
        *self == TreeReport::default()
    }
}

pub struct TreeValidator<'a> {
    calendar: &'a dyn Calendar,
}

impl<'a> TreeValidator<'a> {
    pub fn new(calendar: &'a dyn Calendar) -> Self {
        Self { calendar }
    }

    /// Validates the folder at `path` as `node` and everything below it.
    pub fn validate(&self, path: &Path, node: &Node, report: &mut TreeReport) -> Result<NodeStatus> {
        if !path.is_dir() {
            return Ok(NodeStatus::NotFound);
        }
        debug!(path = %path.display(), ?node, "validating folder");

        let data_file = node.data_file(self.calendar);
        if let Some((name, kind)) = &data_file {
            self.heal_data_file(&path.join(name), *kind, report)?;
        }

        let mut purge = Vec::new();
        for entry in list_entries(path)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let child_path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(NutrackError::io(IoOp::Read, &child_path))?;

            if file_type.is_file() && data_file.as_ref().is_some_and(|(n, _)| *n == name) {
                continue;
            }
            if !file_type.is_dir() {
                purge.push(child_path);
                continue;
            }

            let keep = match node.child(&name, self.calendar) {
                Some(child) if !is_empty_dir(&child_path)? => {
                    self.validate(&child_path, &child, report)? == NodeStatus::Ok
                }
                _ => false,
            };
            if !keep {
                purge.push(child_path);
            }
        }

        for entry in &purge {
            purge_entry(entry)?;
            report.entries_purged += 1;
        }

        if is_empty_dir(path)? {
            Ok(NodeStatus::Empty)
        } else {
            Ok(NodeStatus::Ok)
        }
    }

    fn heal_data_file(&self, file: &Path, kind: RecordKind, report: &mut TreeReport) -> Result<()> {
        report.record_recovery(shadow::recover(file)?);

        match validate_and_repair(file, kind)? {
            Outcome::Repaired { .. } => report.files_repaired += 1,
            Outcome::Corrupted | Outcome::Empty => {
                fs::remove_file(file).map_err(NutrackError::io(IoOp::Remove, file))?;
                warn!(path = %file.display(), "removed unusable {} file", kind);
                report.files_removed += 1;
            }
            Outcome::NotFound | Outcome::AlreadyValid => {}
        }
        Ok(())
    }
}

/// Entries of `dir`, sorted by name so walks are deterministic.
pub(crate) fn list_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .map_err(NutrackError::io(IoOp::List, dir))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(NutrackError::io(IoOp::List, dir))?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

pub(crate) fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(dir).map_err(NutrackError::io(IoOp::List, dir))?;
    Ok(entries.next().is_none())
}

/// Removes a file, link or whole folder.
pub(crate) fn purge_entry(path: &Path) -> Result<()> {
    let is_dir = fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .map_err(NutrackError::io(IoOp::Read, path))?;
    if is_dir {
        fs::remove_dir_all(path).map_err(NutrackError::io(IoOp::Remove, path))?;
    } else {
        fs::remove_file(path).map_err(NutrackError::io(IoOp::Remove, path))?;
    }
    info!(path = %path.display(), "purged");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Gregorian;
    use crate::test_utils::{write_file, FixedCalendar};
    use tempfile::TempDir;

    const FULL_DAY: &str = "{2000}|{100}|{250}|{70}|{30}|";

    fn names_in(dir: &Path) -> Vec<String> {
        list_entries(dir)
            .unwrap()
            .into_iter()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_canonical_numbers() {
        assert_eq!(canonical_number::<u8>("7"), Some(7));
        assert_eq!(canonical_number::<u8>("0"), Some(0));
        assert_eq!(canonical_number::<u8>("07"), None);
        assert_eq!(canonical_number::<u8>("+7"), None);
        assert_eq!(canonical_number::<u8>(""), None);
        assert_eq!(canonical_number::<u8>("300"), None);
        assert_eq!(canonical_number::<i32>("2024"), Some(2024));
    }

    #[test]
    fn test_child_ranges() {
        let cal = Gregorian;
        let feb = Node::Month {
            year: 2024,
            month: 2,
        };
        assert_eq!(
            feb.child("29", &cal),
            Some(Node::Day {
                year: 2024,
                month: 2,
                day: 29
            })
        );
        assert_eq!(feb.child("30", &cal), None);
        assert_eq!(feb.child("0", &cal), None);
        assert_eq!(Node::Year { year: 2024 }.child("13", &cal), None);
        assert_eq!(
            Node::UserRoot {
                user: "bob".to_string()
            }
            .child("2024", &cal),
            Some(Node::Year { year: 2024 })
        );
    }

    #[test]
    fn test_missing_folder() {
        let dir = TempDir::new().unwrap();
        let validator = TreeValidator::new(&Gregorian);
        let mut report = TreeReport::default();
        let status = validator
            .validate(
                &dir.path().join("nope"),
                &Node::Year { year: 2024 },
                &mut report,
            )
            .unwrap();
        assert_eq!(status, NodeStatus::NotFound);
    }

    #[test]
    fn test_day_folder_purges_foreign_entries() {
        let dir = TempDir::new().unwrap();
        // 2024-01-01 is a Monday
        let day_dir = dir.path().join("2024/1/1");
        write_file(&day_dir.join("1_day.dat"), FULL_DAY);
        write_file(&day_dir.join("extra/inner.txt"), "x");
        write_file(&day_dir.join("stray.txt"), "x");

        let validator = TreeValidator::new(&Gregorian);
        let mut report = TreeReport::default();
        let node = Node::Day {
            year: 2024,
            month: 1,
            day: 1,
        };
        assert_eq!(
            validator.validate(&day_dir, &node, &mut report).unwrap(),
            NodeStatus::Ok
        );
        assert_eq!(names_in(&day_dir), vec!["1_day.dat"]);
        assert_eq!(fs::read_to_string(day_dir.join("1_day.dat")).unwrap(), FULL_DAY);
        assert_eq!(report.entries_purged, 2);
    }

    #[test]
    fn test_year_beyond_calendar_purged() {
        let dir = TempDir::new().unwrap();
        let user_dir = dir.path().join("bob");
        write_file(&user_dir.join("bob_foods.dat"), "{rice/130/2.7/28/0.3/0.4/100}|");
        write_file(&user_dir.join("300000/1/1/1_day.dat"), FULL_DAY);

        let cal = Gregorian;
        let node = Node::UserRoot {
            user: "bob".to_string(),
        };
        assert_eq!(node.child("300000", &cal), None);

        let validator = TreeValidator::new(&cal);
        let mut report = TreeReport::default();
        assert_eq!(
            validator.validate(&user_dir, &node, &mut report).unwrap(),
            NodeStatus::Ok
        );
        assert_eq!(names_in(&user_dir), vec!["bob_foods.dat"]);
        assert_eq!(report.entries_purged, 1);
    }

    #[test]
    fn test_day_folder_with_corrupted_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let day_dir = dir.path().join("1");
        write_file(&day_dir.join("1_day.dat"), "{x}|{y}|");

        let validator = TreeValidator::new(&Gregorian);
        let mut report = TreeReport::default();
        let node = Node::Day {
            year: 2024,
            month: 1,
            day: 1,
        };
        assert_eq!(
            validator.validate(&day_dir, &node, &mut report).unwrap(),
            NodeStatus::Empty
        );
        assert_eq!(report.files_removed, 1);
    }

    #[test]
    fn test_day_file_name_comes_from_calendar() {
        let dir = TempDir::new().unwrap();
        let day_dir = dir.path().join("5");
        write_file(&day_dir.join("3_day.dat"), FULL_DAY);
        write_file(&day_dir.join("1_day.dat"), FULL_DAY);

        let calendar = FixedCalendar::wednesdays();
        let validator = TreeValidator::new(&calendar);
        let mut report = TreeReport::default();
        let node = Node::Day {
            year: 2024,
            month: 1,
            day: 5,
        };
        validator.validate(&day_dir, &node, &mut report).unwrap();
        assert_eq!(names_in(&day_dir), vec!["3_day.dat"]);
    }

    #[test]
    fn test_user_tree_closure() {
        let dir = TempDir::new().unwrap();
        let user_dir = dir.path().join("bob");
        write_file(&user_dir.join("bob_foods.dat"), "garbage|");
        write_file(&user_dir.join("notes.txt"), "x");
        fs::create_dir_all(user_dir.join("2025")).unwrap();
        write_file(&user_dir.join("2024/13/1/1_day.dat"), FULL_DAY);
        write_file(&user_dir.join("2024/02/1/x"), "x");
        write_file(&user_dir.join("2024/2/30/5_day.dat"), FULL_DAY);
        // 2024-02-29 is a Thursday, so this file has the wrong name.
        write_file(&user_dir.join("2024/2/29/1_day.dat"), FULL_DAY);
        // 2023-01-01 is a Sunday; the shadow holds the last committed state.
        write_file(&user_dir.join("2023/1/1/7_day.dat"), "{1}|");
        write_file(
            &user_dir.join("2023/1/1/.shadow_7_day.dat"),
            "{1}|{2}|{3}|{4}|{5}|{_END_}|",
        );

        let validator = TreeValidator::new(&Gregorian);
        let mut report = TreeReport::default();
        let node = Node::UserRoot {
            user: "bob".to_string(),
        };
        assert_eq!(
            validator.validate(&user_dir, &node, &mut report).unwrap(),
            NodeStatus::Ok
        );

        assert_eq!(names_in(&user_dir), vec!["2023"]);
        assert_eq!(names_in(&user_dir.join("2023/1/1")), vec!["7_day.dat"]);
        assert_eq!(
            fs::read_to_string(user_dir.join("2023/1/1/7_day.dat")).unwrap(),
            "{1}|{2}|{3}|{4}|{5}|"
        );
        assert_eq!(
            report,
            TreeReport {
                files_repaired: 0,
                files_removed: 1,
                entries_purged: 9,
                shadows_restored: 1,
                shadows_discarded: 0,
            }
        );
    }

    #[test]
    fn test_user_tree_second_pass_is_clean() {
        let dir = TempDir::new().unwrap();
        let user_dir = dir.path().join("bob");
        write_file(&user_dir.join("bob_foods.dat"), "{apple/52/0.3/14/0.2/2.4/100}|");
        write_file(&user_dir.join("2023/1/1/7_day.dat"), "{1}|{2}|");
        write_file(&user_dir.join("junk"), "x");

        let validator = TreeValidator::new(&Gregorian);
        let node = Node::UserRoot {
            user: "bob".to_string(),
        };
        let mut first = TreeReport::default();
        validator.validate(&user_dir, &node, &mut first).unwrap();
        assert_eq!(first.files_repaired, 1);
        assert_eq!(first.entries_purged, 1);

        let mut second = TreeReport::default();
        assert_eq!(
            validator.validate(&user_dir, &node, &mut second).unwrap(),
            NodeStatus::Ok
        );
        assert!(second.is_clean());
    }

    #[test]
    fn test_user_with_only_empty_foods_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let user_dir = dir.path().join("bob");
        write_file(&user_dir.join("bob_foods.dat"), "");

        let validator = TreeValidator::new(&Gregorian);
        let mut report = TreeReport::default();
        let node = Node::UserRoot {
            user: "bob".to_string(),
        };
        assert_eq!(
            validator.validate(&user_dir, &node, &mut report).unwrap(),
            NodeStatus::Empty
        );
    }
}
