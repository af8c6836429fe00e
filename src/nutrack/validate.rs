//! # File Validation and Repair
//!
//! Every data file is checked against its [`RecordKind`] schema before use.
//! Two entry points share one scanner:
//!
//! - [`validate_and_repair`] is the healing pass run by the tree walk and the
//!   bootstrap. It drops invalid and duplicate records, fixes a day file's
//!   cardinality, and rewrites the file (under a [`ShadowGuard`]) when
//!   anything changed.
//! - [`load_records`] is the strict read used before a mutation. It never
//!   writes; anything the healing pass would have changed is `Corrupted`.
//!
//! Schema problems are never errors here: they become dropped records or a
//! `Corrupted` outcome. Only filesystem failures return `Err`.

use crate::codec::{decode, render_records, split_records, SEPARATOR};
use crate::error::{IoOp, NutrackError, Result};
use crate::model::{DayRecord, Record, RecordKind, MACRO_COUNT};
use crate::shadow::{self, ShadowGuard};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Result of one validation pass over a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NotFound,
    /// Zero-length user or food file
    Empty,
    /// No valid record survived (or an empty day file). The file is left as
    /// it was; the caller decides whether to delete it.
    Corrupted,
    /// The file was rewritten with the retained records.
    Repaired { dropped: usize, padded: usize },
    AlreadyValid,
}

#[derive(Debug, Default)]
struct Scan {
    kept: Vec<Record>,
    dropped: usize,
    padded: usize,
}

impl Scan {
    fn is_clean(&self) -> bool {
        self.dropped == 0 && self.padded == 0
    }
}

fn scan(content: &str, kind: RecordKind) -> Scan {
    let mut scan = Scan::default();

    for chunk in split_records(content) {
        let record = match decode(chunk, kind) {
            Ok(record) => record,
            Err(e) => {
                debug!(record = chunk, error = %e, "invalid record");
                scan.dropped += 1;
                continue;
            }
        };

        let keep = match kind {
            RecordKind::User => !scan.kept.contains(&record),
            RecordKind::Food => !scan.kept.iter().any(|k| k.key() == record.key()),
            RecordKind::Day => scan.kept.len() < MACRO_COUNT,
        };
        if keep {
            scan.kept.push(record);
        } else {
            debug!(record = chunk, "duplicate or excess record");
            scan.dropped += 1;
        }
    }

    if kind == RecordKind::Day && !scan.kept.is_empty() {
        while scan.kept.len() < MACRO_COUNT {
            scan.kept.push(Record::Day(DayRecord::zero()));
            scan.padded += 1;
        }
    }

    scan
}

/// Validates `path` as a file of `kind`, rewriting it when records had to be
/// dropped or padded. A lingering shadow is resolved before the file is read.
pub fn validate_and_repair(path: &Path, kind: RecordKind) -> Result<Outcome> {
    shadow::recover(path)?;
    if !path.is_file() {
        return Ok(Outcome::NotFound);
    }
    let content = read_content(path)?;
    if content.is_empty() {
        return Ok(if kind.allows_empty() {
            Outcome::Empty
        } else {
            Outcome::Corrupted
        });
    }

    let scan = scan(&content, kind);
    if scan.kept.is_empty() {
        return Ok(Outcome::Corrupted);
    }
    // A body whose last record lacks its `|` is normalized too.
    if scan.is_clean() && content.ends_with(SEPARATOR) {
        return Ok(Outcome::AlreadyValid);
    }

    rewrite(path, &scan.kept)?;
    info!(
        path = %path.display(),
        dropped = scan.dropped,
        padded = scan.padded,
        "repaired {} file",
        kind
    );
    Ok(Outcome::Repaired {
        dropped: scan.dropped,
        padded: scan.padded,
    })
}

/// Strictly loads a file of `kind` without modifying it.
///
/// An empty user or food file is an empty list. Invalid records, duplicate
/// keys and a day file without exactly one record per macro are `Corrupted`.
pub fn load_records(path: &Path, kind: RecordKind) -> Result<Vec<Record>> {
    if !path.is_file() {
        return Err(NutrackError::NotFound(path.to_path_buf()));
    }
    let content = read_content(path)?;
    if content.is_empty() {
        if kind.allows_empty() {
            return Ok(Vec::new());
        }
        return Err(NutrackError::Corrupted(path.to_path_buf()));
    }

    let scan = scan(&content, kind);
    if scan.kept.is_empty() || !scan.is_clean() {
        return Err(NutrackError::Corrupted(path.to_path_buf()));
    }
    Ok(scan.kept)
}

/// Replaces the content of `path` with `records`. A file that already has
/// content is protected by a shadow for the duration of the write; a missing
/// or empty file has nothing to lose and is written directly.
pub fn rewrite(path: &Path, records: &[Record]) -> Result<()> {
    let has_content = fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false);

    if has_content {
        let guard = ShadowGuard::begin(path)?;
        write_records(path, records)?;
        guard.finish()?;
    } else {
        write_records(path, records)?;
    }
    Ok(())
}

fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    fs::write(path, render_records(records)).map_err(NutrackError::io(IoOp::Write, path))
}

/// Reads a file as text. Bytes that are not UTF-8 become U+FFFD, which no
/// record grammar accepts.
fn read_content(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(NutrackError::io(IoOp::Read, path))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shadow::shadow_path;
    use tempfile::TempDir;

    fn file_with(name: &str, content: &[u8]) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.dat");
        assert_eq!(
            validate_and_repair(&path, RecordKind::User).unwrap(),
            Outcome::NotFound
        );
        assert_eq!(
            validate_and_repair(dir.path(), RecordKind::User).unwrap(),
            Outcome::NotFound
        );
    }

    #[test]
    fn test_empty_file_per_kind() {
        let (_dir, path) = file_with("f.dat", b"");
        assert_eq!(
            validate_and_repair(&path, RecordKind::User).unwrap(),
            Outcome::Empty
        );
        assert_eq!(
            validate_and_repair(&path, RecordKind::Food).unwrap(),
            Outcome::Empty
        );
        assert_eq!(
            validate_and_repair(&path, RecordKind::Day).unwrap(),
            Outcome::Corrupted
        );
    }

    #[test]
    fn test_valid_file_untouched() {
        let (_dir, path) = file_with("users.dat", b"{alice}|{bob}|");
        assert_eq!(
            validate_and_repair(&path, RecordKind::User).unwrap(),
            Outcome::AlreadyValid
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "{alice}|{bob}|");
    }

    #[test]
    fn test_lingering_shadow_restored_before_scan() {
        let (_dir, path) = file_with("users.dat", b"{alice}|{bo");
        fs::write(shadow_path(&path), "{alice}|{bob}|{carol}|{_END_}|").unwrap();

        assert_eq!(
            validate_and_repair(&path, RecordKind::User).unwrap(),
            Outcome::AlreadyValid
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "{alice}|{bob}|{carol}|");
        assert!(!shadow_path(&path).exists());
    }

    #[test]
    fn test_lingering_shadow_of_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.dat");
        fs::write(shadow_path(&path), "{alice}|{_END_}|").unwrap();

        assert_eq!(
            validate_and_repair(&path, RecordKind::User).unwrap(),
            Outcome::AlreadyValid
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "{alice}|");
    }

    #[test]
    fn test_registry_drops_invalid_and_duplicates() {
        let (_dir, path) = file_with("users.dat", b"{alice}|{b0b}||{bob}|{alice}|garbage|");
        assert_eq!(
            validate_and_repair(&path, RecordKind::User).unwrap(),
            Outcome::Repaired {
                dropped: 4,
                padded: 0
            }
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "{alice}|{bob}|");
        assert!(!shadow_path(&path).exists());
    }

    #[test]
    fn test_day_file_excess_records_dropped() {
        let (_dir, path) = file_with("1_day.dat", b"{1}|{2}|{3}|{4}|{5}|{6}|{7}|");
        assert_eq!(
            validate_and_repair(&path, RecordKind::Day).unwrap(),
            Outcome::Repaired {
                dropped: 2,
                padded: 0
            }
        );
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{1.0}|{2.0}|{3.0}|{4.0}|{5.0}|"
        );
    }

    #[test]
    fn test_day_file_short_is_padded() {
        let (_dir, path) = file_with("1_day.dat", b"{1800.5}|{90}|{200}|");
        assert_eq!(
            validate_and_repair(&path, RecordKind::Day).unwrap(),
            Outcome::Repaired {
                dropped: 0,
                padded: 2
            }
        );
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{1800.5}|{90.0}|{200.0}|{0.0}|{0.0}|"
        );
    }

    #[test]
    fn test_food_duplicate_names_keep_first() {
        let (_dir, path) = file_with(
            "bob_foods.dat",
            b"{apple/52/0.3/14/0.2/2.4/100}|{apple/60/1/15/0/3/120}|{rice/130/2.7/28/0.3/0.4/100}|",
        );
        assert_eq!(
            validate_and_repair(&path, RecordKind::Food).unwrap(),
            Outcome::Repaired {
                dropped: 1,
                padded: 0
            }
        );
        let records = load_records(&path, RecordKind::Food).unwrap();
        assert_eq!(records.len(), 2);
        match &records[0] {
            Record::Food(food) => {
                assert_eq!(food.name, "apple");
                assert_eq!(food.macros[0], 52.0);
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_nothing_valid_is_corrupted_and_untouched() {
        let (_dir, path) = file_with("users.dat", b"{1}|{2}|");
        assert_eq!(
            validate_and_repair(&path, RecordKind::User).unwrap(),
            Outcome::Corrupted
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "{1}|{2}|");
    }

    #[test]
    fn test_invalid_utf8_record_dropped() {
        let (_dir, path) = file_with("users.dat", b"{alice}|{b\xffb}|");
        assert_eq!(
            validate_and_repair(&path, RecordKind::User).unwrap(),
            Outcome::Repaired {
                dropped: 1,
                padded: 0
            }
        );
        assert_eq!(fs::read(&path).unwrap(), b"{alice}|");
    }

    #[test]
    fn test_missing_final_separator_is_normalized() {
        let (_dir, path) = file_with("users.dat", b"{alice}|{bob}");
        assert_eq!(
            validate_and_repair(&path, RecordKind::User).unwrap(),
            Outcome::Repaired {
                dropped: 0,
                padded: 0
            }
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "{alice}|{bob}|");
    }

    #[test]
    fn test_repair_is_idempotent() {
        let (_dir, path) = file_with("1_day.dat", b"{1}|x|{2}|");
        let first = validate_and_repair(&path, RecordKind::Day).unwrap();
        assert!(matches!(first, Outcome::Repaired { .. }));
        let after_first = fs::read(&path).unwrap();

        assert_eq!(
            validate_and_repair(&path, RecordKind::Day).unwrap(),
            Outcome::AlreadyValid
        );
        assert_eq!(fs::read(&path).unwrap(), after_first);
    }

    #[test]
    fn test_load_records_strict() {
        let (_dir, path) = file_with("users.dat", b"{alice}|{bob}|");
        assert_eq!(load_records(&path, RecordKind::User).unwrap().len(), 2);

        fs::write(&path, "{alice}|{alice}|").unwrap();
        assert!(matches!(
            load_records(&path, RecordKind::User),
            Err(NutrackError::Corrupted(_))
        ));
        // Strict loads never repair.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{alice}|{alice}|");

        fs::write(&path, "").unwrap();
        assert!(load_records(&path, RecordKind::User).unwrap().is_empty());
        assert!(matches!(
            load_records(&path, RecordKind::Day),
            Err(NutrackError::Corrupted(_))
        ));

        fs::write(&path, "{1}|{2}|").unwrap();
        assert!(matches!(
            load_records(&path, RecordKind::Day),
            Err(NutrackError::Corrupted(_))
        ));
    }

    #[test]
    fn test_load_records_missing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_records(&dir.path().join("users.dat"), RecordKind::User),
            Err(NutrackError::NotFound(_))
        ));
    }

    #[test]
    fn test_rewrite_new_and_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.dat");
        let alice = Record::User(crate::model::UserRecord {
            name: "alice".to_string(),
        });

        rewrite(&path, std::slice::from_ref(&alice)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{alice}|");

        rewrite(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert!(!shadow_path(&path).exists());
    }
}
