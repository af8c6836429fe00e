//! # Record Store
//!
//! Crash-safe reads and mutations of the three file kinds, on top of the
//! validator and the shadow protocol.
//!
//! Every operation follows the same steps on its target file:
//!
//! 1. resolve a lingering shadow ([`shadow::recover`]),
//! 2. strictly load the file ([`load_records`]); corruption is an error here,
//!    healing is the bootstrap's job,
//! 3. change the records in memory,
//! 4. write them back with [`rewrite`], which holds a shadow for the duration
//!    of the write.
//!
//! The store expects a bootstrapped data root. Names passed in by callers are
//! display names (`"Green Apple"`) and are normalized with [`normalize_name`].
//!
//! Operations are split by file kind:
//! - [`users`]: the registry and user folders
//! - [`foods`]: per-user food lists
//! - [`days`]: per-day macro totals
//! - [`backup`]: user folder archives

pub mod backup;
pub mod days;
pub mod foods;
pub mod users;

use crate::calendar::{Calendar, Gregorian};
use crate::error::{NutrackError, Result};
use crate::layout::DataLayout;
use crate::model::{Record, RecordKind};
use crate::names::{to_in_file_name, validate_name};
use crate::shadow;
use crate::validate::{load_records, rewrite};
use std::path::Path;

pub struct RecordStore {
    layout: DataLayout,
    calendar: Box<dyn Calendar>,
}

impl RecordStore {
    pub fn new(layout: DataLayout) -> Self {
        Self::with_calendar(layout, Box::new(Gregorian))
    }

    pub fn with_calendar(layout: DataLayout, calendar: Box<dyn Calendar>) -> Self {
        Self { layout, calendar }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    pub fn calendar(&self) -> &dyn Calendar {
        self.calendar.as_ref()
    }

    /// Recovers and strictly loads `path`.
    fn load(&self, path: &Path, kind: RecordKind) -> Result<Vec<Record>> {
        shadow::recover(path)?;
        load_records(path, kind)
    }

    /// Like [`load`](Self::load), but a missing file is an empty list.
    fn load_or_empty(&self, path: &Path, kind: RecordKind) -> Result<Vec<Record>> {
        match self.load(path, kind) {
            Err(NutrackError::NotFound(_)) => Ok(Vec::new()),
            other => other,
        }
    }

    fn store(&self, path: &Path, records: &[Record]) -> Result<()> {
        rewrite(path, records)
    }
}

/// Converts a display name to its in-file form and validates it.
///
/// ```
/// use nutrack::store::normalize_name;
///
/// assert_eq!(normalize_name("Green Apple").unwrap(), "green_apple");
/// assert!(normalize_name("Green  Apple").is_err());
/// ```
pub fn normalize_name(input: &str) -> Result<String> {
    let name = to_in_file_name(input);
    validate_name(&name).map_err(|reason| NutrackError::InvalidName {
        name: input.to_string(),
        reason,
    })?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("bob").unwrap(), "bob");
        assert_eq!(normalize_name("Mary Ann").unwrap(), "mary_ann");
        assert!(matches!(
            normalize_name(" bob"),
            Err(NutrackError::InvalidName { .. })
        ));
        assert!(normalize_name("").is_err());
        assert!(normalize_name("r2d2").is_err());
    }
}
