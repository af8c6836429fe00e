//! On-disk layout of the data root.
//!
//! ```text
//! data/
//!   users.dat                          registry
//!   usr/<user>/
//!     <user>_foods.dat
//!     <year>/<month>/<day>/<weekday>_day.dat
//! ```
//!
//! Every path the store touches is built here so the tree validator and the
//! writers agree on names. Numeric folders use plain decimal (`2024/3/5`).

use crate::calendar::{Calendar, Date, Weekday};
use std::path::{Path, PathBuf};

pub const REGISTRY_FILE: &str = "users.dat";
pub const USERS_DIR: &str = "usr";
pub const DATA_DIR: &str = "data";

const FOODS_SUFFIX: &str = "_foods.dat";
const DAY_SUFFIX: &str = "_day.dat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    /// `root` is the `data` folder itself.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    pub fn users_dir(&self) -> PathBuf {
        self.root.join(USERS_DIR)
    }

    pub fn user_dir(&self, user: &str) -> PathBuf {
        self.users_dir().join(user)
    }

    pub fn foods_file(&self, user: &str) -> PathBuf {
        self.user_dir(user).join(foods_file_name(user))
    }

    pub fn year_dir(&self, user: &str, year: i32) -> PathBuf {
        self.user_dir(user).join(year.to_string())
    }

    pub fn month_dir(&self, user: &str, year: i32, month: u8) -> PathBuf {
        self.year_dir(user, year).join(month.to_string())
    }

    pub fn day_dir(&self, user: &str, date: &Date) -> PathBuf {
        self.month_dir(user, date.year, date.month)
            .join(date.day.to_string())
    }

    pub fn day_file(&self, user: &str, date: &Date, calendar: &dyn Calendar) -> PathBuf {
        self.day_dir(user, date)
            .join(day_file_name(date.weekday(calendar)))
    }
}

pub fn foods_file_name(user: &str) -> String {
    format!("{}{}", user, FOODS_SUFFIX)
}

pub fn day_file_name(weekday: Weekday) -> String {
    format!("{}{}", weekday.number(), DAY_SUFFIX)
}
