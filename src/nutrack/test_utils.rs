use crate::calendar::{Calendar, Gregorian, Weekday};
use crate::layout::DataLayout;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    // Held so the directory lives as long as the test
    pub _temp_dir: TempDir,
    pub layout: DataLayout,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    /// A temp dir whose `data` folder does not exist yet.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().join("data");
        Self {
            layout: DataLayout::new(&root),
            _temp_dir: temp_dir,
            root,
        }
    }

    /// A temp dir with an empty registry and users folder.
    pub fn initialized() -> Self {
        let env = Self::new();
        fs::create_dir_all(env.layout.users_dir()).expect("failed to create usr");
        fs::write(env.layout.registry(), "").expect("failed to create registry");
        env
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative);
        write_file(&path, content);
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).expect("failed to read file")
    }
}

/// Writes `content` to `path`, creating parent folders.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create parent");
    }
    fs::write(path, content).expect("failed to write file");
}

/// Gregorian month lengths with every day falling on the same weekday.
pub struct FixedCalendar {
    weekday: Weekday,
}

impl FixedCalendar {
    pub fn new(weekday: Weekday) -> Self {
        Self { weekday }
    }

    pub fn wednesdays() -> Self {
        Self::new(Weekday::Wednesday)
    }
}

impl Calendar for FixedCalendar {
    fn day_of_week(&self, _year: i32, _month: u8, _day: u8) -> Weekday {
        self.weekday
    }

    fn month_length(&self, month: u8, year: i32) -> u8 {
        Gregorian.month_length(month, year)
    }
}
