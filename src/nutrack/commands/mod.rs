//! # Commands
//!
//! One module per command group. Each `run`-style function takes the store
//! (or paths), performs one operation and returns a [`CmdResult`]: structured
//! data for the caller to render plus user-facing messages. Nothing here
//! prints.

use crate::bootstrap::BootstrapReport;
use crate::calendar::Date;
use crate::config::NutrackConfig;
use crate::model::{FoodRecord, MacroTotals};
use std::path::PathBuf;

pub mod config;
pub mod days;
pub mod doctor;
pub mod foods;
pub mod orphans;
pub mod users;

/// Where nutrack keeps its files.
#[derive(Debug, Clone)]
pub struct NutrackPaths {
    /// The `data` folder.
    pub data: PathBuf,
    /// Folder holding `config.json`.
    pub config: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A day's totals as returned by the day commands.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTotals {
    pub date: Date,
    pub totals: MacroTotals,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed_users: Vec<String>,
    pub listed_foods: Vec<FoodRecord>,
    pub day: Option<DayTotals>,
    pub report: Option<BootstrapReport>,
    pub paths: Vec<PathBuf>,
    pub config: Option<NutrackConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_users(mut self, users: Vec<String>) -> Self {
        self.listed_users = users;
        self
    }

    pub fn with_listed_foods(mut self, foods: Vec<FoodRecord>) -> Self {
        self.listed_foods = foods;
        self
    }

    pub fn with_day(mut self, date: Date, totals: MacroTotals) -> Self {
        self.day = Some(DayTotals { date, totals });
        self
    }

    pub fn with_report(mut self, report: BootstrapReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_config(mut self, config: NutrackConfig) -> Self {
        self.config = Some(config);
        self
    }
}
