//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every nutrack operation, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the matching command function
//! - **Normalizes inputs** (an absent date becomes today)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic (that lives in `commands/*.rs` and `store/`) and
//! no printing.

use crate::bootstrap::{Bootstrap, BootstrapReport, OrphanAction};
use crate::calendar::Date;
use crate::commands::{self, CmdResult, NutrackPaths};
use crate::error::Result;
use crate::layout::DataLayout;
use crate::model::MacroValues;
use crate::store::RecordStore;
use std::path::Path;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::foods::FoodInput;
pub use crate::commands::{CmdMessage, MessageLevel};

pub struct NutrackApi {
    store: RecordStore,
    paths: NutrackPaths,
}

impl NutrackApi {
    pub fn new(paths: NutrackPaths) -> Self {
        let store = RecordStore::new(DataLayout::new(&paths.data));
        Self { store, paths }
    }

    pub fn with_store(store: RecordStore, paths: NutrackPaths) -> Self {
        Self { store, paths }
    }

    pub fn paths(&self) -> &NutrackPaths {
        &self.paths
    }

    /// Reconciles the data root. Every session starts with this.
    pub fn bootstrap(&self) -> Result<BootstrapReport> {
        Bootstrap::new(self.store.layout(), self.store.calendar()).run()
    }

    pub fn doctor(&self) -> Result<CmdResult> {
        commands::doctor::run(&self.store)
    }

    pub fn list_users(&self) -> Result<CmdResult> {
        commands::users::list(&self.store)
    }

    pub fn add_user(&self, name: &str) -> Result<CmdResult> {
        commands::users::add(&self.store, name)
    }

    pub fn remove_user(&self, name: &str, backup: Option<&Path>) -> Result<CmdResult> {
        commands::users::remove(&self.store, name, backup)
    }

    pub fn list_foods(&self, user: &str) -> Result<CmdResult> {
        commands::foods::list(&self.store, user)
    }

    pub fn add_food(&self, user: &str, food: FoodInput) -> Result<CmdResult> {
        commands::foods::add(&self.store, user, food)
    }

    pub fn update_food(&self, user: &str, food: FoodInput) -> Result<CmdResult> {
        commands::foods::update(&self.store, user, food)
    }

    pub fn remove_food(&self, user: &str, name: &str) -> Result<CmdResult> {
        commands::foods::remove(&self.store, user, name)
    }

    pub fn show_day(&self, user: &str, date: Option<Date>) -> Result<CmdResult> {
        commands::days::show(&self.store, user, date.unwrap_or_else(Date::today))
    }

    pub fn add_day(&self, user: &str, date: Option<Date>, delta: &MacroValues) -> Result<CmdResult> {
        commands::days::add(&self.store, user, date.unwrap_or_else(Date::today), delta)
    }

    pub fn resolve_orphan(&self, name: &str, action: OrphanAction) -> Result<CmdResult> {
        commands::orphans::run(&self.store, name, action)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }
}
