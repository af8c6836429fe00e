use clap::{Args, Parser, Subcommand};
use nutrack::calendar::Date;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nutrack", bin_name = "nutrack", version)]
#[command(about = "Personal nutrition tracker with a self-healing flat-file store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Folder holding the `data` directory
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check and repair the data folder
    Doctor,

    /// Manage registered users
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage a user's foods
    Foods {
        #[command(subcommand)]
        action: FoodCommands,
    },

    /// Show or add to a day's macro totals
    Day {
        #[command(subcommand)]
        action: DayCommands,
    },

    /// Resolve user folders missing from the registry
    Orphans {
        #[command(subcommand)]
        action: OrphanCommands,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g. data-dir)
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List registered users
    #[command(alias = "ls")]
    List,

    /// Register a user
    Add {
        /// User name (letters, single spaces between words)
        name: String,
    },

    /// Remove a user and all their data
    #[command(alias = "rm")]
    Remove {
        name: String,

        /// Archive the user's folder into this directory first
        #[arg(long, value_name = "DIR")]
        backup: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FoodCommands {
    /// List a user's foods
    #[command(alias = "ls")]
    List { user: String },

    /// Register a food
    Add(FoodArgs),

    /// Replace an existing food's values
    Update(FoodArgs),

    /// Remove a food
    #[command(alias = "rm")]
    Remove { user: String, name: String },
}

#[derive(Args, Debug)]
pub struct FoodArgs {
    pub user: String,
    pub name: String,
    #[command(flatten)]
    pub macros: MacroArgs,
    /// Portion size the macros refer to
    pub portion: u64,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct MacroArgs {
    pub calories: f64,
    pub proteins: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub fiber: f64,
}

impl MacroArgs {
    pub fn values(&self) -> [f64; 5] {
        [
            self.calories,
            self.proteins,
            self.carbohydrates,
            self.fats,
            self.fiber,
        ]
    }
}

#[derive(Subcommand, Debug)]
pub enum DayCommands {
    /// Show a day's totals
    Show {
        user: String,

        /// Day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<Date>,
    },

    /// Add macros to a day's totals
    Add {
        user: String,

        #[command(flatten)]
        macros: MacroArgs,

        /// Day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<Date>,
    },
}

#[derive(Subcommand, Debug)]
pub enum OrphanCommands {
    /// Add the user back to the registry
    Restore { name: String },

    /// Delete the user's folder
    Delete { name: String },
}
