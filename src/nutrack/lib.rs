//! # Nutrack Architecture
//!
//! Nutrack is a **personal nutrition tracker built on a self-healing flat-file
//! store**. Users, their foods and their per-day macro totals live in plain
//! text files under a single `data` folder. Every session begins by walking
//! that folder and putting it back into a known-good shape, so a crash in the
//! middle of a write never costs more than the write itself.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, defaults the date to today    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One operation per function, returns CmdResult            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record Store (store/) + Bootstrap (bootstrap.rs)           │
//! │  - Typed reads and writes of users, foods and days          │
//! │  - Startup reconciliation of the whole data folder          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  File Layer                                                 │
//! │  - codec.rs: `{f1/f2}|` record text                         │
//! │  - shadow.rs: shadow copies for crash-safe rewrites         │
//! │  - validate.rs: per-file validate and repair                │
//! │  - tree.rs: recursive walk of a user's year/month/day tree  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## On-disk Layout
//!
//! ```text
//! data/
//!   users.dat                       {alice}|{bob}|
//!   usr/
//!     alice/
//!       alice_foods.dat             {apple/52/0.3/14/0.2/2.4/100}|
//!       2024/
//!         2/
//!           29/
//!             4_day.dat             {1200.0}|{80.0}|{150.0}|{40.0}|{25.0}|
//! ```
//!
//! A day file is named after the day of the week (1 = Monday) and always
//! holds exactly one record per macro.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code returns regular Rust types, logs through
//! `tracing` and never writes to stdout/stderr or exits the process.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per command group
//! - [`store`]: Typed record store over the data folder
//! - [`bootstrap`]: Startup reconciliation and orphan resolution
//! - [`tree`]: Recursive validation of a user's date tree
//! - [`validate`]: Validate and repair a single record file
//! - [`shadow`]: Shadow-copy protocol for atomic rewrites
//! - [`codec`]: Record encoding and decoding
//! - [`model`]: Record types and macro totals
//! - [`names`]: Name grammar and in-file/display conversion
//! - [`calendar`]: Dates and the day-of-week oracle
//! - [`layout`]: Paths inside the data folder
//! - [`config`]: Configuration management
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod bootstrap;
pub mod calendar;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod model;
pub mod names;
pub mod shadow;
pub mod store;
pub mod tree;
pub mod validate;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
