//! # CLI Layer
//!
//! One possible UI client for nutrack. This is the only place that parses
//! arguments, writes to stdout/stderr and decides exit codes.
//!
//! - `run()`: main dispatch (called by `main.rs`)
//! - `init_context()`: resolves paths and builds the API
//! - `handle_*()`: per-command handlers that call the API and print
//!
//! Every command except `config` starts by bootstrapping the data folder.

use super::print::{
    print_config, print_day, print_foods, print_messages, print_notices, print_users,
};
use super::setup::{
    Cli, Commands, DayCommands, FoodArgs, FoodCommands, OrphanCommands, UserCommands,
};
use clap::Parser;
use nutrack::api::{ConfigAction, FoodInput, NutrackApi};
use nutrack::bootstrap::OrphanAction;
use nutrack::commands::doctor::{orphan_hints, repair_summary};
use nutrack::commands::NutrackPaths;
use nutrack::config::{default_config_dir, default_home_dir, NutrackConfig};
use nutrack::error::Result;
use nutrack::layout::DATA_DIR;
use nutrack::logging::{init_subscriber, Verbosity};
use std::path::PathBuf;

/// Overrides the folder holding `data/`.
pub const HOME_ENV: &str = "NUTRACK_HOME";
/// Overrides the folder holding `config.json`.
pub const CONFIG_DIR_ENV: &str = "NUTRACK_CONFIG_DIR";

struct AppContext {
    api: NutrackApi,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet));
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Config { key, value } => handle_config(&ctx, key, value),
        Commands::Doctor => handle_doctor(&ctx),
        command => {
            let show_orphans = !matches!(command, Commands::Orphans { .. });
            startup(&ctx, show_orphans)?;
            match command {
                Commands::Users { action } => handle_users(&ctx, action),
                Commands::Foods { action } => handle_foods(&ctx, action),
                Commands::Day { action } => handle_day(&ctx, action),
                Commands::Orphans { action } => handle_orphans(&ctx, action),
                Commands::Config { .. } | Commands::Doctor => Ok(()),
            }
        }
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = match env_path(CONFIG_DIR_ENV) {
        Some(dir) => dir,
        None => default_config_dir()?,
    };
    let config = NutrackConfig::load(&config_dir)?;

    // 1. --data-dir, 2. NUTRACK_HOME, 3. config, 4. platform data dir
    let home = match cli
        .data_dir
        .clone()
        .or_else(|| env_path(HOME_ENV))
        .or(config.data_dir)
    {
        Some(dir) => dir,
        None => default_home_dir()?,
    };

    let paths = NutrackPaths {
        data: home.join(DATA_DIR),
        config: config_dir,
    };
    Ok(AppContext {
        api: NutrackApi::new(paths),
    })
}

/// Reconciles the data folder before a command runs.
fn startup(ctx: &AppContext, show_orphans: bool) -> Result<()> {
    let report = ctx.api.bootstrap()?;
    let mut notices = repair_summary(&report);
    if show_orphans {
        notices.extend(orphan_hints(&report));
    }
    print_notices(&notices);
    Ok(())
}

fn handle_doctor(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_users(ctx: &AppContext, action: UserCommands) -> Result<()> {
    let result = match action {
        UserCommands::List => ctx.api.list_users()?,
        UserCommands::Add { name } => ctx.api.add_user(&name)?,
        UserCommands::Remove { name, backup } => ctx.api.remove_user(&name, backup.as_deref())?,
    };
    print_users(&result.listed_users);
    print_messages(&result.messages);
    Ok(())
}

fn food_input(args: &FoodArgs) -> FoodInput {
    FoodInput {
        name: args.name.clone(),
        macros: args.macros.values(),
        portion: args.portion,
    }
}

fn handle_foods(ctx: &AppContext, action: FoodCommands) -> Result<()> {
    match action {
        FoodCommands::List { user } => {
            let result = ctx.api.list_foods(&user)?;
            print_foods(&result.listed_foods);
            print_messages(&result.messages);
        }
        FoodCommands::Add(args) => {
            let result = ctx.api.add_food(&args.user, food_input(&args))?;
            print_messages(&result.messages);
        }
        FoodCommands::Update(args) => {
            let result = ctx.api.update_food(&args.user, food_input(&args))?;
            print_messages(&result.messages);
        }
        FoodCommands::Remove { user, name } => {
            let result = ctx.api.remove_food(&user, &name)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_day(ctx: &AppContext, action: DayCommands) -> Result<()> {
    let result = match action {
        DayCommands::Show { user, date } => ctx.api.show_day(&user, date)?,
        DayCommands::Add { user, macros, date } => {
            ctx.api.add_day(&user, date, &macros.values())?
        }
    };
    print_messages(&result.messages);
    if let Some(day) = &result.day {
        print_day(day);
    }
    Ok(())
}

fn handle_orphans(ctx: &AppContext, action: OrphanCommands) -> Result<()> {
    let result = match action {
        OrphanCommands::Restore { name } => ctx.api.resolve_orphan(&name, OrphanAction::Restore)?,
        OrphanCommands::Delete { name } => ctx.api.resolve_orphan(&name, OrphanAction::Delete)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}
