use colored::Colorize;
use nutrack::api::{CmdMessage, MessageLevel};
use nutrack::commands::DayTotals;
use nutrack::config::{NutrackConfig, KEYS};
use nutrack::model::{FoodRecord, Macro};
use nutrack::names::to_display_name;

const NAME_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 13;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Messages about the startup repair pass go to stderr so they never mix
/// with a command's own output.
pub(super) fn print_notices(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Warning | MessageLevel::Error => {
                eprintln!("{}", message.content.yellow())
            }
            MessageLevel::Info | MessageLevel::Success => {
                eprintln!("{}", message.content.dimmed())
            }
        }
    }
}

pub(super) fn print_users(users: &[String]) {
    for user in users {
        println!("{}", to_display_name(user));
    }
}

pub(super) fn print_foods(foods: &[FoodRecord]) {
    if foods.is_empty() {
        return;
    }
    let mut header = format!("{:<width$}", "Food", width = NAME_WIDTH);
    for m in Macro::ALL {
        header.push_str(&format!(" {:>width$}", m.label(), width = VALUE_WIDTH));
    }
    header.push_str(&format!(" {:>width$}", "Portion", width = VALUE_WIDTH));
    println!("{}", header.bold());

    for food in foods {
        let mut line = format!("{:<width$}", to_display_name(&food.name), width = NAME_WIDTH);
        for value in food.macros {
            line.push_str(&format!(" {:>width$}", value, width = VALUE_WIDTH));
        }
        line.push_str(&format!(" {:>width$}", food.portion, width = VALUE_WIDTH));
        println!("{}", line);
    }
}

pub(super) fn print_day(day: &DayTotals) {
    println!("{}", day.date.to_string().bold());
    for m in Macro::ALL {
        println!(
            "  {:<width$} {}",
            m.label(),
            day.totals.get(m),
            width = VALUE_WIDTH
        );
    }
}

pub(super) fn print_config(config: &NutrackConfig) {
    for key in KEYS {
        println!("{} = {}", key, config.get(key).unwrap_or_default());
    }
}
