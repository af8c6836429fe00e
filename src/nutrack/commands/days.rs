use crate::calendar::Date;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::MacroValues;
use crate::store::RecordStore;

pub fn show(store: &RecordStore, user: &str, date: Date) -> Result<CmdResult> {
    let totals = store.day_macros(user, &date)?;
    Ok(CmdResult::default().with_day(date, totals))
}

pub fn add(store: &RecordStore, user: &str, date: Date, delta: &MacroValues) -> Result<CmdResult> {
    let totals = store.add_day_macros(user, &date, delta)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Updated totals for {}.", date)));
    Ok(result.with_day(date, totals))
}
