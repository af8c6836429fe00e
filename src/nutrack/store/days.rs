use super::RecordStore;
use crate::calendar::Date;
use crate::codec;
use crate::error::{IoOp, NutrackError, Result};
use crate::model::{DayRecord, MacroTotals, MacroValues, Record, RecordKind};
use std::fs;
use tracing::info;

impl RecordStore {
    /// Macro totals recorded for `date`. A day with no file is all zeros.
    pub fn day_macros(&self, user: &str, date: &Date) -> Result<MacroTotals> {
        let user = self.require_user(user)?;
        let path = self.layout.day_file(&user, date, self.calendar());
        match self.load(&path, RecordKind::Day) {
            Ok(records) => Ok(MacroTotals::from_records(&records)),
            Err(NutrackError::NotFound(_)) => Ok(MacroTotals::default()),
            Err(e) => Err(e),
        }
    }

    /// Adds `delta` to the totals for `date`, creating the day's folders and
    /// file on first use. Returns the new totals.
    pub fn add_day_macros(&self, user: &str, date: &Date, delta: &MacroValues) -> Result<MacroTotals> {
        let user = self.require_user(user)?;
        for value in delta {
            codec::validate(&Record::Day(DayRecord { value: *value }))?;
        }

        let dir = self.layout.day_dir(&user, date);
        fs::create_dir_all(&dir).map_err(NutrackError::io(IoOp::Create, &dir))?;
        let path = self.layout.day_file(&user, date, self.calendar());

        let mut totals = match self.load(&path, RecordKind::Day) {
            Ok(records) => MacroTotals::from_records(&records),
            Err(NutrackError::NotFound(_)) => MacroTotals::default(),
            Err(e) => return Err(e),
        };
        totals.add(delta);

        let records = totals.to_records();
        for record in &records {
            codec::validate(record)?;
        }
        self.store(&path, &records)?;
        info!(user = %user, date = %date, "updated day totals");
        Ok(totals)
    }
}
