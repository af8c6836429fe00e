use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of tracked macros. Fixed: food records carry this many macro fields
/// and a day file carries exactly this many records.
pub const MACRO_COUNT: usize = 5;

/// Tracked macros in their storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Macro {
    Calories,
    Proteins,
    Carbohydrates,
    Fats,
    Fiber,
}

impl Macro {
    pub const ALL: [Macro; MACRO_COUNT] = [
        Macro::Calories,
        Macro::Proteins,
        Macro::Carbohydrates,
        Macro::Fats,
        Macro::Fiber,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Macro::Calories => "Calories",
            Macro::Proteins => "Proteins",
            Macro::Carbohydrates => "Carbohydrates",
            Macro::Fats => "Fats",
            Macro::Fiber => "Fiber",
        }
    }
}

pub type MacroValues = [f64; MACRO_COUNT];

/// The three kinds of data file. Each kind has one fixed record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// `users.dat`, the registry
    User,
    /// `<user>_foods.dat`
    Food,
    /// `<weekday>_day.dat`
    Day,
}

impl RecordKind {
    /// Number of `/`-separated fields in one record of this kind.
    pub fn arity(&self) -> usize {
        match self {
            RecordKind::User => 1,
            RecordKind::Food => MACRO_COUNT + 2,
            RecordKind::Day => 1,
        }
    }

    /// Whether a zero-length file of this kind is a legitimate state.
    pub fn allows_empty(&self) -> bool {
        !matches!(self, RecordKind::Day)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::User => write!(f, "user"),
            RecordKind::Food => write!(f, "food"),
            RecordKind::Day => write!(f, "day"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,
    pub macros: MacroValues,
    pub portion: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub value: f64,
}

impl DayRecord {
    pub fn zero() -> Self {
        Self { value: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    User(UserRecord),
    Food(FoodRecord),
    Day(DayRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::User(_) => RecordKind::User,
            Record::Food(_) => RecordKind::Food,
            Record::Day(_) => RecordKind::Day,
        }
    }

    /// The uniqueness key within a file: the name for users and foods.
    /// Day records are positional and have no key.
    pub fn key(&self) -> Option<&str> {
        match self {
            Record::User(user) => Some(&user.name),
            Record::Food(food) => Some(&food.name),
            Record::Day(_) => None,
        }
    }
}

impl From<UserRecord> for Record {
    fn from(user: UserRecord) -> Self {
        Record::User(user)
    }
}

impl From<FoodRecord> for Record {
    fn from(food: FoodRecord) -> Self {
        Record::Food(food)
    }
}

impl From<DayRecord> for Record {
    fn from(day: DayRecord) -> Self {
        Record::Day(day)
    }
}

/// The five macro sums stored for one day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroTotals {
    pub values: MacroValues,
}

impl MacroTotals {
    pub fn get(&self, m: Macro) -> f64 {
        self.values[m as usize]
    }

    pub fn add(&mut self, delta: &MacroValues) {
        for (total, d) in self.values.iter_mut().zip(delta) {
            *total += d;
        }
    }

    pub fn to_records(self) -> Vec<Record> {
        self.values
            .iter()
            .map(|&value| Record::Day(DayRecord { value }))
            .collect()
    }

    /// Rebuilds totals from a day file's records. Callers pass a strictly
    /// loaded day file, so the positions line up with [`Macro::ALL`].
    pub fn from_records(records: &[Record]) -> Self {
        let mut totals = MacroTotals::default();
        for (slot, record) in totals.values.iter_mut().zip(records) {
            if let Record::Day(day) = record {
                *slot = day.value;
            }
        }
        totals
    }
}
