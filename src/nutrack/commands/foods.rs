use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{FoodRecord, MacroValues};
use crate::names::to_display_name;
use crate::store::RecordStore;

/// A food as typed by the user, before name normalization.
#[derive(Debug, Clone)]
pub struct FoodInput {
    pub name: String,
    pub macros: MacroValues,
    pub portion: u64,
}

impl From<FoodInput> for FoodRecord {
    fn from(input: FoodInput) -> Self {
        FoodRecord {
            name: input.name,
            macros: input.macros,
            portion: input.portion,
        }
    }
}

pub fn list(store: &RecordStore, user: &str) -> Result<CmdResult> {
    let foods = store.list_foods(user)?;
    let mut result = CmdResult::default();
    if foods.is_empty() {
        result.add_message(CmdMessage::info("No foods registered."));
    }
    Ok(result.with_listed_foods(foods))
}

pub fn add(store: &RecordStore, user: &str, food: FoodInput) -> Result<CmdResult> {
    let food = store.register_food(user, food.into())?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Registered food {}.",
        to_display_name(&food.name)
    )));
    Ok(result.with_listed_foods(vec![food]))
}

pub fn update(store: &RecordStore, user: &str, food: FoodInput) -> Result<CmdResult> {
    let food = store.modify_food(user, food.into())?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated food {}.",
        to_display_name(&food.name)
    )));
    Ok(result.with_listed_foods(vec![food]))
}

pub fn remove(store: &RecordStore, user: &str, name: &str) -> Result<CmdResult> {
    store.remove_food(user, name)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Removed food {}.", name)));
    Ok(result)
}
