use super::{normalize_name, RecordStore};
use crate::codec;
use crate::error::{IoOp, NutrackError, Result};
use crate::model::{FoodRecord, Record, RecordKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

fn into_foods(records: Vec<Record>) -> Vec<FoodRecord> {
    records
        .into_iter()
        .filter_map(|r| match r {
            Record::Food(food) => Some(food),
            _ => None,
        })
        .collect()
}

impl RecordStore {
    fn foods(&self, user: &str) -> Result<(PathBuf, Vec<FoodRecord>)> {
        let path = self.layout.foods_file(user);
        let foods = into_foods(self.load_or_empty(&path, RecordKind::Food)?);
        Ok((path, foods))
    }

    fn store_foods(&self, user: &str, path: &Path, foods: Vec<FoodRecord>) -> Result<()> {
        let dir = self.layout.user_dir(user);
        fs::create_dir_all(&dir).map_err(NutrackError::io(IoOp::Create, &dir))?;
        let records: Vec<Record> = foods.into_iter().map(Record::Food).collect();
        self.store(path, &records)
    }

    /// Normalizes the food's name and checks every field.
    fn checked_food(food: FoodRecord) -> Result<FoodRecord> {
        let food = FoodRecord {
            name: normalize_name(&food.name)?,
            ..food
        };
        codec::validate(&Record::Food(food.clone()))?;
        Ok(food)
    }

    pub fn list_foods(&self, user: &str) -> Result<Vec<FoodRecord>> {
        let user = self.require_user(user)?;
        Ok(self.foods(&user)?.1)
    }

    pub fn get_food(&self, user: &str, name: &str) -> Result<FoodRecord> {
        let user = self.require_user(user)?;
        let name = normalize_name(name)?;
        self.foods(&user)?
            .1
            .into_iter()
            .find(|f| f.name == name)
            .ok_or(NutrackError::FoodNotFound(name))
    }

    pub fn register_food(&self, user: &str, food: FoodRecord) -> Result<FoodRecord> {
        let user = self.require_user(user)?;
        let food = Self::checked_food(food)?;
        let (path, mut foods) = self.foods(&user)?;

        if foods.iter().any(|f| f.name == food.name) {
            return Err(NutrackError::FoodExists(food.name));
        }
        foods.push(food.clone());
        self.store_foods(&user, &path, foods)?;
        info!(user = %user, food = %food.name, "registered food");
        Ok(food)
    }

    /// Replaces the food with the same name.
    pub fn modify_food(&self, user: &str, food: FoodRecord) -> Result<FoodRecord> {
        let user = self.require_user(user)?;
        let food = Self::checked_food(food)?;
        let (path, mut foods) = self.foods(&user)?;

        let slot = foods
            .iter_mut()
            .find(|f| f.name == food.name)
            .ok_or_else(|| NutrackError::FoodNotFound(food.name.clone()))?;
        *slot = food.clone();
        self.store_foods(&user, &path, foods)?;
        info!(user = %user, food = %food.name, "modified food");
        Ok(food)
    }

    pub fn remove_food(&self, user: &str, name: &str) -> Result<()> {
        let user = self.require_user(user)?;
        let name = normalize_name(name)?;
        let (path, mut foods) = self.foods(&user)?;

        let before = foods.len();
        foods.retain(|f| f.name != name);
        if foods.len() == before {
            return Err(NutrackError::FoodNotFound(name));
        }
        self.store_foods(&user, &path, foods)?;
        info!(user = %user, food = %name, "removed food");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    fn food(name: &str, calories: f64) -> FoodRecord {
        FoodRecord {
            name: name.to_string(),
            macros: [calories, 1.0, 2.0, 3.0, 4.0],
            portion: 100,
        }
    }

    fn setup() -> (TestEnv, RecordStore) {
        let env = TestEnv::initialized();
        let store = RecordStore::new(env.layout.clone());
        store.register_user("bob").unwrap();
        (env, store)
    }

    #[test]
    fn test_missing_foods_file_is_empty() {
        let (_env, store) = setup();
        assert!(store.list_foods("bob").unwrap().is_empty());
    }

    #[test]
    fn test_register_and_get() {
        let (env, store) = setup();
        let apple = store.register_food("bob", food("Green Apple", 52.0)).unwrap();
        assert_eq!(apple.name, "green_apple");

        assert_eq!(store.get_food("bob", "green apple").unwrap(), apple);
        assert_eq!(
            env.read("usr/bob/bob_foods.dat"),
            "{green_apple/52.0/1.0/2.0/3.0/4.0/100}|"
        );
    }

    #[test]
    fn test_register_duplicate_food() {
        let (_env, store) = setup();
        store.register_food("bob", food("rice", 130.0)).unwrap();
        assert!(matches!(
            store.register_food("bob", food("Rice", 99.0)),
            Err(NutrackError::FoodExists(_))
        ));
        assert_eq!(store.list_foods("bob").unwrap().len(), 1);
    }

    #[test]
    fn test_register_rejects_bad_values() {
        let (_env, store) = setup();
        let mut negative = food("rice", 130.0);
        negative.macros[2] = -1.0;
        assert!(matches!(
            store.register_food("bob", negative),
            Err(NutrackError::InvalidRecord(_))
        ));
        assert!(matches!(
            store.register_food("bob", food("rice 2", 1.0)),
            Err(NutrackError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_modify_food() {
        let (_env, store) = setup();
        store.register_food("bob", food("rice", 130.0)).unwrap();
        store.register_food("bob", food("apple", 52.0)).unwrap();

        store.modify_food("bob", food("rice", 120.0)).unwrap();
        let foods = store.list_foods("bob").unwrap();
        assert_eq!(foods[0].name, "rice");
        assert_eq!(foods[0].macros[0], 120.0);
        assert_eq!(foods[1].name, "apple");

        assert!(matches!(
            store.modify_food("bob", food("pear", 1.0)),
            Err(NutrackError::FoodNotFound(_))
        ));
    }

    #[test]
    fn test_remove_food() {
        let (_env, store) = setup();
        store.register_food("bob", food("rice", 130.0)).unwrap();
        store.remove_food("bob", "rice").unwrap();
        assert!(store.list_foods("bob").unwrap().is_empty());
        assert!(matches!(
            store.remove_food("bob", "rice"),
            Err(NutrackError::FoodNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_user() {
        let (_env, store) = setup();
        assert!(matches!(
            store.list_foods("alice"),
            Err(NutrackError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_user_folder_recreated_when_missing() {
        let (env, store) = setup();
        std::fs::remove_dir_all(env.root.join("usr/bob")).unwrap();
        store.register_food("bob", food("rice", 130.0)).unwrap();
        assert!(env.root.join("usr/bob/bob_foods.dat").is_file());
    }
}
