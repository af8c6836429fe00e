use super::{normalize_name, RecordStore};
use crate::error::{IoOp, NutrackError, Result};
use crate::model::{Record, RecordKind, UserRecord};
use std::fs;
use tracing::info;

impl RecordStore {
    fn registry_records(&self) -> Result<Vec<Record>> {
        self.load(&self.layout.registry(), RecordKind::User)
    }

    /// Registered user names, in registry order.
    pub fn list_users(&self) -> Result<Vec<String>> {
        Ok(self
            .registry_records()?
            .into_iter()
            .filter_map(|r| match r {
                Record::User(user) => Some(user.name),
                _ => None,
            })
            .collect())
    }

    pub fn is_registered(&self, name: &str) -> Result<bool> {
        let name = normalize_name(name)?;
        Ok(self.list_users()?.contains(&name))
    }

    /// Adds a user to the registry and creates their folder. Returns the
    /// in-file name.
    pub fn register_user(&self, name: &str) -> Result<String> {
        let name = normalize_name(name)?;
        let registry = self.layout.registry();
        let mut records = self.load(&registry, RecordKind::User)?;

        let record = Record::User(UserRecord { name: name.clone() });
        if records.contains(&record) {
            return Err(NutrackError::UserExists(name));
        }
        records.push(record);
        self.store(&registry, &records)?;

        let dir = self.layout.user_dir(&name);
        fs::create_dir_all(&dir).map_err(NutrackError::io(IoOp::Create, &dir))?;
        info!(user = %name, "registered user");
        Ok(name)
    }

    /// Deletes a user's folder, then drops them from the registry.
    pub fn remove_user(&self, name: &str) -> Result<()> {
        let name = normalize_name(name)?;
        let registry = self.layout.registry();
        let mut records = self.load(&registry, RecordKind::User)?;

        let record = Record::User(UserRecord { name: name.clone() });
        if !records.contains(&record) {
            return Err(NutrackError::UserNotFound(name));
        }

        let dir = self.layout.user_dir(&name);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(NutrackError::io(IoOp::Remove, &dir))?;
        }
        records.retain(|r| r != &record);
        self.store(&registry, &records)?;
        info!(user = %name, "removed user");
        Ok(())
    }

    /// Normalizes `name` and checks it is registered.
    pub(super) fn require_user(&self, name: &str) -> Result<String> {
        let name = normalize_name(name)?;
        if !self.list_users()?.contains(&name) {
            return Err(NutrackError::UserNotFound(name));
        }
        Ok(name)
    }
}
