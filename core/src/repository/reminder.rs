use std::path::Path;

use anyhow::{anyhow, Result};
use uuid::Uuid;

use crate::model::reminder::Reminder;
use crate::repository::file::JsonFile;
use crate::repository::traits::ReminderRepository;

const REMINDERS_FILE_NAME: &str = "reminders.json";

#[derive(Debug, Clone)]
pub struct FileReminderRepository {
    store: JsonFile<Reminder>,
}

impl FileReminderRepository {
    pub fn new(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            store: JsonFile::open(data_dir, REMINDERS_FILE_NAME)?,
        })
    }
}

impl ReminderRepository for FileReminderRepository {
    fn create(&self, reminder: Reminder) -> Result<Reminder> {
        let mut reminders = self.store.read()?;
        reminders.push(reminder.clone());
        self.store.write(&reminders)?;
        Ok(reminder)
    }

    fn list(&self) -> Result<Vec<Reminder>> {
        self.store.read()
    }

    fn update(&self, reminder: &Reminder) -> Result<()> {
        let mut reminders = self.store.read()?;
        let pos = reminders
            .iter()
            .position(|r| r.id == reminder.id)
            .ok_or_else(|| anyhow!("Reminder with ID {} not found", reminder.id))?;
        reminders[pos] = reminder.clone();
        self.store.write(&reminders)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut reminders = self.store.read()?;
        let initial_len = reminders.len();
        reminders.retain(|r| r.id != *id);
        if reminders.len() == initial_len {
            return Err(anyhow!("Reminder with ID {} not found", id));
        }
        self.store.write(&reminders)
    }
}
