use crate::model::reminder::Reminder;
use crate::model::work_item::WorkItem;
use anyhow::Result;
use uuid::Uuid;

pub trait WorkItemRepository {
    fn create(&self, item: WorkItem) -> Result<WorkItem>;
    fn get(&self, id: &Uuid) -> Result<WorkItem>;
    fn list(&self) -> Result<Vec<WorkItem>>;
    fn update(&self, item: &WorkItem) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;
}

pub trait ReminderRepository {
    fn create(&self, reminder: Reminder) -> Result<Reminder>;
    fn list(&self) -> Result<Vec<Reminder>>;
    fn update(&self, reminder: &Reminder) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;
}
