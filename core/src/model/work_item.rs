use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::recurrence::RecurrenceConfig;
use crate::urgency::{classify, UrgencyLevel};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Task,
    /// Editorial content slotted into an issue lineup.
    Lineup,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Open,
    Done,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub status: ItemStatus,

    pub deadline: Option<NaiveDate>,

    /// Magazine section or issue the item belongs to.
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,

    /// Set on templates that spawn occurrences.
    #[serde(default)]
    pub recurrence: Option<RecurrenceConfig>,
    /// Template this item was materialized from.
    #[serde(default)]
    pub parent: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkItem {
    pub fn new(title: String, deadline: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            kind: ItemKind::default(),
            status: ItemStatus::default(),
            deadline,
            section: None,
            supplier: None,
            recurrence: None,
            parent: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ItemStatus::Open
    }

    pub fn urgency(&self, today: NaiveDate) -> UrgencyLevel {
        classify(self.deadline, today)
    }

    pub fn complete(&mut self) {
        if self.status == ItemStatus::Open {
            self.status = ItemStatus::Done;
            self.completed_at = Some(Utc::now());
        }
    }

    pub fn reopen(&mut self) {
        self.status = ItemStatus::Open;
        self.completed_at = None;
    }

    /// A fresh item for the occurrence dated `on`, inheriting everything but the schedule.
    pub fn occurrence(&self, on: NaiveDate) -> WorkItem {
        let mut item = WorkItem::new(self.title.clone(), Some(on));
        item.kind = self.kind;
        item.section = self.section.clone();
        item.supplier = self.supplier.clone();
        item.parent = Some(self.id);
        item
    }
}
