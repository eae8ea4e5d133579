use serde::{Serialize, Deserialize};
use chrono::NaiveDate;
use uuid::Uuid;
use crate::model::work_item::{ItemKind, ItemStatus, WorkItem};
use crate::recurrence::RecurrenceType;
use crate::urgency::{days_left, UrgencyCounts, UrgencyLevel};

/// A work item as the dashboard and list views show it on a given day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkItemDto {
    pub id: Uuid,
    pub title: String,
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub deadline: Option<NaiveDate>,
    pub section: Option<String>,
    pub supplier: Option<String>,
    pub recurrence: Option<RecurrenceType>,
    pub parent: Option<Uuid>,

    pub urgency: UrgencyLevel,
    /// Negative when overdue.
    pub days_left: Option<i64>,
}

impl WorkItemDto {
    pub fn from_entity(item: WorkItem, today: NaiveDate) -> Self {
        let urgency = item.urgency(today);
        let days_left = days_left(item.deadline, today);
        Self {
            id: item.id,
            title: item.title,
            kind: item.kind,
            status: item.status,
            deadline: item.deadline,
            section: item.section,
            supplier: item.supplier,
            recurrence: item.recurrence.map(|r| r.kind),
            parent: item.parent,
            urgency,
            days_left,
        }
    }

    /// "3d left", "due today", "2d late", or "-" without a deadline.
    pub fn due_label(&self) -> String {
        match self.days_left {
            None => "-".to_string(),
            Some(0) => "due today".to_string(),
            Some(d) if d > 0 => format!("{}d left", d),
            Some(d) => format!("{}d late", -d),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub today: NaiveDate,
    pub counts: UrgencyCounts,
    pub overdue: Vec<WorkItemDto>,
    pub due_today: Vec<WorkItemDto>,
    pub due_this_week: Vec<WorkItemDto>,
}
