pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod recurrence;
pub mod repository;
pub mod service;
pub mod time;
pub mod urgency;
pub mod usecase;

pub use config::Config;
pub use error::{ScheduleError, ScheduleResult};
pub use model::reminder::{Channel, Recipient, Reminder};
pub use model::work_item::{ItemKind, ItemStatus, WorkItem};
pub use recurrence::{
    enumerate_occurrences, next_occurrence, should_create_today, Occurrences, RecurrenceConfig,
    RecurrenceType, DEFAULT_OCCURRENCE_LIMIT,
};
pub use repository::{
    FileReminderRepository, FileWorkItemRepository, ReminderRepository, WorkItemRepository,
};
pub use input::{expand_key, ItemInput};
pub use time::{parse_human_date, parse_iso_date};
pub use urgency::{aggregate, classify, days_left, CountBucket, UrgencyCounts, UrgencyLevel};
pub use service::work_item_service::{sort_items, WorkItemService};
pub use service::reminder_service::{DispatchReport, ReminderPlan, ReminderService, ReminderStatus};
pub use service::notifier::{LogNotifier, Notifier};
pub use service::dto::{DashboardSummary, WorkItemDto};
pub use usecase::dashboard::DashboardUseCase;
