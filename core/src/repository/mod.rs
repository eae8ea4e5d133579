pub mod file;
pub mod reminder;
pub mod traits;

// Re-export
pub use file::{FileWorkItemRepository, JsonFile};
pub use reminder::FileReminderRepository;
pub use traits::{ReminderRepository, WorkItemRepository};
