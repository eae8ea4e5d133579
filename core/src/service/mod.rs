pub mod dto;
pub mod notifier;
pub mod reminder_service;
pub mod work_item_service;
