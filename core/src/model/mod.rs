pub mod reminder;
pub mod work_item;
