//! Delivery seam. Whatever actually sends email or messages sits behind [`Notifier`].

use anyhow::Result;
use tracing::info;

use crate::model::reminder::{Channel, Reminder};
use crate::urgency::UrgencyLevel;

pub trait Notifier {
    fn send(&self, reminder: &Reminder, channel: Channel, urgency: UrgencyLevel) -> Result<()>;
}

/// Writes each delivery as a log event instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, reminder: &Reminder, channel: Channel, urgency: UrgencyLevel) -> Result<()> {
        let address = match channel {
            Channel::Message => reminder.recipient.phone.as_deref(),
            Channel::Email => reminder.recipient.email.as_deref(),
        };
        info!(
            reminder = %reminder.id,
            to = address.unwrap_or_default(),
            channel = ?channel,
            urgency = %urgency,
            title = %reminder.title,
            "reminder delivered"
        );
        Ok(())
    }
}
