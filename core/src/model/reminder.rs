use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Short message to a phone.
    Message,
    Email,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Recipient {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Recipient {
    pub fn has(&self, channel: Channel) -> bool {
        let value = match channel {
            Channel::Message => &self.phone,
            Channel::Email => &self.email,
        };
        value.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: Uuid,
    pub item_id: Option<Uuid>,
    pub title: String,
    pub deadline: Option<NaiveDate>,
    pub recipient: Recipient,
    /// Days on which this reminder was already delivered.
    #[serde(default)]
    pub sent_on: Vec<NaiveDate>,
}

impl Reminder {
    pub fn new(title: String, deadline: Option<NaiveDate>, recipient: Recipient) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id: None,
            title,
            deadline,
            recipient,
            sent_on: Vec::new(),
        }
    }

    pub fn was_sent_on(&self, day: NaiveDate) -> bool {
        self.sent_on.contains(&day)
    }

    pub fn mark_sent(&mut self, day: NaiveDate) {
        if !self.was_sent_on(day) {
            self.sent_on.push(day);
        }
    }

    /// One delivery per target, recipient and day.
    pub fn dedupe_key(&self, day: NaiveDate) -> String {
        let target = self.item_id.unwrap_or(self.id);
        format!(
            "{}:{}:{}",
            target,
            self.recipient.name.trim().to_lowercase(),
            day.format("%Y-%m-%d")
        )
    }
}
