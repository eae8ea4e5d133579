use std::collections::HashSet;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::model::reminder::{Channel, Recipient, Reminder};
use crate::repository::ReminderRepository;
use crate::service::notifier::Notifier;
use crate::urgency::{classify, days_left, UrgencyLevel};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status", content = "channel")]
pub enum ReminderStatus {
    /// Deadline is further out than the reminder horizon.
    NotDue,
    AlreadySent,
    /// Another reminder in the same batch covers the same target and recipient.
    Duplicate,
    MissingContact,
    Pending(Channel),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReminderPlan {
    pub reminder_id: Uuid,
    pub title: String,
    pub recipient: String,
    pub urgency: UrgencyLevel,
    pub days_left: Option<i64>,
    pub status: ReminderStatus,
    pub dedupe_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub skipped: usize,
    pub missing_contact: usize,
    pub failed: usize,
    /// Delivered, but recording the delivery failed.
    pub unrecorded: usize,
}

/// Pressing reminders go to a phone first; the rest prefer email.
pub fn choose_channel(urgency: UrgencyLevel, recipient: &Recipient) -> Option<Channel> {
    let preference = match urgency {
        UrgencyLevel::Critical | UrgencyLevel::Urgent => [Channel::Message, Channel::Email],
        UrgencyLevel::Warning | UrgencyLevel::Waiting => [Channel::Email, Channel::Message],
    };
    preference.into_iter().find(|c| recipient.has(*c))
}

pub struct ReminderService<R: ReminderRepository, N: Notifier> {
    repo: R,
    notifier: N,
}

impl<R: ReminderRepository, N: Notifier> ReminderService<R, N> {
    pub fn new(repo: R, notifier: N) -> Self {
        Self { repo, notifier }
    }

    pub fn add_reminder(&self, reminder: Reminder) -> Result<Reminder> {
        if reminder.recipient.name.trim().is_empty() {
            return Err(anyhow!("Reminder recipient name is required"));
        }
        self.repo.create(reminder)
    }

    pub fn list_reminders(&self) -> Result<Vec<Reminder>> {
        self.repo.list()
    }

    /// Resolves a full id or a unique id prefix as printed by `remind list`.
    pub fn find_reminder(&self, id_or_prefix: &str) -> Result<Reminder> {
        let needle = id_or_prefix.trim().to_lowercase();
        let mut matches: Vec<Reminder> = self
            .repo
            .list()?
            .into_iter()
            .filter(|r| r.id.to_string().starts_with(&needle))
            .collect();
        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(anyhow!("No reminder matches '{}'", id_or_prefix)),
            n => Err(anyhow!("'{}' is ambiguous ({} reminders match)", id_or_prefix, n)),
        }
    }

    pub fn delete_reminder(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)
    }

    pub fn plan(&self, today: NaiveDate, horizon: UrgencyLevel) -> Result<Vec<ReminderPlan>> {
        let reminders = self.repo.list()?;
        Ok(plan_reminders(&reminders, today, horizon))
    }

    /// Sends every pending reminder. One failed delivery does not stop the rest.
    pub fn dispatch(&self, today: NaiveDate, horizon: UrgencyLevel) -> Result<DispatchReport> {
        let reminders = self.repo.list()?;
        let plans = plan_reminders(&reminders, today, horizon);
        let mut report = DispatchReport::default();

        for (mut reminder, plan) in reminders.into_iter().zip(plans) {
            let channel = match plan.status {
                ReminderStatus::Pending(channel) => channel,
                ReminderStatus::MissingContact => {
                    warn!(
                        reminder = %plan.reminder_id,
                        recipient = %plan.recipient,
                        "no usable contact for reminder"
                    );
                    report.missing_contact += 1;
                    continue;
                }
                status => {
                    debug!(reminder = %plan.reminder_id, ?status, "reminder skipped");
                    report.skipped += 1;
                    continue;
                }
            };

            match self.notifier.send(&reminder, channel, plan.urgency) {
                Ok(()) => {
                    reminder.mark_sent(today);
                    match self.repo.update(&reminder) {
                        Ok(()) => report.sent += 1,
                        Err(e) => {
                            warn!(
                                reminder = %plan.reminder_id,
                                error = %e,
                                "reminder delivered but not recorded"
                            );
                            report.unrecorded += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!(reminder = %plan.reminder_id, error = %e, "reminder delivery failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            sent = report.sent,
            skipped = report.skipped,
            missing_contact = report.missing_contact,
            failed = report.failed,
            unrecorded = report.unrecorded,
            "reminder dispatch finished"
        );
        Ok(report)
    }
}

/// One plan per reminder, in input order.
///
/// A key already delivered today blocks every reminder sharing it, wherever the
/// delivered one sits in `reminders`.
pub fn plan_reminders(
    reminders: &[Reminder],
    today: NaiveDate,
    horizon: UrgencyLevel,
) -> Vec<ReminderPlan> {
    let mut claimed: HashSet<String> = reminders
        .iter()
        .filter(|r| r.was_sent_on(today))
        .map(|r| r.dedupe_key(today))
        .collect();

    reminders
        .iter()
        .map(|reminder| {
            let urgency = classify(reminder.deadline, today);
            let dedupe_key = reminder.dedupe_key(today);

            let status = if !urgency.within(horizon) {
                ReminderStatus::NotDue
            } else if reminder.was_sent_on(today) {
                ReminderStatus::AlreadySent
            } else if claimed.contains(&dedupe_key) {
                ReminderStatus::Duplicate
            } else {
                match choose_channel(urgency, &reminder.recipient) {
                    Some(channel) => {
                        claimed.insert(dedupe_key.clone());
                        ReminderStatus::Pending(channel)
                    }
                    None => ReminderStatus::MissingContact,
                }
            };

            ReminderPlan {
                reminder_id: reminder.id,
                title: reminder.title.clone(),
                recipient: reminder.recipient.name.clone(),
                urgency,
                days_left: days_left(reminder.deadline, today),
                status,
                dedupe_key,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockReminderRepo {
        reminders: RefCell<Vec<Reminder>>,
        read_only: bool,
    }

    impl ReminderRepository for MockReminderRepo {
        fn create(&self, reminder: Reminder) -> Result<Reminder> {
            self.reminders.borrow_mut().push(reminder.clone());
            Ok(reminder)
        }
        fn list(&self) -> Result<Vec<Reminder>> {
            Ok(self.reminders.borrow().clone())
        }
        fn update(&self, reminder: &Reminder) -> Result<()> {
            if self.read_only {
                return Err(anyhow!("disk full"));
            }
            let mut reminders = self.reminders.borrow_mut();
            let pos = reminders
                .iter()
                .position(|r| r.id == reminder.id)
                .ok_or_else(|| anyhow!("not found"))?;
            reminders[pos] = reminder.clone();
            Ok(())
        }
        fn delete(&self, id: &Uuid) -> Result<()> {
            self.reminders.borrow_mut().retain(|r| r.id != *id);
            Ok(())
        }
    }

    /// Records deliveries; fails for recipients named "bounce".
    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<(Uuid, Channel)>>,
    }

    impl Notifier for RecordingNotifier {
        fn send(
            &self,
            reminder: &Reminder,
            channel: Channel,
            _urgency: UrgencyLevel,
        ) -> Result<()> {
            if reminder.recipient.name == "bounce" {
                return Err(anyhow!("mailbox full"));
            }
            self.sent.borrow_mut().push((reminder.id, channel));
            Ok(())
        }
    }

    fn service() -> ReminderService<MockReminderRepo, RecordingNotifier> {
        ReminderService::new(MockReminderRepo::default(), RecordingNotifier::default())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    fn recipient(name: &str, email: Option<&str>, phone: Option<&str>) -> Recipient {
        Recipient {
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        }
    }

    fn reminder(title: &str, in_days: Option<i64>, to: Recipient) -> Reminder {
        Reminder::new(title.to_string(), in_days.map(|d| today() + Duration::days(d)), to)
    }

    #[test]
    fn test_choose_channel_by_urgency() {
        let both = recipient("Eva", Some("eva@example.com"), Some("+1 555 0100"));
        assert_eq!(choose_channel(UrgencyLevel::Critical, &both), Some(Channel::Message));
        assert_eq!(choose_channel(UrgencyLevel::Warning, &both), Some(Channel::Email));

        let email_only = recipient("Eva", Some("eva@example.com"), None);
        assert_eq!(choose_channel(UrgencyLevel::Urgent, &email_only), Some(Channel::Email));

        let nothing = recipient("Eva", None, None);
        assert_eq!(choose_channel(UrgencyLevel::Critical, &nothing), None);
    }

    #[test]
    fn test_plan_statuses() {
        let eva = recipient("Eva", Some("eva@example.com"), None);
        let mut sent = reminder("Sent already", Some(1), eva.clone());
        sent.mark_sent(today());

        let reminders = vec![
            reminder("Far away", Some(30), eva.clone()),
            reminder("No deadline", None, eva.clone()),
            sent,
            reminder("No contact", Some(0), recipient("Lu", None, None)),
            reminder("Due soon", Some(2), eva.clone()),
        ];
        let statuses: Vec<_> = plan_reminders(&reminders, today(), UrgencyLevel::Warning)
            .into_iter()
            .map(|p| p.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                ReminderStatus::NotDue,
                ReminderStatus::NotDue,
                ReminderStatus::AlreadySent,
                ReminderStatus::MissingContact,
                ReminderStatus::Pending(Channel::Email),
            ]
        );
    }

    #[test]
    fn test_plan_marks_same_target_duplicates() {
        let eva = recipient("Eva", Some("eva@example.com"), None);
        let item = Uuid::new_v4();
        let mut first = reminder("Proofs", Some(1), eva.clone());
        first.item_id = Some(item);
        let mut second = reminder("Proofs again", Some(1), eva.clone());
        second.item_id = Some(item);
        let max = recipient("Max", Some("max@example.com"), None);
        let mut other_person = reminder("Proofs", Some(1), max);
        other_person.item_id = Some(item);

        let plans = plan_reminders(&[first, second, other_person], today(), UrgencyLevel::Warning);
        assert_eq!(plans[0].status, ReminderStatus::Pending(Channel::Email));
        assert_eq!(plans[1].status, ReminderStatus::Duplicate);
        assert_eq!(plans[2].status, ReminderStatus::Pending(Channel::Email));
    }

    #[test]
    fn test_plan_sent_reminder_blocks_earlier_duplicate() {
        let eva = recipient("Eva", Some("eva@example.com"), None);
        let item = Uuid::new_v4();
        let mut unsent = reminder("Proofs", Some(1), eva.clone());
        unsent.item_id = Some(item);
        let mut delivered = reminder("Proofs", Some(1), eva);
        delivered.item_id = Some(item);
        delivered.mark_sent(today());

        let plans = plan_reminders(&[unsent, delivered], today(), UrgencyLevel::Warning);
        assert_eq!(plans[0].status, ReminderStatus::Duplicate);
        assert_eq!(plans[1].status, ReminderStatus::AlreadySent);
    }

    #[test]
    fn test_horizon_limits_what_fires() {
        let eva = recipient("Eva", Some("eva@example.com"), None);
        let reminders = vec![
            reminder("Warning", Some(5), eva.clone()),
            reminder("Urgent", Some(1), eva),
        ];
        let plans = plan_reminders(&reminders, today(), UrgencyLevel::Urgent);
        assert_eq!(plans[0].status, ReminderStatus::NotDue);
        assert_eq!(plans[1].status, ReminderStatus::Pending(Channel::Email));
    }

    #[test]
    fn test_dispatch_sends_once_and_records() {
        let service = service();
        let eva = recipient("Eva", Some("eva@example.com"), Some("+1 555 0100"));
        let urgent = service.add_reminder(reminder("Cover files", Some(0), eva)).unwrap();
        service
            .add_reminder(reminder("Index", Some(20), recipient("Max", Some("max@x.com"), None)))
            .unwrap();
        service
            .add_reminder(reminder("Captions", Some(1), recipient("Lu", None, None)))
            .unwrap();

        let report = service.dispatch(today(), UrgencyLevel::Warning).unwrap();
        assert_eq!(
            report,
            DispatchReport {
                sent: 1,
                skipped: 1,
                missing_contact: 1,
                failed: 0,
                unrecorded: 0,
            }
        );
        assert_eq!(*service.notifier.sent.borrow(), vec![(urgent.id, Channel::Message)]);

        let again = service.dispatch(today(), UrgencyLevel::Warning).unwrap();
        assert_eq!(again.sent, 0);
        assert_eq!(again.skipped, 2);

        let tomorrow = today() + Duration::days(1);
        let next_day = service.dispatch(tomorrow, UrgencyLevel::Warning).unwrap();
        assert_eq!(next_day.sent, 1);
    }

    #[test]
    fn test_dispatch_continues_after_failure() {
        let service = service();
        let bounced = service
            .add_reminder(reminder("Ads", Some(1), recipient("bounce", Some("b@x.com"), None)))
            .unwrap();
        service
            .add_reminder(reminder("Ads", Some(1), recipient("Eva", Some("eva@example.com"), None)))
            .unwrap();

        let report = service.dispatch(today(), UrgencyLevel::Warning).unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 1);

        let stored = service.list_reminders().unwrap();
        let failed = stored.iter().find(|r| r.id == bounced.id).unwrap();
        assert!(failed.sent_on.is_empty());
    }

    #[test]
    fn test_dispatch_keeps_going_when_recording_fails() {
        let repo = MockReminderRepo {
            read_only: true,
            ..MockReminderRepo::default()
        };
        let service = ReminderService::new(repo, RecordingNotifier::default());
        let eva = recipient("Eva", Some("eva@example.com"), None);
        service.add_reminder(reminder("Ads", Some(1), eva.clone())).unwrap();
        service.add_reminder(reminder("Credits", Some(2), eva)).unwrap();

        let report = service.dispatch(today(), UrgencyLevel::Warning).unwrap();
        assert_eq!(report.sent, 0);
        assert_eq!(report.unrecorded, 2);
        assert_eq!(service.notifier.sent.borrow().len(), 2);
    }

    #[test]
    fn test_find_and_delete_reminder() {
        let service = service();
        let eva = recipient("Eva", Some("eva@example.com"), None);
        let created = service.add_reminder(reminder("Ads", Some(1), eva)).unwrap();

        let prefix = &created.id.to_string()[..8];
        assert_eq!(service.find_reminder(prefix).unwrap().id, created.id);
        assert!(service.find_reminder("zzzz").is_err());

        service.delete_reminder(&created.id).unwrap();
        assert!(service.list_reminders().unwrap().is_empty());
    }

    #[test]
    fn test_add_requires_recipient_name() {
        let service = service();
        assert!(service
            .add_reminder(reminder("Ads", Some(1), recipient(" ", Some("x@example.com"), None)))
            .is_err());
    }
}
