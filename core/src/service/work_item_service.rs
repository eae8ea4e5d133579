use crate::model::work_item::WorkItem;
use crate::repository::WorkItemRepository;
use crate::service::dto::WorkItemDto;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

pub struct WorkItemService<R: WorkItemRepository> {
    repo: R,
}

impl<R: WorkItemRepository> WorkItemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn create_item(&self, item: WorkItem) -> Result<WorkItem> {
        if item.title.trim().is_empty() {
            return Err(anyhow!("Work item title is required"));
        }
        if let Some(recurrence) = &item.recurrence {
            if let Some(end) = recurrence.end_date.filter(|end| *end < recurrence.start_date) {
                return Err(anyhow!(
                    "Recurrence ends ({}) before it starts ({})",
                    end,
                    recurrence.start_date
                ));
            }
        }
        let created = self.repo.create(item)?;
        info!(id = %created.id, title = %created.title, "work item created");
        Ok(created)
    }

    pub fn get_item(&self, id: &Uuid) -> Result<WorkItem> {
        self.repo.get(id)
    }

    /// Resolves a full id or a unique id prefix as printed by `list`.
    pub fn find_item(&self, id_or_prefix: &str) -> Result<WorkItem> {
        if let Ok(id) = Uuid::parse_str(id_or_prefix) {
            return self.repo.get(&id);
        }
        let needle = id_or_prefix.to_lowercase();
        let mut matches: Vec<WorkItem> = self
            .repo
            .list()?
            .into_iter()
            .filter(|i| i.id.to_string().starts_with(&needle))
            .collect();
        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(anyhow!("No work item matches '{}'", id_or_prefix)),
            n => Err(anyhow!("'{}' is ambiguous ({} work items match)", id_or_prefix, n)),
        }
    }

    pub fn complete_item(&self, id: &Uuid) -> Result<()> {
        let mut item = self.repo.get(id)?;
        item.complete();
        self.repo.update(&item)
    }

    pub fn toggle_status(&self, id: &Uuid) -> Result<()> {
        let mut item = self.repo.get(id)?;
        if item.is_open() {
            item.complete();
        } else {
            item.reopen();
        }
        self.repo.update(&item)
    }

    pub fn delete_item(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)
    }

    /// Open items, most pressing first.
    pub fn list_by_urgency(&self, today: NaiveDate) -> Result<Vec<WorkItemDto>> {
        let mut items: Vec<WorkItem> =
            self.repo.list()?.into_iter().filter(|i| i.is_open()).collect();
        sort_items(&mut items, today);
        Ok(items
            .into_iter()
            .map(|i| WorkItemDto::from_entity(i, today))
            .collect())
    }

    /// Creates one occurrence for every recurring template that is due `today`.
    ///
    /// The template's `last_created` is moved to `today` after its occurrence is stored,
    /// so running this twice on the same day creates nothing the second time. An
    /// occurrence already stored for `today` is reused, which covers a run that
    /// stored the occurrence but failed to save the template.
    pub fn materialize_recurrences(&self, today: NaiveDate) -> Result<Vec<WorkItem>> {
        let items = self.repo.list()?;
        let already_created: HashSet<Uuid> = items
            .iter()
            .filter(|i| i.deadline == Some(today))
            .filter_map(|i| i.parent)
            .collect();
        let mut created = Vec::new();

        for mut template in items {
            if !template.is_open() {
                continue;
            }
            let Some(recurrence) = template.recurrence.as_mut() else {
                continue;
            };
            if !recurrence.should_create_today(today) {
                debug!(id = %template.id, "recurrence not due");
                continue;
            }

            recurrence.last_created = Some(today);
            if already_created.contains(&template.id) {
                debug!(id = %template.id, "occurrence already stored for today");
                self.repo.update(&template)?;
                continue;
            }
            let occurrence = self.repo.create(template.occurrence(today))?;
            self.repo.update(&template)?;

            info!(
                template = %template.id,
                occurrence = %occurrence.id,
                date = %today,
                "recurring occurrence created"
            );
            created.push(occurrence);
        }

        Ok(created)
    }

    pub fn upcoming_occurrences(&self, id: &Uuid, limit: usize) -> Result<Vec<NaiveDate>> {
        let item = self.repo.get(id)?;
        let recurrence = item
            .recurrence
            .ok_or_else(|| anyhow!("Work item {} does not recur", id))?;
        Ok(recurrence.occurrences(limit).collect())
    }
}

pub fn sort_items(items: &mut [WorkItem], today: NaiveDate) {
    items.sort_by(|a, b| compare_urgency(a, b, today));
}

/// Urgency level, then earliest deadline (undated last), then title.
fn compare_urgency(a: &WorkItem, b: &WorkItem, today: NaiveDate) -> Ordering {
    a.urgency(today)
        .cmp(&b.urgency(today))
        .then_with(|| match (a.deadline, b.deadline) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.title.cmp(&b.title))
}
