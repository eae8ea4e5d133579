use crate::repository::WorkItemRepository;
use crate::service::dto::{DashboardSummary, WorkItemDto};
use crate::service::work_item_service::sort_items;
use crate::urgency::{aggregate, UrgencyLevel};
use anyhow::Result;
use chrono::NaiveDate;

pub struct DashboardUseCase<'a, R: WorkItemRepository> {
    repo: &'a R,
}

impl<'a, R: WorkItemRepository> DashboardUseCase<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Counts and the three short lists the production dashboard shows for `today`.
    pub fn summary(&self, today: NaiveDate) -> Result<DashboardSummary> {
        let mut open: Vec<_> = self.repo.list()?.into_iter().filter(|i| i.is_open()).collect();
        sort_items(&mut open, today);

        let counts = aggregate(open.iter().map(|i| i.deadline), today);

        let mut overdue = Vec::new();
        let mut due_today = Vec::new();
        let mut due_this_week = Vec::new();
        for item in open {
            let dto = WorkItemDto::from_entity(item, today);
            match dto.days_left {
                Some(d) if d < 0 => overdue.push(dto),
                Some(0) => due_today.push(dto),
                _ if matches!(dto.urgency, UrgencyLevel::Urgent | UrgencyLevel::Warning) => {
                    due_this_week.push(dto)
                }
                _ => {}
            }
        }

        Ok(DashboardSummary {
            today,
            counts,
            overdue,
            due_today,
            due_this_week,
        })
    }
}
