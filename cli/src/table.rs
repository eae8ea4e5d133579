use masthead_core::{DashboardSummary, ReminderPlan, ReminderStatus, WorkItemDto};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Urgency")]
    urgency: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Supplier")]
    supplier: String,
    #[tabled(rename = "Repeats")]
    repeats: String,
}

impl From<&WorkItemDto> for ItemRow {
    fn from(dto: &WorkItemDto) -> Self {
        Self {
            id: dto.id.to_string()[..8].to_string(),
            urgency: dto.urgency.to_string(),
            deadline: dto
                .deadline
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            due: dto.due_label(),
            title: dto.title.clone(),
            section: dto.section.clone().unwrap_or_else(|| "-".to_string()),
            supplier: dto.supplier.clone().unwrap_or_else(|| "-".to_string()),
            repeats: dto
                .recurrence
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
struct ReminderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "To")]
    recipient: String,
    #[tabled(rename = "Urgency")]
    urgency: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

pub fn items_table(items: &[WorkItemDto]) -> String {
    styled(Table::new(items.iter().map(ItemRow::from)))
}

pub fn reminders_table(plans: &[ReminderPlan]) -> String {
    let rows = plans.iter().map(|p| ReminderRow {
        id: p.reminder_id.to_string()[..8].to_string(),
        title: p.title.clone(),
        recipient: p.recipient.clone(),
        urgency: p.urgency.to_string(),
        status: status_label(p.status),
    });
    styled(Table::new(rows))
}

fn status_label(status: ReminderStatus) -> String {
    match status {
        ReminderStatus::NotDue => "not due".to_string(),
        ReminderStatus::AlreadySent => "sent today".to_string(),
        ReminderStatus::Duplicate => "duplicate".to_string(),
        ReminderStatus::MissingContact => "missing contact".to_string(),
        ReminderStatus::Pending(channel) => format!("pending ({:?})", channel).to_lowercase(),
    }
}

pub fn print_dashboard(summary: &DashboardSummary) {
    let counts = &summary.counts;
    println!(
        "\x1b[1;36m{}\x1b[0m  critical: {}  urgent: {}  normal: {}",
        summary.today.format("%a %Y-%m-%d"),
        counts.critical,
        counts.urgent,
        counts.normal
    );

    if summary.overdue.is_empty() {
        println!("\nNothing overdue.");
    } else {
        println!("\n\x1b[1;31mOverdue\x1b[0m");
        println!("{}", items_table(&summary.overdue));
    }

    if !summary.due_today.is_empty() {
        println!("\n\x1b[1;35mDue today\x1b[0m");
        println!("{}", items_table(&summary.due_today));
    }

    if !summary.due_this_week.is_empty() {
        println!("\n\x1b[1;33mDue this week\x1b[0m");
        println!("{}", items_table(&summary.due_this_week));
    }
}
