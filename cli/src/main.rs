mod table;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use masthead_core::{
    parse_human_date, parse_iso_date, Config, DashboardUseCase, FileReminderRepository,
    FileWorkItemRepository, ItemInput, LogNotifier, Recipient, Reminder, ReminderService,
    WorkItemService,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "masthead")]
#[command(
    about = "Deadlines, recurring jobs and reminders for a magazine production desk",
    long_about = None
)]
struct Cli {
    /// Where items, reminders and config.toml live (default: ~/.masthead)
    #[arg(long, env = "MASTHEAD_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, env = "MASTHEAD_TODAY", global = true)]
    today: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a work item (usage: add "Cover story" deadline:fri supplier:Studio recur:weekly)
    Add {
        /// Title words followed by key:value fields
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// List open work items, most urgent first
    List,
    /// Urgency counts, overdue items and what is due this week
    Dashboard,
    /// Mark a work item done (or reopen a done one)
    Done { id: String },
    /// Delete a work item
    Remove { id: String },
    /// Create today's occurrences of recurring items
    Recur,
    /// Show upcoming occurrence dates of a recurring item
    Occurrences {
        id: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Manage deadline reminders
    #[command(subcommand)]
    Remind(RemindCommand),
}

#[derive(Subcommand)]
enum RemindCommand {
    /// Register a reminder
    Add {
        title: String,
        #[arg(long)]
        deadline: Option<String>,
        /// Recipient name
        #[arg(long)]
        to: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Work item the reminder is about
        #[arg(long)]
        item: Option<String>,
    },
    /// Show what each reminder would do today
    List,
    /// Deliver every pending reminder
    Send,
    /// Delete a reminder
    Remove { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));
    fmt().with_env_filter(filter).with_target(false).init();

    let config = Config::load(cli.data_dir.clone())?;
    let today = resolve_today(cli.today.as_deref())?;
    tracing::debug!(data_dir = %config.data_dir.display(), %today, "starting");

    let items = WorkItemService::new(FileWorkItemRepository::new(&config.data_dir)?);

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Add { args } => {
            let item = ItemInput::parse(&args).into_work_item(today)?;
            let created = items.create_item(item)?;
            println!("Added: {} (ID: {})", created.title, created.id);
            if let Some(d) = created.deadline {
                println!("  Deadline: {} ({})", d, created.urgency(today));
            }
            if let Some(r) = &created.recurrence {
                println!("  Repeats: {} from {}", r.kind, r.start_date);
            }
        }
        Commands::List => {
            let listed = items.list_by_urgency(today)?;
            if listed.is_empty() {
                println!("No open work items.");
            } else {
                println!("{}", table::items_table(&listed));
            }
        }
        Commands::Dashboard => {
            let summary = DashboardUseCase::new(items.repository()).summary(today)?;
            table::print_dashboard(&summary);
        }
        Commands::Done { id } => {
            let item = items.find_item(&id)?;
            items.toggle_status(&item.id)?;
            let verb = if item.is_open() { "Completed" } else { "Reopened" };
            println!("{}: {}", verb, item.title);
        }
        Commands::Remove { id } => {
            let item = items.find_item(&id)?;
            items.delete_item(&item.id)?;
            println!("Removed: {}", item.title);
        }
        Commands::Recur => {
            let created = items.materialize_recurrences(today)?;
            if created.is_empty() {
                println!("No recurring items due on {}.", today);
            }
            for item in created {
                println!("Created: {} (ID: {})", item.title, item.id);
            }
        }
        Commands::Occurrences { id, limit } => {
            let item = items.find_item(&id)?;
            let limit = limit.unwrap_or(config.occurrence_limit);
            for date in items.upcoming_occurrences(&item.id, limit)? {
                println!("{} {}", date, date.format("%a"));
            }
        }
        Commands::Remind(command) => {
            let reminders =
                ReminderService::new(FileReminderRepository::new(&config.data_dir)?, LogNotifier);
            match command {
                RemindCommand::Add { title, deadline, to, email, phone, item } => {
                    let deadline = deadline
                        .map(|d| parse_human_date(&d, today))
                        .transpose()?;
                    let recipient = Recipient { name: to, email, phone };
                    let mut reminder = Reminder::new(title, deadline, recipient);
                    if let Some(id) = item {
                        let target = items.find_item(&id)?;
                        reminder.item_id = Some(target.id);
                        reminder.deadline = reminder.deadline.or(target.deadline);
                    }
                    let created = reminders.add_reminder(reminder)?;
                    println!("Reminder added: {} (ID: {})", created.title, created.id);
                }
                RemindCommand::List => {
                    let plans = reminders.plan(today, config.reminder_horizon)?;
                    if plans.is_empty() {
                        println!("No reminders.");
                    } else {
                        println!("{}", table::reminders_table(&plans));
                    }
                }
                RemindCommand::Send => {
                    let report = reminders.dispatch(today, config.reminder_horizon)?;
                    println!(
                        "Sent {}, skipped {}, missing contact {}, failed {}, unrecorded {}",
                        report.sent,
                        report.skipped,
                        report.missing_contact,
                        report.failed,
                        report.unrecorded
                    );
                }
                RemindCommand::Remove { id } => {
                    let reminder = reminders.find_reminder(&id)?;
                    reminders.delete_reminder(&reminder.id)?;
                    println!("Removed reminder: {}", reminder.title);
                }
            }
        }
    }
    Ok(())
}

fn resolve_today(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(value) => parse_iso_date(value).context("Invalid --today"),
        None => Ok(Local::now().date_naive()),
    }
}
