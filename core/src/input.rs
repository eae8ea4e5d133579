use std::collections::HashMap;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use crate::model::work_item::{ItemKind, WorkItem};
use crate::recurrence::{RecurrenceConfig, RecurrenceType};
use crate::time::parse_human_date;

pub const FIELD_KEYS: [&str; 7] = [
    "deadline", "kind", "section", "supplier", "recur", "start", "until",
];

/// `Cover story deadline:fri sup:Studio recur:weekly` split into title words and fields.
#[derive(Debug, PartialEq)]
pub struct ItemInput {
    pub title: String,
    pub fields: HashMap<String, String>,
}

impl ItemInput {
    pub fn parse(args: &[String]) -> Self {
        let mut title_parts = Vec::new();
        let mut fields = HashMap::new();

        for arg in args {
            if let Some((key, value)) = arg.split_once(':') {
                if !key.is_empty() {
                    fields.insert(key.to_string(), value.to_string());
                    continue;
                }
            }
            title_parts.push(arg.as_str());
        }

        ItemInput {
            title: title_parts.join(" "),
            fields,
        }
    }

    /// Builds the work item, resolving relative dates against `today`.
    ///
    /// A `recur:` field starts on `start:` when given, else on the deadline, else today.
    pub fn into_work_item(self, today: NaiveDate) -> Result<WorkItem> {
        if self.title.trim().is_empty() {
            return Err(anyhow!("Work item title is required"));
        }

        let mut fields = HashMap::new();
        for (key, value) in self.fields {
            fields.insert(expand_key(&key, &FIELD_KEYS)?, value);
        }
        let date_field = |key: &str| -> Result<Option<NaiveDate>> {
            fields
                .get(key)
                .map(|v| {
                    parse_human_date(v, today).with_context(|| format!("Invalid {} '{}'", key, v))
                })
                .transpose()
        };

        let deadline = date_field("deadline")?;
        let start = date_field("start")?;
        let until = date_field("until")?;

        let mut item = WorkItem::new(self.title, deadline);
        item.section = fields.get("section").cloned();
        item.supplier = fields.get("supplier").cloned();
        if let Some(kind) = fields.get("kind") {
            item.kind = parse_kind(kind)?;
        }

        match fields.get("recur") {
            Some(recur) => {
                let kind: RecurrenceType = recur.parse()?;
                let mut config = RecurrenceConfig::new(kind, start.or(deadline).unwrap_or(today));
                config.end_date = until;
                item.recurrence = Some(config);
            }
            None if start.is_some() || until.is_some() => {
                return Err(anyhow!("start: and until: only apply together with recur:"));
            }
            None => {}
        }

        Ok(item)
    }
}

fn parse_kind(value: &str) -> Result<ItemKind> {
    match value.to_lowercase().as_str() {
        "task" | "t" => Ok(ItemKind::Task),
        "lineup" | "l" => Ok(ItemKind::Lineup),
        _ => Err(anyhow!("Unknown kind '{}' (task or lineup)", value)),
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}
