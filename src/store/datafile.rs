//! JSON data file boundary.
//!
//! The file uses the camelCase shape of the mobile app's fixtures. Legacy
//! fields are folded into the canonical model here and nowhere else:
//! `lastContact` becomes `last_interaction` when `lastService` is absent,
//! tier `D` becomes C, a missing frequency gets the configured default.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{MemoryStore, Repository};
use crate::error::Error;
use crate::models::{
    checked_frequency, Category, Contact, ContactRef, InteractionKind, InteractionRecord, Priority,
    Recurrence, Task, Tier,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DataFile {
    contacts: Vec<RawContact>,
    tasks: Vec<RawTask>,
    records: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContact {
    id: Option<Uuid>,
    name: String,
    #[serde(default)]
    phone: String,
    wechat: Option<String>,
    email: Option<String>,
    company: Option<String>,
    #[serde(alias = "position")]
    title: Option<String>,
    #[serde(alias = "level")]
    tier: Option<String>,
    frequency: Option<i64>,
    last_service: Option<String>,
    last_contact: Option<String>,
    preferences: Option<String>,
    taboos: Option<String>,
    hobbies: Option<String>,
    #[serde(alias = "bio")]
    notes: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, alias = "isFavorite")]
    favorite: bool,
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    id: Option<Uuid>,
    title: String,
    description: Option<String>,
    contact_id: Option<Uuid>,
    contact_name: Option<String>,
    due_date: String,
    due_time: Option<String>,
    #[serde(alias = "type")]
    category: Option<String>,
    priority: Option<String>,
    #[serde(default)]
    completed: bool,
    completed_at: Option<String>,
    recurrence: Option<String>,
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    id: Option<Uuid>,
    contact_id: Uuid,
    #[serde(alias = "type")]
    kind: Option<String>,
    #[serde(default)]
    content: String,
    date: String,
    promises: Option<String>,
    #[serde(alias = "importantInfo")]
    key_facts: Option<String>,
    #[serde(alias = "followUp")]
    next_step: Option<String>,
}

/// Read a data file into a fresh store.
pub fn load(path: &Path, default_frequency: u32, now: DateTime<Utc>) -> Result<MemoryStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading data file {}", path.display()))?;
    let store = parse(&raw, default_frequency, now)
        .with_context(|| format!("loading data file {}", path.display()))?;
    debug!(
        path = %path.display(),
        contacts = store.contacts().len(),
        tasks = store.tasks().len(),
        "data file loaded"
    );
    Ok(store)
}

/// Parse a data file body. `now` stamps entities that carry no timestamp.
pub fn parse(json: &str, default_frequency: u32, now: DateTime<Utc>) -> Result<MemoryStore> {
    let file: DataFile = serde_json::from_str(json).context("parsing data file json")?;
    let mut store = MemoryStore::new();

    for (idx, raw) in file.contacts.into_iter().enumerate() {
        let label = format!("contact #{} ({})", idx, raw.name);
        let contact = contact_from_raw(raw, default_frequency, now).context(label)?;
        store.insert_contact(contact)?;
    }

    for (idx, raw) in file.tasks.into_iter().enumerate() {
        let label = format!("task #{} ({})", idx, raw.title);
        let task = task_from_raw(raw, &store, now).context(label)?;
        store.insert_task(task)?;
    }

    for (idx, raw) in file.records.into_iter().enumerate() {
        let record = record_from_raw(raw).with_context(|| format!("record #{}", idx))?;
        store
            .append_record(record)
            .with_context(|| format!("record #{}", idx))?;
    }

    Ok(store)
}

fn contact_from_raw(raw: RawContact, default_frequency: u32, now: DateTime<Utc>) -> Result<Contact> {
    if raw.name.trim().is_empty() {
        return Err(Error::MissingField("name").into());
    }

    let tier = match raw.tier.as_deref() {
        Some(s) => Tier::parse(s).ok_or_else(|| Error::InvalidTier(s.to_string()))?,
        None => Tier::default(),
    };
    let frequency_days = match raw.frequency {
        Some(days) => checked_frequency(days)?,
        None => default_frequency,
    };

    let last_interaction = match (&raw.last_service, &raw.last_contact) {
        (Some(service), _) => Some(parse_day(service)?),
        (None, Some(legacy)) => {
            debug!(name = %raw.name, "using legacy lastContact field");
            Some(parse_day(legacy)?)
        }
        (None, None) => None,
    };

    let created_at = match raw.created_at.as_deref() {
        Some(s) => parse_instant(s)?,
        None => now,
    };

    let mut contact = Contact {
        id: raw.id.unwrap_or_else(Uuid::new_v4),
        name: raw.name.trim().to_string(),
        phone: raw.phone.trim().to_string(),
        wechat: raw.wechat,
        email: raw.email,
        company: raw.company,
        title: raw.title,
        tier,
        frequency_days,
        last_interaction,
        preferences: raw.preferences,
        taboos: raw.taboos,
        hobbies: raw.hobbies,
        notes: raw.notes,
        tags: Vec::new(),
        favorite: raw.favorite,
        created_at,
    };
    for tag in &raw.tags {
        contact.add_tag(tag);
    }
    Ok(contact)
}

fn task_from_raw(raw: RawTask, store: &MemoryStore, now: DateTime<Utc>) -> Result<Task> {
    let due_date = parse_day(&raw.due_date)?;
    let due_time = raw.due_time.as_deref().map(parse_time).transpose()?;

    let contact = raw.contact_id.map(|id| {
        let name = raw
            .contact_name
            .clone()
            .or_else(|| store.contact(id).map(|c| c.name.clone()))
            .unwrap_or_default();
        ContactRef { id, name }
    });

    let completed_at = match (raw.completed, raw.completed_at.as_deref()) {
        (true, Some(s)) => Some(parse_instant(s)?),
        (true, None) => {
            warn!(title = %raw.title, "completed task without completedAt, stamping load time");
            Some(now)
        }
        (false, Some(_)) => {
            debug!(title = %raw.title, "dropping completedAt on pending task");
            None
        }
        (false, None) => None,
    };

    let created_at = match raw.created_at.as_deref() {
        Some(s) => parse_instant(s)?,
        None => now,
    };

    Ok(Task {
        id: raw.id.unwrap_or_else(Uuid::new_v4),
        title: raw.title,
        description: raw.description,
        contact,
        due_date,
        due_time,
        category: raw.category.as_deref().map(Category::parse).unwrap_or_default(),
        priority: raw.priority.as_deref().map(Priority::parse).unwrap_or_default(),
        completed_at,
        recurrence: raw.recurrence.as_deref().and_then(Recurrence::parse),
        created_at,
        updated_at: created_at,
    })
}

fn record_from_raw(raw: RawRecord) -> Result<InteractionRecord> {
    let kind = raw
        .kind
        .as_deref()
        .map(InteractionKind::parse)
        .unwrap_or_default();
    let mut record = InteractionRecord::new(raw.contact_id, kind, raw.content, parse_day(&raw.date)?);
    if let Some(id) = raw.id {
        record.id = id;
    }
    record.promises = raw.promises;
    record.key_facts = raw.key_facts;
    record.next_step = raw.next_step;
    Ok(record)
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part kept).
pub fn parse_day(s: &str) -> std::result::Result<NaiveDate, Error> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| Error::InvalidDate(s.to_string()))
}

fn parse_instant(s: &str) -> std::result::Result<DateTime<Utc>, Error> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        })
        .map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> std::result::Result<NaiveTime, Error> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| Error::InvalidDate(s.to_string()))
}
