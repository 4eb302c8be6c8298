use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::Repository;
use crate::error::{Error, Result};
use crate::models::{Contact, InteractionRecord, Task};

/// In-memory backing for [`Repository`]. Collections keep insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    contacts: Vec<Contact>,
    tasks: Vec<Task>,
    records: Vec<InteractionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn contact_index(&self, id: Uuid) -> Result<usize> {
        self.contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or(Error::UnknownContact(id))
    }

    fn task_mut(&mut self, id: Uuid) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::UnknownTask(id))
    }
}

impl Repository for MemoryStore {
    fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    fn contact(&self, id: Uuid) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    fn insert_contact(&mut self, contact: Contact) -> Result<()> {
        if self.contact(contact.id).is_some() {
            return Err(Error::DuplicateId(contact.id));
        }
        debug!(id = %contact.id, name = %contact.name, "insert contact");
        self.contacts.push(contact);
        Ok(())
    }

    fn update_contact(&mut self, contact: Contact) -> Result<Contact> {
        let idx = self.contact_index(contact.id)?;
        info!(id = %contact.id, "update contact");
        self.contacts[idx] = contact.clone();
        Ok(contact)
    }

    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn insert_task(&mut self, task: Task) -> Result<()> {
        if self.task(task.id).is_some() {
            return Err(Error::DuplicateId(task.id));
        }
        debug!(id = %task.id, title = %task.title, "insert task");
        self.tasks.push(task);
        Ok(())
    }

    fn toggle_task(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<Task> {
        let task = self.task_mut(id)?;
        task.toggle_completion(now);
        info!(id = %id, completed = task.is_completed(), "toggle task");
        Ok(task.clone())
    }

    fn reschedule_task(
        &mut self,
        id: Uuid,
        due_date: NaiveDate,
        due_time: Option<NaiveTime>,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let task = self.task_mut(id)?;
        task.reschedule(due_date, due_time, now);
        info!(id = %id, due = %due_date, "reschedule task");
        Ok(task.clone())
    }

    fn append_record(&mut self, record: InteractionRecord) -> Result<()> {
        let idx = self.contact_index(record.contact_id)?;
        self.contacts[idx].touch(record.date);
        info!(contact = %record.contact_id, kind = record.kind.as_str(), date = %record.date, "append record");
        self.records.push(record);
        Ok(())
    }

    fn records_for(&self, contact_id: Uuid) -> Vec<&InteractionRecord> {
        let mut records: Vec<&InteractionRecord> = self
            .records
            .iter()
            .filter(|r| r.contact_id == contact_id)
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }
}
