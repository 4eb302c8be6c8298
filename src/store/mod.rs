use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Contact, InteractionRecord, Task};

pub mod datafile;
mod memory;

pub use memory::MemoryStore;

/// Create/read/update contract for contacts, tasks and interaction
/// records. Nothing is ever deleted.
pub trait Repository {
    // ==================== CONTACTS ====================

    fn contacts(&self) -> &[Contact];

    fn contact(&self, id: Uuid) -> Option<&Contact>;

    fn insert_contact(&mut self, contact: Contact) -> Result<()>;

    /// Replace the stored contact that has the same id.
    fn update_contact(&mut self, contact: Contact) -> Result<Contact>;

    // ==================== TASKS ====================

    fn tasks(&self) -> &[Task];

    fn task(&self, id: Uuid) -> Option<&Task>;

    fn insert_task(&mut self, task: Task) -> Result<()>;

    /// Flip completion on one task and return its new state.
    fn toggle_task(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<Task>;

    fn reschedule_task(
        &mut self,
        id: Uuid,
        due_date: NaiveDate,
        due_time: Option<NaiveTime>,
        now: DateTime<Utc>,
    ) -> Result<Task>;

    // ==================== RECORDS ====================

    /// Append a record and advance the contact's last-interaction date.
    fn append_record(&mut self, record: InteractionRecord) -> Result<()>;

    /// Records for one contact, newest first.
    fn records_for(&self, contact_id: Uuid) -> Vec<&InteractionRecord>;

    /// Contacts whose name contains `name`, case-insensitively.
    fn find_contacts_by_name(&self, name: &str) -> Vec<&Contact> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.contacts()
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Open and completed tasks linked to a contact.
    fn tasks_for_contact(&self, contact_id: Uuid) -> Vec<&Task> {
        self.tasks()
            .iter()
            .filter(|t| t.contact_id() == Some(contact_id))
            .collect()
    }
}
