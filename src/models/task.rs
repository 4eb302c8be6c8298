use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Contact;

/// What kind of follow-up a task represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Appointment,
    Birthday,
    Care,
    Promise,
    #[default]
    Custom,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Birthday => "birthday",
            Self::Care => "care",
            Self::Promise => "promise",
            Self::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "appointment" => Self::Appointment,
            "birthday" => Self::Birthday,
            "care" => Self::Care,
            "promise" => Self::Promise,
            _ => Self::Custom,
        }
    }
}

/// Priority rank; declaration order is rank order, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Non-owning link from a task to a contact, with the name as it was
/// when the task was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&Contact> for ContactRef {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name.clone(),
        }
    }
}

/// A follow-up or reminder. Completion is carried by `completed_at` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub contact: Option<ContactRef>,
    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    pub category: Category,
    pub priority: Priority,
    pub completed_at: Option<DateTime<Utc>>,
    pub recurrence: Option<Recurrence>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: String, due_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            contact: None,
            due_date,
            due_time: None,
            category: Category::default(),
            priority: Priority::default(),
            completed_at: None,
            recurrence: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a task pre-seeded from a contact's context.
    pub fn for_contact(
        title: String,
        due_date: NaiveDate,
        contact: &Contact,
        now: DateTime<Utc>,
    ) -> Self {
        let mut task = Self::new(title, due_date, now);
        task.contact = Some(ContactRef::from(contact));
        task
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Flip between pending and completed. Completing stamps `now`,
    /// reopening clears the stamp.
    pub fn toggle_completion(&mut self, now: DateTime<Utc>) {
        self.completed_at = match self.completed_at {
            Some(_) => None,
            None => Some(now),
        };
        self.updated_at = now;
    }

    pub fn reschedule(&mut self, due_date: NaiveDate, due_time: Option<NaiveTime>, now: DateTime<Utc>) {
        self.due_date = due_date;
        self.due_time = due_time;
        self.updated_at = now;
    }

    pub fn contact_id(&self) -> Option<Uuid> {
        self.contact.as_ref().map(|c| c.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_task_new() {
        let task = Task::new("Call back".to_string(), day("2025-02-04"), at("2025-02-01T00:00:00Z"));
        assert_eq!(task.title, "Call back");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, Category::Custom);
        assert!(!task.is_completed());
    }

    #[test]
    fn test_toggle_twice_restamps() {
        let mut task = Task::new("Visit".to_string(), day("2025-02-04"), at("2025-02-01T00:00:00Z"));

        task.toggle_completion(at("2025-02-04T09:00:00Z"));
        assert!(task.is_completed());
        assert_eq!(task.completed_at, Some(at("2025-02-04T09:00:00Z")));

        task.toggle_completion(at("2025-02-04T10:00:00Z"));
        assert!(!task.is_completed());
        assert_eq!(task.completed_at, None);

        task.toggle_completion(at("2025-02-04T11:00:00Z"));
        assert_eq!(task.completed_at, Some(at("2025-02-04T11:00:00Z")));
    }

    #[test]
    fn test_reschedule() {
        let mut task = Task::new("Lunch".to_string(), day("2025-02-04"), at("2025-02-01T00:00:00Z"));
        let time = NaiveTime::from_hms_opt(12, 30, 0);
        task.reschedule(day("2025-02-10"), time, at("2025-02-02T00:00:00Z"));
        assert_eq!(task.due_date, day("2025-02-10"));
        assert_eq!(task.due_time, time);
        assert_eq!(task.updated_at, at("2025-02-02T00:00:00Z"));
    }

    #[test]
    fn test_category_and_priority_parse() {
        assert_eq!(Category::parse("Birthday"), Category::Birthday);
        assert_eq!(Category::parse("whatever"), Category::Custom);
        assert_eq!(Priority::parse("HIGH"), Priority::High);
        assert_eq!(Priority::parse(""), Priority::Medium);
        assert!(Priority::High < Priority::Low);
        assert_eq!(Recurrence::parse("weekly"), Some(Recurrence::Weekly));
        assert_eq!(Recurrence::parse("never"), None);
    }
}
