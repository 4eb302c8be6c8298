use chrono::NaiveDate;
use serde::Serialize;

use crate::agenda::Agenda;
use crate::models::{Contact, Task, Tier};
use crate::recency::Recency;

/// Headline numbers for the statistics screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub contacts: usize,
    /// Counts per tier, best tier first.
    pub by_tier: [usize; 4],
    pub favorites: usize,
    pub overdue_contacts: usize,
    pub never_contacted: usize,
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
    pub due_today: usize,
    pub completed_tasks: usize,
    /// Completed over all tasks; `None` with no tasks.
    pub completion_rate: Option<f64>,
}

impl Summary {
    pub fn compute(contacts: &[Contact], tasks: &[Task], today: NaiveDate) -> Self {
        let mut by_tier = [0usize; 4];
        let mut favorites = 0;
        let mut overdue_contacts = 0;
        let mut never_contacted = 0;

        for contact in contacts {
            by_tier[contact.tier.rank()] += 1;
            if contact.favorite {
                favorites += 1;
            }
            let recency = Recency::evaluate(contact, today);
            if recency.overdue {
                overdue_contacts += 1;
            }
            if recency.never_contacted() {
                never_contacted += 1;
            }
        }

        let agenda = Agenda::partition(tasks, today);
        let completed_tasks = tasks.iter().filter(|t| t.is_completed()).count();
        let completion_rate = if tasks.is_empty() {
            None
        } else {
            Some(completed_tasks as f64 / tasks.len() as f64)
        };

        Self {
            contacts: contacts.len(),
            by_tier,
            favorites,
            overdue_contacts,
            never_contacted,
            pending_tasks: agenda.len(),
            overdue_tasks: agenda.overdue.len(),
            due_today: agenda.due_today.len(),
            completed_tasks,
            completion_rate,
        }
    }

    pub fn tier_count(&self, tier: Tier) -> usize {
        self.by_tier[tier.rank()]
    }
}
