//! Partitioning of open tasks into overdue, due-today and upcoming buckets.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::models::{Task, Tier};

/// Open tasks bucketed against a single day. Completed tasks are dropped.
#[derive(Debug, Default)]
pub struct Agenda<'a> {
    /// Due before today, oldest first.
    pub overdue: Vec<&'a Task>,
    /// Due today, in collection order.
    pub due_today: Vec<&'a Task>,
    /// Due after today, soonest first.
    pub upcoming: Vec<&'a Task>,
}

/// The due-today bucket split by the linked contact's tier.
#[derive(Debug, Default)]
pub struct TodaySplit<'a> {
    pub vip: Vec<&'a Task>,
    pub routine: Vec<&'a Task>,
}

impl<'a> Agenda<'a> {
    pub fn partition<I>(tasks: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut agenda = Agenda::default();
        for task in tasks {
            if task.is_completed() {
                continue;
            }
            match task.due_date.cmp(&today) {
                Ordering::Less => agenda.overdue.push(task),
                Ordering::Equal => agenda.due_today.push(task),
                Ordering::Greater => agenda.upcoming.push(task),
            }
        }

        agenda.overdue.sort_by(|a, b| by_due(a, b));
        agenda
            .upcoming
            .sort_by(|a, b| by_due(a, b).then(a.priority.cmp(&b.priority)));
        agenda
    }

    pub fn len(&self) -> usize {
        self.overdue.len() + self.due_today.len() + self.upcoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overdue first, then today, then upcoming.
    pub fn combined(&self) -> Vec<&'a Task> {
        self.overdue
            .iter()
            .chain(&self.due_today)
            .chain(&self.upcoming)
            .copied()
            .collect()
    }

    /// Split today's tasks into VIP focus (linked contact in tier S or A)
    /// and routine. `tier_of` resolves a contact id; unresolved links and
    /// unlinked tasks are routine.
    pub fn split_today<F>(&self, tier_of: F) -> TodaySplit<'a>
    where
        F: Fn(Uuid) -> Option<Tier>,
    {
        let mut vip: Vec<(Tier, &'a Task)> = Vec::new();
        let mut routine = Vec::new();

        for &task in &self.due_today {
            match task.contact_id().and_then(&tier_of) {
                Some(tier) if tier.is_vip() => vip.push((tier, task)),
                _ => routine.push(task),
            }
        }

        vip.sort_by_key(|(tier, _)| *tier);
        // Timed items ascending, untimed after them in collection order.
        routine.sort_by(|a, b| timed_first(a.due_time, b.due_time));

        TodaySplit {
            vip: vip.into_iter().map(|(_, task)| task).collect(),
            routine,
        }
    }
}

fn by_due(a: &Task, b: &Task) -> Ordering {
    a.due_date
        .cmp(&b.due_date)
        .then_with(|| timed_first(a.due_time, b.due_time))
}

fn timed_first(a: Option<NaiveTime>, b: Option<NaiveTime>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
