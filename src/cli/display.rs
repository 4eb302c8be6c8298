use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::{Contact, InteractionRecord, Task};
use crate::query::MatchContext;
use crate::recency::Recency;

/// Truncate to `max_chars` characters, ending with an ellipsis when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let text: String = s.chars().take(max_chars - 1).collect();
    format!("{}…", text.trim_end())
}

/// Relative due text within a week of `today`, the ISO date beyond it.
pub fn format_due(date: NaiveDate, today: NaiveDate) -> String {
    let offset = date.signed_duration_since(today).num_days();
    match offset.cmp(&0) {
        Ordering::Less => {
            let late = offset.unsigned_abs();
            let unit = if late == 1 { "day" } else { "days" };
            format!("{} {} overdue", late, unit)
        }
        Ordering::Equal => "today".to_string(),
        Ordering::Greater if offset == 1 => "tomorrow".to_string(),
        Ordering::Greater if offset <= 7 => format!("in {} days", offset),
        Ordering::Greater => date.to_string(),
    }
}

/// Short badge for a contact's recency, e.g. "overdue 15d" or "12d ago".
pub fn recency_badge(recency: &Recency) -> String {
    if recency.never_contacted() {
        "never contacted".into()
    } else if recency.overdue {
        format!("overdue {}d", recency.magnitude)
    } else if recency.days_since == 0 {
        "today".into()
    } else {
        format!("{}d ago", recency.days_since)
    }
}

pub fn match_hint(context: &MatchContext) -> String {
    match context {
        MatchContext::Tag { text } => format!("tag: {}", text),
        MatchContext::Notes { text } => format!("notes: {}", text),
    }
}

/// One line per task: "  [x] title - when (contact)"
pub fn print_task_line(task: &Task, today: NaiveDate) {
    let check = if task.is_completed() { "[x]" } else { "[ ]" };
    let when = match task.due_time {
        Some(time) => format!("{} {}", format_due(task.due_date, today), time.format("%H:%M")),
        None => format_due(task.due_date, today),
    };
    let who = task
        .contact
        .as_ref()
        .map(|c| format!(" ({})", c.name))
        .unwrap_or_default();
    println!(
        "  {} {} - {}{}  {}",
        check,
        truncate(&task.title, 40),
        when,
        who,
        &task.id.to_string()[..8]
    );
}

/// Full contact detail, skipping empty fields.
pub fn print_contact(contact: &Contact, today: NaiveDate) {
    let recency = Recency::evaluate(contact, today);
    let star = if contact.favorite { " *" } else { "" };
    println!("{} [{}]{}\n", contact.name, contact.tier.label(), star);

    match (&contact.title, &contact.company) {
        (Some(t), Some(c)) => println!("  {} at {}", t, c),
        (None, Some(c)) => println!("  {}", c),
        (Some(t), None) => println!("  {}", t),
        (None, None) => {}
    }
    println!("  {}", contact.phone);
    for value in [&contact.wechat, &contact.email].into_iter().flatten() {
        println!("  {}", value);
    }
    if !contact.tags.is_empty() {
        println!("  #{}", contact.tags.join(" #"));
    }

    let labelled = [
        ("likes", &contact.preferences),
        ("avoid", &contact.taboos),
        ("hobbies", &contact.hobbies),
        ("notes", &contact.notes),
    ];
    for (label, value) in labelled {
        if let Some(text) = value.as_deref().filter(|s| !s.is_empty()) {
            println!("  {}: {}", label, truncate(text, 60));
        }
    }

    let last = contact
        .last_interaction
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "\n  every {}d, last {} ({})",
        contact.frequency_days,
        last,
        recency_badge(&recency)
    );
}

pub fn print_record(record: &InteractionRecord) {
    println!(
        "  {} {:<8} {}",
        record.date.format("%Y-%m-%d"),
        record.kind.as_str(),
        truncate(&record.content, 50)
    );
    for (label, value) in [
        ("promised", &record.promises),
        ("facts", &record.key_facts),
        ("next", &record.next_step),
    ] {
        if let Some(text) = value {
            println!("             {}: {}", label, truncate(text, 50));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("普洱茶很好喝", 4), "普洱茶…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_format_due() {
        let today = day("2025-02-04");
        assert_eq!(format_due(day("2025-02-01"), today), "3 days overdue");
        assert_eq!(format_due(day("2025-02-03"), today), "1 day overdue");
        assert_eq!(format_due(today, today), "today");
        assert_eq!(format_due(day("2025-02-05"), today), "tomorrow");
        assert_eq!(format_due(day("2025-02-08"), today), "in 4 days");
        assert_eq!(format_due(day("2025-03-01"), today), "2025-03-01");
        assert_eq!(format_due(day("2025-02-11"), today), "in 7 days");
        assert_eq!(format_due(day("2025-02-12"), today), "2025-02-12");
    }

    #[test]
    fn test_recency_badge() {
        let overdue = Recency { days_since: 45, overdue: true, magnitude: 15 };
        assert_eq!(recency_badge(&overdue), "overdue 15d");
        let fresh = Recency { days_since: 3, overdue: false, magnitude: -27 };
        assert_eq!(recency_badge(&fresh), "3d ago");
        let never = Recency { days_since: crate::recency::NEVER_CONTACTED, overdue: true, magnitude: i64::MAX };
        assert_eq!(recency_badge(&never), "never contacted");
    }
}
