//! Follow-up task commands: the daily agenda, completion toggling and
//! rescheduling. Mutations print the updated task as JSON.

use anyhow::{anyhow, bail, Result};
use chrono::{Days, NaiveDate};
use uuid::Uuid;

use super::display::print_task_line;
use super::{Clock, RescheduleArgs};
use crate::agenda::Agenda;
use crate::models::Task;
use crate::store::{datafile, Repository};

pub fn run_today(store: &impl Repository, clock: &Clock) -> Result<()> {
    let agenda = Agenda::partition(store.tasks(), clock.today);
    if agenda.is_empty() {
        println!("Nothing due.");
        return Ok(());
    }

    let split = agenda.split_today(|id| store.contact(id).map(|c| c.tier));

    print_section("OVERDUE", &agenda.overdue, clock);
    print_section("VIP FOCUS", &split.vip, clock);
    print_section("TODAY", &split.routine, clock);
    print_section("UPCOMING", &agenda.upcoming, clock);
    Ok(())
}

fn print_section(title: &str, tasks: &[&Task], clock: &Clock) {
    if tasks.is_empty() {
        return;
    }
    println!("{} ({}):", title, tasks.len());
    for task in tasks {
        print_task_line(task, clock.today);
    }
    println!();
}

pub fn run_done(store: &mut impl Repository, identifier: &str, clock: &Clock) -> Result<()> {
    let id = find_task_id(&*store, identifier)?;
    let task = store.toggle_task(id, clock.now)?;
    println!("{}", serde_json::to_string_pretty(&task)?);
    Ok(())
}

pub fn run_reschedule(store: &mut impl Repository, args: &RescheduleArgs, clock: &Clock) -> Result<()> {
    let id = find_task_id(&*store, &args.task)?;
    let date = parse_due_date(&args.date, clock.today)?;
    let time = args.at.as_deref().map(datafile::parse_time).transpose()?;
    let task = store.reschedule_task(id, date, time, clock.now)?;
    println!("{}", serde_json::to_string_pretty(&task)?);
    Ok(())
}

/// Resolve a full task UUID or a unique prefix of one.
fn find_task_id(store: &impl Repository, identifier: &str) -> Result<Uuid> {
    let identifier = identifier.trim().to_lowercase();
    if identifier.is_empty() {
        bail!("No task given");
    }
    if let Ok(id) = Uuid::parse_str(&identifier) {
        return Ok(id);
    }

    let matches: Vec<Uuid> = store
        .tasks()
        .iter()
        .map(|t| t.id)
        .filter(|id| id.to_string().starts_with(&identifier))
        .collect();
    match matches.as_slice() {
        [] => bail!("No task matches {}", identifier),
        [id] => Ok(*id),
        _ => bail!("{} matches {} tasks, use more characters", identifier, matches.len()),
    }
}

const DATE_USAGE: &str = "Invalid date. Use: today, tomorrow, +3d, +1w, or YYYY-MM-DD";

/// Parse a due date: "today", "tomorrow", "+Nd", "+Nw" or YYYY-MM-DD.
fn parse_due_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim().to_lowercase();
    let offset = match input.as_str() {
        "today" => 0,
        "tomorrow" => 1,
        _ => match input.strip_prefix('+') {
            Some(offset) => offset_days(offset)?,
            None => return datafile::parse_day(&input).map_err(|_| anyhow!(DATE_USAGE)),
        },
    };
    today
        .checked_add_days(Days::new(offset))
        .ok_or_else(|| anyhow!("{} is past the last supported date", input))
}

/// Day count of an offset such as "3d" or "2w".
fn offset_days(offset: &str) -> Result<u64> {
    let split = offset
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(offset.len());
    let (count, unit) = offset.split_at(split);
    let days_per_unit: u64 = match unit {
        "d" => 1,
        "w" => 7,
        _ => bail!("Use +Nd or +Nw (e.g., +3d, +1w)"),
    };
    if count.is_empty() {
        bail!("Missing count before '{}'", unit);
    }
    let count: u64 = count
        .parse()
        .map_err(|_| anyhow!("Offset too large: {}", count))?;
    count
        .checked_mul(days_per_unit)
        .ok_or_else(|| anyhow!("Offset too large: +{}", offset))
}
