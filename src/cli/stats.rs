use anyhow::Result;

use super::Clock;
use crate::models::Tier;
use crate::stats::Summary;
use crate::store::Repository;

pub fn run_stats(store: &impl Repository, clock: &Clock) -> Result<()> {
    let summary = Summary::compute(store.contacts(), store.tasks(), clock.today);

    println!("Contacts: {}", summary.contacts);
    for tier in Tier::ALL {
        println!("  {:<14} {}", tier.label(), summary.tier_count(tier));
    }
    println!("  favorites      {}", summary.favorites);
    println!("  overdue        {}", summary.overdue_contacts);
    println!("  never reached  {}", summary.never_contacted);

    println!("\nTasks: {} pending", summary.pending_tasks);
    println!("  overdue        {}", summary.overdue_tasks);
    println!("  due today      {}", summary.due_today);
    println!("  completed      {}", summary.completed_tasks);
    if let Some(rate) = summary.completion_rate {
        println!("  completion     {:.0}%", rate * 100.0);
    }
    Ok(())
}
