use anyhow::{bail, Result};
use uuid::Uuid;

use super::display::{match_hint, print_contact, print_record, print_task_line, recency_badge, truncate};
use super::{Clock, ContactsArgs, LogArgs};
use crate::models::{Contact, InteractionKind, InteractionRecord};
use crate::query::{self, ContactQuery, Filter, SortKey};
use crate::recency::Recency;
use crate::store::{datafile, Repository};

pub fn run_contacts(store: &impl Repository, args: &ContactsArgs, clock: &Clock) -> Result<()> {
    let filter = Filter::parse(&args.filter)
        .ok_or_else(|| anyhow::anyhow!("Unknown filter: {}. Use all, s, a, b, c, overdue or favorite", args.filter))?;
    let sort = SortKey::parse(&args.sort)
        .ok_or_else(|| anyhow::anyhow!("Unknown sort: {}. Use name, recent or level", args.sort))?;

    let query = ContactQuery {
        query: args.query.clone(),
        filter,
        sort,
    };
    let hits = query::apply(store.contacts(), &query, clock.today);

    if hits.is_empty() {
        println!("No contacts.");
        return Ok(());
    }

    println!("{:<20}  {:<4}  {:<16}  {}", "NAME", "TIER", "LAST", "MATCH");
    for hit in &hits {
        let recency = Recency::evaluate(hit.contact, clock.today);
        let star = if hit.contact.favorite { "*" } else { " " };
        let hint = hit.context.as_ref().map(match_hint).unwrap_or_default();
        println!(
            "{}{:<19}  {:<4}  {:<16}  {}",
            star,
            truncate(&hit.contact.name, 19),
            hit.contact.tier.as_str(),
            recency_badge(&recency),
            hint
        );
    }
    println!("\n{} contact(s)", hits.len());
    Ok(())
}

pub fn run_show(store: &impl Repository, identifier: &str, clock: &Clock) -> Result<()> {
    let contact = find_contact_by_identifier(store, identifier)?;
    print_contact(contact, clock.today);

    let records = store.records_for(contact.id);
    if !records.is_empty() {
        println!("\nHistory:");
        for record in records {
            print_record(record);
        }
    }

    let tasks = store.tasks_for_contact(contact.id);
    if !tasks.is_empty() {
        println!("\nTasks:");
        for task in tasks {
            print_task_line(task, clock.today);
        }
    }
    Ok(())
}

pub fn run_log(store: &mut impl Repository, args: &LogArgs, clock: &Clock) -> Result<()> {
    let contact_id = find_contact_by_identifier(&*store, &args.identifier)?.id;
    let date = match args.date.as_deref() {
        Some(s) => datafile::parse_day(s)?,
        None => clock.today,
    };

    let mut record = InteractionRecord::new(
        contact_id,
        InteractionKind::parse(&args.kind),
        args.content.clone(),
        date,
    );
    record.promises = args.promises.clone();
    record.next_step = args.next.clone();
    store.append_record(record)?;

    if let Some(contact) = store.contact(contact_id) {
        let recency = Recency::evaluate(contact, clock.today);
        println!("Logged {} with {} ({})", args.kind, contact.name, recency_badge(&recency));
    }
    Ok(())
}

/// Find a contact by UUID or name. Ambiguous names list the candidates.
pub fn find_contact_by_identifier<'a, R: Repository>(store: &'a R, identifier: &str) -> Result<&'a Contact> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        bail!("No contact given");
    }

    if let Ok(id) = Uuid::parse_str(identifier) {
        return store
            .contact(id)
            .ok_or_else(|| anyhow::anyhow!("Not found: {}", identifier));
    }

    let matches = store.find_contacts_by_name(identifier);
    if let Some(exact) = matches.iter().find(|c| c.name == identifier) {
        return Ok(*exact);
    }
    match matches.as_slice() {
        [] => bail!("Not found: {}", identifier),
        [only] => Ok(*only),
        many => {
            let names: Vec<&str> = many.iter().map(|c| c.name.as_str()).collect();
            bail!("{} matches several contacts: {}", identifier, names.join(", "))
        }
    }
}
