//! Search, filter and sort over a contact collection.

use std::cmp::Ordering;

use chrono::NaiveDate;
use pinyin::ToPinyin;
use serde::{Deserialize, Serialize};

use crate::models::{Contact, Tier};
use crate::recency::Recency;

/// Characters kept before a note match in its snippet.
const SNIPPET_BEFORE: usize = 10;
/// Characters kept from the match start onwards.
const SNIPPET_AFTER: usize = 20;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Tier(Tier),
    Overdue,
    Favorite,
}

impl Filter {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "overdue" => Some(Self::Overdue),
            "favorite" | "fav" => Some(Self::Favorite),
            other => Tier::parse(other).map(Self::Tier),
        }
    }

    fn matches(&self, contact: &Contact, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Tier(tier) => contact.tier == *tier,
            Self::Overdue => Recency::evaluate(contact, today).overdue,
            Self::Favorite => contact.favorite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Name,
    Recent,
    #[default]
    Level,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "recent" => Some(Self::Recent),
            "level" | "tier" => Some(Self::Level),
            _ => None,
        }
    }

    fn compare(&self, a: &Contact, b: &Contact) -> Ordering {
        match self {
            Self::Name => collation_key(&a.name)
                .cmp(&collation_key(&b.name))
                .then_with(|| a.name.cmp(&b.name)),
            Self::Recent => most_recent_first(a, b),
            Self::Level => a.tier.cmp(&b.tier).then_with(|| most_recent_first(a, b)),
        }
    }
}

/// zh-CN sort key: Han characters become space-separated toneless pinyin
/// syllables, everything else is case-folded.
fn collation_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len() * 2);
    for ch in name.chars() {
        match ch.to_pinyin() {
            Some(syllable) => {
                key.push_str(syllable.plain());
                key.push(' ');
            }
            None => key.extend(ch.to_lowercase()),
        }
    }
    key
}

/// Lowercase one char at a time, so needle and haystack fold identically.
fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// `None` compares below every date, so never-contacted sorts last.
fn most_recent_first(a: &Contact, b: &Contact) -> Ordering {
    b.last_interaction.cmp(&a.last_interaction)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    pub query: String,
    pub filter: Filter,
    pub sort: SortKey,
}

/// Why a contact matched when the hit was not on a primary field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MatchContext {
    Tag { text: String },
    Notes { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactHit<'a> {
    pub contact: &'a Contact,
    pub context: Option<MatchContext>,
}

/// Run the search, filter and sort pipeline. All sorts are stable.
pub fn apply<'a>(contacts: &'a [Contact], query: &ContactQuery, today: NaiveDate) -> Vec<ContactHit<'a>> {
    let match_all = query.query.trim().is_empty();
    let needle = fold(&query.query);

    let mut hits: Vec<ContactHit<'a>> = contacts
        .iter()
        .filter(|c| query.filter.matches(c, today))
        .filter_map(|c| {
            if match_all {
                return Some(ContactHit { contact: c, context: None });
            }
            match_contact(c, &needle).map(|context| ContactHit { contact: c, context })
        })
        .collect();

    match query.sort {
        SortKey::Name => hits.sort_by_cached_key(|h| (collation_key(&h.contact.name), h.contact.name.clone())),
        sort => hits.sort_by(|a, b| sort.compare(a.contact, b.contact)),
    }
    hits
}

/// `Some(None)` for a primary-field hit, `Some(Some(ctx))` for tags or
/// notes, `None` when nothing matches. `needle` is already folded.
fn match_contact(contact: &Contact, needle: &str) -> Option<Option<MatchContext>> {
    let primary = [
        Some(contact.name.as_str()),
        contact.company.as_deref(),
        contact.title.as_deref(),
        Some(contact.phone.as_str()),
    ];
    if primary
        .into_iter()
        .flatten()
        .any(|field| fold(field).contains(needle))
    {
        return Some(None);
    }

    if let Some(tag) = contact.tags.iter().find(|t| fold(t).contains(needle)) {
        return Some(Some(MatchContext::Tag { text: tag.clone() }));
    }

    let notes = contact.notes.as_deref()?;
    let start = find_ignore_case(notes, needle)?;
    Some(Some(MatchContext::Notes {
        text: snippet(notes, start),
    }))
}

/// Char index of the first occurrence of the already folded `needle`.
fn find_ignore_case(text: &str, needle: &str) -> Option<usize> {
    let chars: Vec<char> = text.chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return Some(0);
    }

    for start in 0..chars.len() {
        let mut folded: Vec<char> = Vec::with_capacity(needle.len());
        let mut end = start;
        while folded.len() < needle.len() && end < chars.len() {
            folded.extend(chars[end].to_lowercase());
            end += 1;
        }
        if folded.starts_with(&needle) {
            return Some(start);
        }
    }
    None
}

fn snippet(text: &str, match_start: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let from = match_start.saturating_sub(SNIPPET_BEFORE);
    let to = (match_start + SNIPPET_AFTER).min(chars.len());

    let mut out = String::new();
    if from > 0 {
        out.push_str(ELLIPSIS);
    }
    out.extend(&chars[from..to]);
    if to < chars.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewContact;
    use chrono::{DateTime, Utc};

    fn today() -> NaiveDate {
        "2025-02-15".parse().unwrap()
    }

    fn now() -> DateTime<Utc> {
        "2025-02-15T08:00:00Z".parse().unwrap()
    }

    fn contact(name: &str, tier: Tier, last: Option<&str>) -> Contact {
        let mut form = NewContact::new(name, "13800138000");
        form.tier = tier;
        form.frequency_days = Some(30);
        let mut c = form.build(now()).unwrap();
        c.last_interaction = last.map(|d| d.parse().unwrap());
        c
    }

    fn names(hits: &[ContactHit]) -> Vec<String> {
        hits.iter().map(|h| h.contact.name.clone()).collect()
    }

    fn run(contacts: &[Contact], query: &str, filter: Filter, sort: SortKey) -> Vec<String> {
        let q = ContactQuery { query: query.to_string(), filter, sort };
        names(&apply(contacts, &q, today()))
    }

    #[test]
    fn test_tag_match_context() {
        let mut c = contact("张伟", Tier::A, None);
        c.tags = vec!["高尔夫".into(), "普洱茶".into()];
        let contacts = vec![c];
        let q = ContactQuery { query: "普洱".into(), ..Default::default() };
        let hits = apply(&contacts, &q, today());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].context, Some(MatchContext::Tag { text: "普洱茶".into() }));
    }

    #[test]
    fn test_primary_field_match_has_no_context() {
        let mut c = contact("Alice Wong", Tier::B, None);
        c.company = Some("Acme Trading".into());
        c.tags = vec!["acme".into()];
        let contacts = vec![c];
        let q = ContactQuery { query: "ACME".into(), ..Default::default() };
        let hits = apply(&contacts, &q, today());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].context, None);
    }

    #[test]
    fn test_notes_snippet_truncated() {
        let mut c = contact("Bob", Tier::B, None);
        c.notes = Some("Met at the spring fair, prefers green tea over coffee and hates long calls".into());
        let contacts = vec![c];
        let q = ContactQuery { query: "Green".into(), ..Default::default() };
        let hits = apply(&contacts, &q, today());
        assert_eq!(
            hits[0].context,
            Some(MatchContext::Notes { text: "..., prefers green tea over coffe...".into() })
        );
    }

    #[test]
    fn test_notes_snippet_short_text_untruncated() {
        assert_eq!(snippet("likes tea", 6), "likes tea");
    }

    #[test]
    fn test_no_match_excluded() {
        let contacts = vec![contact("Carol", Tier::C, None)];
        assert!(run(&contacts, "zzz", Filter::All, SortKey::Name).is_empty());
    }

    #[test]
    fn test_overdue_filter_uses_frequency() {
        let contacts = vec![
            contact("fresh", Tier::B, Some("2025-02-10")),
            contact("stale", Tier::B, Some("2025-01-01")),
            contact("never", Tier::B, None),
        ];
        assert_eq!(run(&contacts, "", Filter::Overdue, SortKey::Name), vec!["never", "stale"]);
    }

    #[test]
    fn test_tier_and_favorite_filters() {
        let mut fav = contact("fav", Tier::C, None);
        fav.favorite = true;
        let contacts = vec![contact("s", Tier::S, None), fav];
        assert_eq!(run(&contacts, "", Filter::Tier(Tier::S), SortKey::Name), vec!["s"]);
        assert_eq!(run(&contacts, "", Filter::Favorite, SortKey::Name), vec!["fav"]);
    }

    #[test]
    fn test_level_sort_orders_tiers_then_recency() {
        let contacts = vec![
            contact("c", Tier::C, Some("2025-02-14")),
            contact("a-old", Tier::A, Some("2025-01-01")),
            contact("s", Tier::S, None),
            contact("b", Tier::B, Some("2025-02-01")),
            contact("a-new", Tier::A, Some("2025-02-10")),
        ];
        assert_eq!(
            run(&contacts, "", Filter::All, SortKey::Level),
            vec!["s", "a-new", "a-old", "b", "c"]
        );
    }

    #[test]
    fn test_recent_sort_never_contacted_last() {
        let contacts = vec![
            contact("never", Tier::S, None),
            contact("old", Tier::S, Some("2024-12-01")),
            contact("new", Tier::S, Some("2025-02-14")),
        ];
        assert_eq!(run(&contacts, "", Filter::All, SortKey::Recent), vec!["new", "old", "never"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let contacts = vec![
            contact("first", Tier::A, Some("2025-02-01")),
            contact("second", Tier::A, Some("2025-02-01")),
            contact("third", Tier::A, Some("2025-02-01")),
        ];
        assert_eq!(
            run(&contacts, "", Filter::All, SortKey::Level),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_name_sort_case_insensitive() {
        let contacts = vec![
            contact("bob", Tier::B, None),
            contact("Alice", Tier::B, None),
            contact("carl", Tier::B, None),
        ];
        assert_eq!(run(&contacts, "", Filter::All, SortKey::Name), vec!["Alice", "bob", "carl"]);
    }

    #[test]
    fn test_name_sort_follows_pinyin() {
        let contacts = vec![
            contact("张伟", Tier::B, None),
            contact("王芳", Tier::B, None),
            contact("李娜", Tier::B, None),
        ];
        assert_eq!(run(&contacts, "", Filter::All, SortKey::Name), vec!["李娜", "王芳", "张伟"]);
    }

    #[test]
    fn test_name_sort_mixes_latin_and_han() {
        let contacts = vec![
            contact("Zoe", Tier::B, None),
            contact("陈静", Tier::B, None),
            contact("amy", Tier::B, None),
            contact("李娜", Tier::B, None),
        ];
        assert_eq!(
            run(&contacts, "", Filter::All, SortKey::Name),
            vec!["amy", "陈静", "李娜", "Zoe"]
        );
    }

    #[test]
    fn test_name_sort_stable_for_identical_names() {
        let mut first = contact("王芳", Tier::B, None);
        first.company = Some("first".into());
        let mut second = contact("王芳", Tier::A, None);
        second.company = Some("second".into());
        let contacts = vec![first, second];
        let q = ContactQuery { sort: SortKey::Name, ..Default::default() };
        let companies: Vec<_> = apply(&contacts, &q, today())
            .iter()
            .map(|h| h.contact.company.clone().unwrap())
            .collect();
        assert_eq!(companies, vec!["first", "second"]);
    }

    #[test]
    fn test_notes_match_with_final_sigma() {
        let mut c = contact("Nikos", Tier::B, None);
        c.notes = Some("ΟΔΟΣ".into());
        let contacts = vec![c];
        let q = ContactQuery { query: "ΟΔΟΣ".into(), ..Default::default() };
        let hits = apply(&contacts, &q, today());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].context, Some(MatchContext::Notes { text: "ΟΔΟΣ".into() }));
    }

    #[test]
    fn test_query_whitespace_is_significant() {
        let mut c = contact("Li Na", Tier::B, None);
        c.notes = Some("tea".into());
        let contacts = vec![c];
        assert!(run(&contacts, " tea", Filter::All, SortKey::Name).is_empty());
        assert_eq!(run(&contacts, "i n", Filter::All, SortKey::Name), vec!["Li Na"]);
        assert_eq!(run(&contacts, "   ", Filter::All, SortKey::Name), vec!["Li Na"]);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(Filter::parse("overdue"), Some(Filter::Overdue));
        assert_eq!(Filter::parse("s"), Some(Filter::Tier(Tier::S)));
        assert_eq!(Filter::parse("nope"), None);
        assert_eq!(SortKey::parse("Recent"), Some(SortKey::Recent));
    }
}
