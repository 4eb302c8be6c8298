use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Mainland mobile number: 11 digits starting with 13-19.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Frequency applied to contacts whose data carries none.
pub const DEFAULT_FREQUENCY_DAYS: u32 = 30;

/// Contact importance rank. Declaration order is rank order, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Tier {
    S,
    A,
    #[default]
    B,
    C,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::S, Tier::A, Tier::B, Tier::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    /// Parse a tier letter. `D` is a legacy rank folded into C.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "S" => Some(Self::S),
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" | "D" => Some(Self::C),
            _ => None,
        }
    }

    /// 0 for the best tier.
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// S and A contacts get the VIP focus treatment.
    pub fn is_vip(&self) -> bool {
        matches!(self, Self::S | Self::A)
    }

    /// Suggested interaction frequency for a newly created contact.
    pub fn default_frequency(&self) -> u32 {
        match self {
            Self::S => 7,
            Self::A => 14,
            Self::B => 30,
            Self::C => 60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::S => "S: core",
            Self::A => "A: important",
            Self::B => "B: regular",
            Self::C => "C: occasional",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub wechat: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub tier: Tier,
    /// Target days between interactions; always positive.
    pub frequency_days: u32,
    /// Calendar day of the most recent interaction, `None` if never contacted.
    pub last_interaction: Option<NaiveDate>,
    pub preferences: Option<String>,
    pub taboos: Option<String>,
    pub hobbies: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Add a tag unless an identical one is already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Advance the last-interaction date. Older dates never move it back.
    pub fn touch(&mut self, date: NaiveDate) {
        if self.last_interaction.map_or(true, |last| date > last) {
            self.last_interaction = Some(date);
        }
    }
}

/// Input collected by the contact form before it becomes a [`Contact`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub wechat: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub tier: Tier,
    /// Falls back to the tier's default when absent.
    pub frequency_days: Option<i64>,
    pub preferences: Option<String>,
    pub taboos: Option<String>,
    pub hobbies: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub favorite: bool,
}

impl NewContact {
    pub fn new(name: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            ..Self::default()
        }
    }

    /// Field-level checks, first failure wins.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::MissingField("name"));
        }
        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(Error::MissingField("phone"));
        }
        if !PHONE_RE.is_match(phone) {
            return Err(Error::InvalidPhone(phone.to_string()));
        }
        if let Some(email) = non_blank(&self.email) {
            if !EMAIL_RE.is_match(email) {
                return Err(Error::InvalidEmail(email.to_string()));
            }
        }
        if let Some(days) = self.frequency_days {
            checked_frequency(days)?;
        }
        Ok(())
    }

    /// Validate and build the contact, stamping `created_at` with `now`.
    pub fn build(self, now: DateTime<Utc>) -> Result<Contact> {
        self.validate()?;
        let frequency_days = match self.frequency_days {
            Some(days) => checked_frequency(days)?,
            None => self.tier.default_frequency(),
        };

        let mut contact = Contact {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            wechat: non_blank(&self.wechat).map(str::to_string),
            email: non_blank(&self.email).map(str::to_string),
            company: non_blank(&self.company).map(str::to_string),
            title: non_blank(&self.title).map(str::to_string),
            tier: self.tier,
            frequency_days,
            last_interaction: None,
            preferences: self.preferences,
            taboos: self.taboos,
            hobbies: self.hobbies,
            notes: self.notes,
            tags: Vec::new(),
            favorite: self.favorite,
            created_at: now,
        };
        for tag in &self.tags {
            contact.add_tag(tag);
        }
        Ok(contact)
    }
}

pub(crate) fn checked_frequency(days: i64) -> Result<u32> {
    if days <= 0 {
        return Err(Error::InvalidFrequency(days));
    }
    u32::try_from(days).map_err(|_| Error::InvalidFrequency(days))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
