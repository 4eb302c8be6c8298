use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Call,
    Meeting,
    #[default]
    Chat,
    Visit,
    Gift,
    Other,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Meeting => "meeting",
            Self::Chat => "chat",
            Self::Visit => "visit",
            Self::Gift => "gift",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "call" | "phone" => Self::Call,
            "meeting" | "meet" => Self::Meeting,
            "chat" | "wechat" | "text" => Self::Chat,
            "visit" => Self::Visit,
            "gift" => Self::Gift,
            _ => Self::Other,
        }
    }
}

/// One logged interaction with a contact. Records are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub kind: InteractionKind,
    pub content: String,
    pub date: NaiveDate,
    /// Commitments made during the interaction
    pub promises: Option<String>,
    pub key_facts: Option<String>,
    /// Suggested next follow-up
    pub next_step: Option<String>,
}

impl InteractionRecord {
    pub fn new(contact_id: Uuid, kind: InteractionKind, content: String, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact_id,
            kind,
            content,
            date,
            promises: None,
            key_facts: None,
            next_step: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(InteractionKind::parse("Call"), InteractionKind::Call);
        assert_eq!(InteractionKind::parse("wechat"), InteractionKind::Chat);
        assert_eq!(InteractionKind::parse("dinner"), InteractionKind::Other);
    }
}
