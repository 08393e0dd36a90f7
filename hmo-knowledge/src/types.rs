use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the three Israeli health funds the knowledge base covers.
///
/// Serialized as lowercase English names; the Hebrew spellings used by the
/// source documents and by Hebrew-speaking users are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Hmo {
    #[serde(rename = "maccabi", alias = "מכבי")]
    Maccabi,
    #[serde(rename = "meuhedet", alias = "מאוחדת")]
    Meuhedet,
    #[serde(rename = "clalit", alias = "כללית")]
    Clalit,
}

impl Hmo {
    pub const ALL: [Hmo; 3] = [Hmo::Maccabi, Hmo::Meuhedet, Hmo::Clalit];

    pub fn hebrew_name(self) -> &'static str {
        match self {
            Hmo::Maccabi => "מכבי",
            Hmo::Meuhedet => "מאוחדת",
            Hmo::Clalit => "כללית",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Hmo::Maccabi => "Maccabi",
            Hmo::Meuhedet => "Meuhedet",
            Hmo::Clalit => "Clalit",
        }
    }
}

/// Coverage tier inside an HMO plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "gold", alias = "זהב")]
    Gold,
    #[serde(rename = "silver", alias = "כסף")]
    Silver,
    #[serde(rename = "bronze", alias = "ארד")]
    Bronze,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Gold, Tier::Silver, Tier::Bronze];

    pub fn hebrew_name(self) -> &'static str {
        match self {
            Tier::Gold => "זהב",
            Tier::Silver => "כסף",
            Tier::Bronze => "ארד",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Tier::Gold => "Gold",
            Tier::Silver => "Silver",
            Tier::Bronze => "Bronze",
        }
    }
}

/// The six fixed benefit domains covered by the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Dental,
    Optometry,
    Pregnancy,
    Alternative,
    CommunicationClinic,
    Workshops,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 6] = [
        ServiceCategory::Dental,
        ServiceCategory::Optometry,
        ServiceCategory::Pregnancy,
        ServiceCategory::Alternative,
        ServiceCategory::CommunicationClinic,
        ServiceCategory::Workshops,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ServiceCategory::Dental => "dental",
            ServiceCategory::Optometry => "optometry",
            ServiceCategory::Pregnancy => "pregnancy",
            ServiceCategory::Alternative => "alternative",
            ServiceCategory::CommunicationClinic => "communication_clinic",
            ServiceCategory::Workshops => "workshops",
        }
    }

    /// File name of the source document for this category.
    pub fn file_name(self) -> String {
        format!("{}_services.html", self.key())
    }
}

/// Benefit text per tier for a single service under a single HMO.
///
/// An absent tier means the source document says nothing about it; an empty
/// string means the cell exists but carries no benefit text.
pub type TierBenefits = BTreeMap<Tier, String>;

/// One row of the benefits table: a named service and its benefits for each
/// of the three HMOs. The parser always fills all three HMO entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub name: String,
    pub benefits: BTreeMap<Hmo, TierBenefits>,
}

/// Structured form of one category document. Immutable after parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDocument {
    pub title: String,
    pub description: String,
    /// Rows in document order.
    pub services: Vec<ServiceEntry>,
    pub contact_info: BTreeMap<Hmo, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "male", alias = "זכר")]
    Male,
    #[serde(rename = "female", alias = "נקבה")]
    Female,
    #[serde(rename = "other", alias = "אחר")]
    Other,
}

impl Gender {
    pub fn hebrew_name(self) -> &'static str {
        match self {
            Gender::Male => "זכר",
            Gender::Female => "נקבה",
            Gender::Other => "אחר",
        }
    }
}

/// User identity and insurance attributes collected during the first
/// conversation phase. Every field starts absent and is first-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub id_number: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<u8>,
    pub hmo_name: Option<Hmo>,
    pub hmo_card_number: Option<String>,
    pub insurance_tier: Option<Tier>,
}

impl UserProfile {
    /// A well-formed ID or HMO card number is exactly nine ASCII digits.
    pub fn is_valid_card_number(candidate: &str) -> bool {
        candidate.len() == 9 && candidate.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn is_valid_age(age: u8) -> bool {
        age <= 120
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One turn of the conversation as carried on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: None,
        }
    }
}

/// Conversation phase of the two-state dialogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Collection,
    Qa,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Hebrew,
    English,
}

/// What a single user message asks for, derived by keyword scanning.
/// Ephemeral: computed per request, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryIntent {
    pub matched_categories: Vec<ServiceCategory>,
    pub hmos: Vec<Hmo>,
    pub tiers: Vec<Tier>,
    pub is_comparative: bool,
    pub is_followup_hypothetical: bool,
}

impl QueryIntent {
    /// The explicitly requested HMO, when exactly one was named.
    pub fn explicit_hmo(&self) -> Option<Hmo> {
        match self.hmos.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// The explicitly requested tier, when exactly one was named.
    pub fn explicit_tier(&self) -> Option<Tier> {
        match self.tiers.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// Whether the query widens context selection to the whole knowledge
    /// store: any comparison, hypothetical, or explicit HMO/tier mention
    /// trades precision for recall.
    pub fn broadens_selection(&self) -> bool {
        self.is_comparative
            || self.is_followup_hypothetical
            || !self.hmos.is_empty()
            || !self.tiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmo_accepts_hebrew_and_english_spellings() {
        let from_hebrew: Hmo = serde_json::from_str("\"מכבי\"").unwrap();
        let from_english: Hmo = serde_json::from_str("\"maccabi\"").unwrap();
        assert_eq!(from_hebrew, Hmo::Maccabi);
        assert_eq!(from_english, Hmo::Maccabi);
        assert_eq!(serde_json::to_string(&Hmo::Maccabi).unwrap(), "\"maccabi\"");
    }

    #[test]
    fn card_number_validation() {
        assert!(UserProfile::is_valid_card_number("123456789"));
        assert!(!UserProfile::is_valid_card_number("12345678"));
        assert!(!UserProfile::is_valid_card_number("1234567890"));
        assert!(!UserProfile::is_valid_card_number("12345678a"));
    }

    #[test]
    fn phase_defaults_to_collection() {
        assert_eq!(Phase::default(), Phase::Collection);
    }

    #[test]
    fn explicit_hmo_requires_exactly_one_match() {
        let mut intent = QueryIntent::default();
        assert_eq!(intent.explicit_hmo(), None);
        intent.hmos = vec![Hmo::Clalit];
        assert_eq!(intent.explicit_hmo(), Some(Hmo::Clalit));
        intent.hmos = vec![Hmo::Clalit, Hmo::Maccabi];
        assert_eq!(intent.explicit_hmo(), None);
    }
}
