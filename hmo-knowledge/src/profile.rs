//! User-profile field extractor for the collection phase.
//!
//! Each inbound message gets one extraction attempt per still-empty field;
//! fields already set are never overwritten. A named pre-filter rejects
//! messages that look like echoed assistant text before any extraction
//! runs, and invalid values (bad ID length, out-of-range age) are simply
//! never assigned, which forces the assistant to re-prompt.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::intent::{HMO_KEYWORDS, TIER_KEYWORDS};
use crate::types::{Gender, UserProfile};

/// Phrases typical of the assistant's own collection prompts. A short
/// message containing one of these is treated as echoed assistant text.
pub const ASSISTANT_MARKER_PHRASES: &[&str] = &[
    "בואו נתחיל", "נתחיל באיסוף", "איסוף המידע", "נא להזין", "בבקשה הזן",
    "מה השם", "איך קורא לך", "תודה", "מצוין", "עכשיו נעבור", "נדרש מידע",
    "let's start", "we'll start", "start collecting", "collecting information",
    "please enter", "please provide", "what is your name", "what's your name",
    "thank you", "excellent", "now we'll move", "next we need", "i need to collect",
    "information required", "let me collect", "great", "perfect", "moving on",
];

/// Word count above which a message is assumed to be assistant text.
const MAX_USER_REPLY_WORDS: usize = 8;

/// Word count above which marker phrases disqualify a message.
const MARKER_CHECK_MIN_WORDS: usize = 3;

static AGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)גיל[:\s]*(\d{1,3})",
        r"(?i)בן[:\s]*(\d{1,3})",
        r"(?i)בת[:\s]*(\d{1,3})",
        r"(?i)age[:\s]*(\d{1,3})",
        r"(?i)i am[:\s]*(\d{1,3})",
        r"(?i)i'm[:\s]*(\d{1,3})",
        r"(?i)(\d{1,3})[:\s]*(?:years|yrs) old",
        r"^(\d{1,3})$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid age pattern"))
    .collect()
});

static NINE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{9}\b").expect("valid digit pattern"));

const GENDER_KEYWORDS: &[(Gender, &[&str])] = &[
    (Gender::Female, &["נקבה", "אישה", "בת", "female", "woman", "girl"]),
    (Gender::Male, &["זכר", "גבר", "בן", "male", "man", "boy"]),
    (Gender::Other, &["אחר", "other", "non-binary"]),
];

/// Pre-filter: does this message look like assistant phrasing rather than
/// a user reply? Kept as its own stage so the heuristic can be tested and
/// tuned apart from the extraction logic.
pub fn looks_like_assistant_echo(message: &str) -> bool {
    let words = message.split_whitespace().count();
    if words > MAX_USER_REPLY_WORDS {
        return true;
    }
    if words > MARKER_CHECK_MIN_WORDS {
        let lower = message.to_lowercase();
        return ASSISTANT_MARKER_PHRASES.iter().any(|p| lower.contains(p));
    }
    false
}

/// Attempt to fill still-empty profile fields from one inbound message.
pub fn extract_profile_fields(message: &str, current: &UserProfile) -> UserProfile {
    if looks_like_assistant_echo(message) {
        debug!("skipping extraction, message looks like assistant text");
        return current.clone();
    }

    let mut profile = current.clone();
    let lower = message.to_lowercase();

    if profile.gender.is_none() {
        profile.gender = extract_gender(&lower);
    }

    if profile.age.is_none() {
        profile.age = extract_age(message.trim());
    }

    if profile.hmo_name.is_none() {
        profile.hmo_name = HMO_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(hmo, _)| *hmo);
    }

    if profile.insurance_tier.is_none() {
        profile.insurance_tier = TIER_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(tier, _)| *tier);
    }

    extract_names(message, &mut profile);
    extract_numbers(message, current, &mut profile);

    profile
}

/// Gender is matched on whole tokens; several keywords are substrings of
/// one another ("male"/"female", "בן"/"בת" inside larger words).
fn extract_gender(lower: &str) -> Option<Gender> {
    let tokens: Vec<&str> = lower
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .collect();

    for (gender, keywords) in GENDER_KEYWORDS {
        if keywords.iter().any(|k| tokens.contains(k)) {
            return Some(*gender);
        }
    }
    None
}

/// Ordered pattern list; the first match whose value is in range wins.
fn extract_age(message: &str) -> Option<u8> {
    for pattern in AGE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(message) {
            if let Ok(age) = caps[1].parse::<u8>() {
                if UserProfile::is_valid_age(age) {
                    return Some(age);
                }
            }
        }
    }
    None
}

fn is_valid_name_part(part: &str) -> bool {
    let len = part.chars().count();
    (2..=20).contains(&len)
        && !part.chars().any(|c| c.is_ascii_digit())
        && !ASSISTANT_MARKER_PHRASES
            .iter()
            .any(|p| part.to_lowercase().contains(p))
}

fn extract_names(message: &str, profile: &mut UserProfile) {
    let trimmed = message.trim();

    if profile.first_name.is_none() && profile.last_name.is_none() {
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() >= 2 && parts.iter().all(|p| is_valid_name_part(p)) {
            profile.first_name = Some(parts[0].to_string());
            profile.last_name = Some(parts[1..].join(" "));
            debug!("extracted full name");
        } else if parts.len() == 1 && is_valid_name_part(parts[0]) {
            profile.first_name = Some(parts[0].to_string());
            debug!("extracted first name");
        }
    } else if profile.first_name.is_some() && profile.last_name.is_none() {
        if is_valid_name_part(trimmed) {
            profile.last_name = Some(trimmed.to_string());
            debug!("extracted last name");
        }
    }
}

/// ID and card numbers: a nine-digit token counts only when it is the whole
/// trimmed message or the message has at most two words, so digits embedded
/// in unrelated text are never grabbed. The card number is attempted only
/// once an ID is already known (from a previous message) and must differ
/// from it.
fn extract_numbers(message: &str, before: &UserProfile, profile: &mut UserProfile) {
    let trimmed = message.trim();
    let Some(token) = NINE_DIGITS.find(trimmed).map(|m| m.as_str()) else {
        return;
    };

    let isolated = trimmed == token || trimmed.split_whitespace().count() <= 2;
    if !isolated || !UserProfile::is_valid_card_number(token) {
        return;
    }

    if profile.id_number.is_none() {
        profile.id_number = Some(token.to_string());
        debug!("extracted id number");
    } else if profile.hmo_card_number.is_none() {
        if let Some(known_id) = &before.id_number {
            if token != known_id {
                profile.hmo_card_number = Some(token.to_string());
                debug!("extracted hmo card number");
            }
        }
    }
}
