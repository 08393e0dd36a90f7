//! Dialogue phase controller: decides when the conversation leaves the
//! collection phase for Q&A.
//!
//! Two steady states, `collection` and `qa`, with a single one-way
//! transition. A confirmation transitions with a canned acknowledgement; a
//! question transitions and is answered in the same turn. Returning to
//! collection happens only through an external reset that discards the
//! whole conversation.

use crate::types::Language;

/// What caused the collection → qa transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionTrigger {
    /// The user confirmed their details; reply with the static
    /// acknowledgement, no knowledge lookup this turn.
    Confirmation,
    /// The user asked a benefits question; answer it immediately.
    Question,
}

pub const CONFIRMATION_WORDS: &[&str] = &[
    "כן", "נכון", "אישור", "מאשר", "מאשרת", "אוקיי", "בסדר",
    "yes", "correct", "confirm", "right", "okay", "ok", "sure",
];

pub const QUESTION_INDICATORS: &[&str] = &[
    "מה מגיע", "איך", "מתי", "איפה", "כמה", "אילו", "שירותים", "הטבות", "הריון",
    "what do i get", "what am i entitled", "how", "when", "where", "how much",
    "which", "services", "benefits", "pregnancy", "what about", "can i get",
];

/// Decide whether this collection-phase message triggers the transition.
/// A message matching both lists counts as a question, so it gets answered
/// rather than acknowledged.
pub fn detect_transition(message: &str) -> Option<TransitionTrigger> {
    let lower = message.to_lowercase();

    if QUESTION_INDICATORS.iter().any(|p| lower.contains(p)) {
        return Some(TransitionTrigger::Question);
    }
    if CONFIRMATION_WORDS.iter().any(|w| lower.contains(w)) {
        return Some(TransitionTrigger::Confirmation);
    }
    None
}

/// Static reply sent when the user confirms their details.
pub fn acknowledgement(language: Language) -> &'static str {
    match language {
        Language::Hebrew => {
            "מצוין! עכשיו אני יכול לעזור לך עם שאלות על שירותי הבריאות שלך \
             בהתבסס על מאגר המידע המפורט. איך אוכל לעזור?"
        }
        Language::English => {
            "Great! Now I can help you with questions about your health services \
             based on our detailed knowledge base. How can I assist you?"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_confirmation_triggers_acknowledgement_path() {
        assert_eq!(detect_transition("yes"), Some(TransitionTrigger::Confirmation));
        assert_eq!(detect_transition("כן"), Some(TransitionTrigger::Confirmation));
    }

    #[test]
    fn benefits_question_triggers_answer_path() {
        assert_eq!(
            detect_transition("מה מגיע לי בהריון?"),
            Some(TransitionTrigger::Question)
        );
        assert_eq!(
            detect_transition("what benefits do I have?"),
            Some(TransitionTrigger::Question)
        );
    }

    #[test]
    fn question_wins_over_embedded_confirmation() {
        assert_eq!(
            detect_transition("yes, what benefits do I get?"),
            Some(TransitionTrigger::Question)
        );
    }

    #[test]
    fn ordinary_data_message_does_not_transition() {
        assert_eq!(detect_transition("123456789"), None);
        assert_eq!(detect_transition("דנה לוי"), None);
    }

    #[test]
    fn acknowledgement_is_localized() {
        assert!(acknowledgement(Language::Hebrew).contains("מצוין"));
        assert!(acknowledgement(Language::English).starts_with("Great!"));
    }
}
