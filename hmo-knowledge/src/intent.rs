//! Query intent detector: pure, order-independent keyword scanning over the
//! lower-cased user message, with an optional fallback over recent
//! assistant turns when no category matches directly.
//!
//! All matchers are driven by one set of literal bilingual keyword tables,
//! so category, HMO, tier and comparison detection are evaluated uniformly.

use crate::types::{ChatMessage, Hmo, QueryIntent, Role, ServiceCategory, Tier};

/// How many trailing conversation turns the history fallback may inspect.
const HISTORY_WINDOW: usize = 4;

pub struct CategoryKeywords {
    pub category: ServiceCategory,
    pub keywords: &'static [&'static str],
}

pub const CATEGORY_KEYWORDS: &[CategoryKeywords] = &[
    CategoryKeywords {
        category: ServiceCategory::Dental,
        keywords: &[
            "שיניים", "שן", "סתימה", "כתר", "שתל", "טיפול שורש", "יישור",
            "dental", "teeth", "tooth", "filling", "crown", "implant", "root canal",
            "orthodontic", "braces", "dentist", "cavity", "extraction", "whitening", "gum",
        ],
    },
    CategoryKeywords {
        category: ServiceCategory::Optometry,
        keywords: &[
            "ראייה", "משקפיים", "עדשות", "עיניים", "עין", "לחץ תוך עיני", "לייזר",
            "optometry", "glasses", "contact lenses", "vision", "eye", "eyes", "laser",
            "eyeglasses", "eye exam", "ophthalmology", "glaucoma", "retina", "cataract",
        ],
    },
    CategoryKeywords {
        category: ServiceCategory::Pregnancy,
        keywords: &[
            "הריון", "לידה", "היריון", "בהיריון", "מיילדת", "הרה", "מעקב הריון",
            "סקר גנטי", "הכנה ללידה",
            "pregnancy", "birth", "pregnant", "maternity", "prenatal", "obstetric",
            "delivery", "labor", "midwife", "ultrasound", "genetic screening",
            "childbirth", "postpartum", "expecting",
        ],
    },
    CategoryKeywords {
        category: ServiceCategory::Alternative,
        keywords: &[
            "רפואה משלימה", "אלטרנטיב", "דיקור", "שיאצו", "רפלקסולוגיה",
            "נטורופתיה", "הומאופתיה", "כירופרקטיקה",
            "alternative", "complementary medicine", "acupuncture", "shiatsu",
            "reflexology", "naturopathy", "homeopathy", "chiropractic", "holistic",
        ],
    },
    CategoryKeywords {
        category: ServiceCategory::CommunicationClinic,
        keywords: &[
            "תקשורת", "קלינקה", "דיבור", "שפה",
            "communication", "speech", "language therapy", "speech therapy",
            "speech pathology", "stuttering", "voice therapy", "articulation",
        ],
    },
    CategoryKeywords {
        category: ServiceCategory::Workshops,
        keywords: &[
            "סדנאות", "קהילה", "בריאות הקהילה", "קורסים", "הרצאות",
            "workshops", "community health", "courses", "classes", "seminars",
            "health education", "wellness programs", "group sessions",
        ],
    },
];

/// Terms indicating a general benefits question with no specific category;
/// a hit marks every category as relevant.
pub const GENERAL_BENEFIT_KEYWORDS: &[&str] = &[
    "הטבות", "שירותים", "קופת חולים", "מסלול", "מגיע לי", "זכויות", "מה מגיע",
    "benefits", "services", "hmo", "tier", "coverage", "insurance", "plan",
    "entitled", "rights", "what do i get", "what am i entitled",
    "what are my benefits", "health insurance", "medical coverage",
];

pub const COMPARISON_PHRASES: &[&str] = &[
    "השווה", "השוואה", "לעומת", "נגד", "מול", "בהשוואה ל", "מה ההבדל",
    "איך שונה", "מה יותר טוב", "איזה עדיף", "במקום", "אם אעבור ל",
    "compare", "comparison", "versus", "vs", "against", "compared to",
    "what is the difference", "which is better", "instead of",
    "if i switch to", "if i move to", "rather than", "as opposed to",
];

pub const HYPOTHETICAL_PHRASES: &[&str] = &[
    "מה לגבי", "ואם", "אם הייתי", "לו הייתי", "אילו", "במקום",
    "what about", "what if", "if i was", "if i were", "suppose", "instead",
];

pub const HMO_KEYWORDS: &[(Hmo, &[&str])] = &[
    (Hmo::Maccabi, &["מכבי", "maccabi", "macabi"]),
    (Hmo::Meuhedet, &["מאוחדת", "meuhedet", "meuched"]),
    (Hmo::Clalit, &["כללית", "clalit", "klalit"]),
];

pub const TIER_KEYWORDS: &[(Tier, &[&str])] = &[
    (Tier::Gold, &["זהב", "gold"]),
    (Tier::Silver, &["כסף", "silver"]),
    (Tier::Bronze, &["ארד", "bronze"]),
];

/// Detect what a user message asks for.
///
/// `history` is the conversation so far, oldest first; only the trailing
/// window is consulted, and only when the message itself matches nothing.
pub fn detect_intent(message: &str, history: &[ChatMessage]) -> QueryIntent {
    let lower = message.to_lowercase();

    let mut matched_categories = match_categories(&lower);

    if matched_categories.is_empty() && contains_any(&lower, GENERAL_BENEFIT_KEYWORDS) {
        matched_categories = ServiceCategory::ALL.to_vec();
    }

    if matched_categories.is_empty() {
        if let Some(category) = infer_category_from_history(history) {
            matched_categories.push(category);
        }
    }

    let hmos: Vec<Hmo> = HMO_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(hmo, _)| *hmo)
        .collect();

    let tiers: Vec<Tier> = TIER_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(tier, _)| *tier)
        .collect();

    let is_comparative =
        contains_any(&lower, COMPARISON_PHRASES) || hmos.len() > 1 || tiers.len() > 1;
    let is_followup_hypothetical = contains_any(&lower, HYPOTHETICAL_PHRASES);

    QueryIntent {
        matched_categories,
        hmos,
        tiers,
        is_comparative,
        is_followup_hypothetical,
    }
}

fn match_categories(lower: &str) -> Vec<ServiceCategory> {
    CATEGORY_KEYWORDS
        .iter()
        .filter(|entry| contains_any(lower, entry.keywords))
        .map(|entry| entry.category)
        .collect()
}

/// Scan the most recent assistant turns, newest first, and adopt the first
/// category their text indicates. Lets a bare follow-up like "and with
/// gold?" inherit the topic of the previous answer.
fn infer_category_from_history(history: &[ChatMessage]) -> Option<ServiceCategory> {
    let window = history.len().saturating_sub(HISTORY_WINDOW);
    for message in history[window..].iter().rev() {
        if message.role != Role::Assistant {
            continue;
        }
        let lower = message.content.to_lowercase();
        if let Some(category) = match_categories(&lower).into_iter().next() {
            return Some(category);
        }
    }
    None
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_single_category_from_hebrew_keyword() {
        let intent = detect_intent("מה מגיע לי בטיפולי שיניים?", &[]);
        assert_eq!(intent.matched_categories, vec![ServiceCategory::Dental]);
        assert!(!intent.is_comparative);
    }

    #[test]
    fn general_benefits_question_matches_all_categories() {
        let intent = detect_intent("what are my benefits?", &[]);
        assert_eq!(intent.matched_categories.len(), ServiceCategory::ALL.len());
    }

    #[test]
    fn comparison_phrase_with_two_hmos_is_comparative() {
        let intent = detect_intent("compare maccabi versus clalit for dental", &[]);
        assert!(intent.is_comparative);
        assert_eq!(intent.hmos, vec![Hmo::Maccabi, Hmo::Clalit]);
    }

    #[test]
    fn two_tiers_alone_imply_comparison() {
        let intent = detect_intent("זהב או כסף בשיניים", &[]);
        assert!(intent.is_comparative);
        assert_eq!(intent.tiers, vec![Tier::Gold, Tier::Silver]);
    }

    #[test]
    fn hypothetical_phrase_is_flagged() {
        let intent = detect_intent("מה לגבי אם הייתי במכבי?", &[]);
        assert!(intent.is_followup_hypothetical);
        assert_eq!(intent.explicit_hmo(), Some(Hmo::Maccabi));
    }

    #[test]
    fn history_fallback_adopts_category_from_last_assistant_turn() {
        let history = vec![
            ChatMessage::user("מה מגיע לי בהריון?"),
            ChatMessage::assistant("הנה ההטבות למעקב הריון במסלול שלך."),
        ];
        let intent = detect_intent("ומה עם ארד?", &history);
        assert_eq!(intent.matched_categories, vec![ServiceCategory::Pregnancy]);
        assert_eq!(intent.explicit_tier(), Some(Tier::Bronze));
    }

    #[test]
    fn history_fallback_ignores_user_turns_and_old_context() {
        let mut history = vec![ChatMessage::user("שיניים")];
        // Push the dental mention out of the inspection window.
        for _ in 0..HISTORY_WINDOW {
            history.push(ChatMessage::assistant("בבקשה, עוד משהו?"));
        }
        let intent = detect_intent("ומה עכשיו?", &history);
        assert!(intent.matched_categories.is_empty());
    }

    #[test]
    fn detection_is_idempotent() {
        let message = "compare gold and silver at meuhedet for glasses";
        assert_eq!(detect_intent(message, &[]), detect_intent(message, &[]));
    }
}
