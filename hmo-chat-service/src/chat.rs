//! Per-turn orchestration: profile extraction, phase transition and prompt
//! construction. Everything up to the LLM call is deterministic and lives
//! here so it can be tested without a network.

use hmo_knowledge::{
    KnowledgeStore, Phase, TransitionTrigger, acknowledgement, assemble_context, detect_intent,
    detect_transition, extract_profile_fields,
};
use tracing::info;

use crate::models::{ChatRequest, ChatResponse};
use crate::prompts;

/// What this turn requires after the deterministic stages ran.
#[derive(Debug)]
pub enum TurnPlan {
    /// Confirmation transition: reply immediately, no LLM call and no
    /// knowledge lookup this turn.
    StaticAck(ChatResponse),
    /// Forward to the LLM with the prepared system prompt.
    Llm {
        system_prompt: String,
        phase: Phase,
        profile: hmo_knowledge::UserProfile,
    },
}

pub fn plan_turn(request: &ChatRequest, store: &KnowledgeStore) -> TurnPlan {
    let mut profile = request.user_info.clone();
    let mut phase = request.phase;

    if phase == Phase::Collection {
        profile = extract_profile_fields(&request.message, &profile);

        match detect_transition(&request.message) {
            Some(TransitionTrigger::Confirmation) => {
                info!("collection confirmed, transitioning to qa");
                return TurnPlan::StaticAck(ChatResponse {
                    response: acknowledgement(request.language).to_string(),
                    updated_user_info: profile,
                    phase: Phase::Qa,
                    is_complete: true,
                });
            }
            Some(TransitionTrigger::Question) => {
                info!("question during collection, answering in qa phase");
                phase = Phase::Qa;
            }
            None => {}
        }
    }

    let system_prompt = match phase {
        Phase::Collection => prompts::collection_prompt(request.language, &profile),
        Phase::Qa => {
            let intent = detect_intent(&request.message, &request.conversation_history);
            let mut context = assemble_context(&intent, &profile, store);

            // An HMO was named but nothing matched in the store; leave a
            // note instead of an empty block so the model does not claim
            // the knowledge base is missing.
            if context.is_empty() {
                if let Some(hmo) = intent.explicit_hmo() {
                    context = format!(
                        "המשתמש שואל על {} - לא נמצא מידע תואם במאגר.",
                        hmo.hebrew_name()
                    );
                }
            }

            info!(context_chars = context.len(), "assembled qa context");
            prompts::qa_prompt(request.language, &profile, &context)
        }
    };

    TurnPlan::Llm {
        system_prompt,
        phase,
        profile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmo_knowledge::{
        ChatMessage, Hmo, Language, ServiceCategory, Tier, UserProfile, parse_service_document,
    };

    const DENTAL_HTML: &str = r#"<html><body>
<h2>מרפאות שיניים</h2>
<p>טיפולי שיניים.</p>
<table>
<tr><th>שם השירות</th><th>מכבי</th><th>מאוחדת</th><th>כללית</th></tr>
<tr><td>סתימות</td>
<td>זהב: 90% הנחה</td><td>זהב: 85% הנחה</td><td>זהב: 80% הנחה</td></tr>
</table>
</body></html>"#;

    fn store() -> KnowledgeStore {
        KnowledgeStore::from_documents([(
            ServiceCategory::Dental,
            parse_service_document(DENTAL_HTML, ServiceCategory::Dental),
        )])
    }

    fn request(message: &str, phase: Phase) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            user_info: UserProfile {
                hmo_name: Some(Hmo::Maccabi),
                insurance_tier: Some(Tier::Gold),
                ..Default::default()
            },
            conversation_history: Vec::new(),
            phase,
            language: Language::Hebrew,
        }
    }

    #[test]
    fn confirmation_returns_static_ack_without_assembly() {
        let plan = plan_turn(&request("כן", Phase::Collection), &store());
        match plan {
            TurnPlan::StaticAck(response) => {
                assert_eq!(response.phase, Phase::Qa);
                assert!(response.is_complete);
                assert!(response.response.contains("מצוין"));
            }
            other => panic!("expected static ack, got {other:?}"),
        }
    }

    #[test]
    fn question_during_collection_goes_straight_to_qa_prompt() {
        let plan = plan_turn(&request("מה מגיע לי בשיניים?", Phase::Collection), &store());
        match plan {
            TurnPlan::Llm {
                system_prompt,
                phase,
                ..
            } => {
                assert_eq!(phase, Phase::Qa);
                assert!(system_prompt.contains("מרפאות שיניים"));
                assert!(system_prompt.contains("90% הנחה"));
            }
            other => panic!("expected llm plan, got {other:?}"),
        }
    }

    #[test]
    fn plain_collection_message_stays_in_collection() {
        let plan = plan_turn(&request("דנה לוי", Phase::Collection), &store());
        match plan {
            TurnPlan::Llm { phase, profile, .. } => {
                assert_eq!(phase, Phase::Collection);
                assert_eq!(profile.first_name.as_deref(), Some("דנה"));
                assert_eq!(profile.last_name.as_deref(), Some("לוי"));
            }
            other => panic!("expected llm plan, got {other:?}"),
        }
    }

    #[test]
    fn qa_turn_uses_history_for_intent_fallback() {
        let mut req = request("ומה לגבי מסלול ארד?", Phase::Qa);
        req.conversation_history =
            vec![ChatMessage::assistant("אלו ההטבות לטיפולי שיניים במכבי")];
        let plan = plan_turn(&req, &store());
        match plan {
            TurnPlan::Llm { system_prompt, .. } => {
                assert!(system_prompt.contains("מרפאות שיניים"));
            }
            other => panic!("expected llm plan, got {other:?}"),
        }
    }

    #[test]
    fn qa_phase_request_never_mutates_profile() {
        let req = request("מכבי זהב 123456789", Phase::Qa);
        let plan = plan_turn(&req, &store());
        match plan {
            TurnPlan::Llm { profile, .. } => {
                assert_eq!(profile.id_number, None);
            }
            other => panic!("expected llm plan, got {other:?}"),
        }
    }
}
