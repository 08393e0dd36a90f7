//! Knowledge base and dialogue logic for the Israeli HMO benefits
//! assistant: parsing the category documents into a typed benefits matrix,
//! detecting what a user message asks for, assembling prompt context, and
//! driving the two-phase collection/Q&A dialogue.

pub mod assembler;
pub mod error;
pub mod intent;
pub mod parser;
pub mod phase;
pub mod profile;
pub mod store;
pub mod types;

pub use assembler::assemble_context;
pub use error::{KnowledgeError, Result};
pub use intent::detect_intent;
pub use parser::parse_service_document;
pub use phase::{TransitionTrigger, acknowledgement, detect_transition};
pub use profile::{extract_profile_fields, looks_like_assistant_echo};
pub use store::KnowledgeStore;
pub use types::{
    ChatMessage, Gender, Hmo, Language, Phase, QueryIntent, Role, ServiceCategory,
    ServiceDocument, ServiceEntry, Tier, TierBenefits, UserProfile,
};
