//! Context assembler: formats the slice of the knowledge store a query
//! needs into the text block injected into the LLM prompt.
//!
//! Axis selection (HMO, tier) follows a fixed priority ladder; category
//! selection deliberately over-includes when the query broadens the scope,
//! favoring recall over precision.

use tracing::debug;

use crate::store::KnowledgeStore;
use crate::types::{Hmo, QueryIntent, ServiceCategory, Tier, UserProfile};

/// Assemble the prompt context for one query.
pub fn assemble_context(
    intent: &QueryIntent,
    profile: &UserProfile,
    store: &KnowledgeStore,
) -> String {
    let hmos = select_hmos(intent, profile);
    let tiers = select_tiers(intent, profile);

    let categories: Vec<ServiceCategory> = if intent.broadens_selection() {
        store.categories().collect()
    } else {
        intent
            .matched_categories
            .iter()
            .copied()
            .filter(|c| store.get(*c).is_some())
            .collect()
    };

    debug!(
        categories = categories.len(),
        hmos = hmos.len(),
        tiers = tiers.len(),
        broadened = intent.broadens_selection(),
        "assembling knowledge context"
    );

    let mut out = String::new();
    for category in categories {
        let Some(doc) = store.get(category) else {
            continue;
        };

        out.push_str(&format!("\n\n=== {} ===\n", doc.title));
        out.push_str(&format!("תיאור: {}\n", doc.description));

        for entry in &doc.services {
            out.push_str(&format!("\n** {} **\n", entry.name));
            for hmo in &hmos {
                let Some(benefits) = entry.benefits.get(hmo) else {
                    continue;
                };
                out.push_str(&format!("{}:\n", hmo.hebrew_name()));
                for tier in &tiers {
                    // Tiers absent from the source data are omitted entirely.
                    if let Some(text) = benefits.get(tier) {
                        out.push_str(&format!("  • {}: {}\n", tier.hebrew_name(), text));
                    }
                }
            }
        }

        if !doc.contact_info.is_empty() {
            out.push_str("\n** מידע ליצירת קשר **\n");
            for hmo in &hmos {
                if let Some(contact) = doc.contact_info.get(hmo) {
                    out.push_str(&format!("• {}: {}\n", hmo.hebrew_name(), contact));
                }
            }
        }
    }

    out.trim().to_string()
}

/// Pick the HMOs to render, in priority order:
/// explicit value on a hypothetical follow-up, explicit value, all on
/// comparison or multi-match, the user's own, else all.
fn select_hmos(intent: &QueryIntent, profile: &UserProfile) -> Vec<Hmo> {
    if intent.is_followup_hypothetical {
        if let Some(hmo) = intent.explicit_hmo() {
            return vec![hmo];
        }
    }
    if let Some(hmo) = intent.explicit_hmo() {
        return vec![hmo];
    }
    if intent.is_comparative || intent.hmos.len() > 1 {
        return Hmo::ALL.to_vec();
    }
    if let Some(hmo) = profile.hmo_name {
        return vec![hmo];
    }
    Hmo::ALL.to_vec()
}

/// Same ladder as [`select_hmos`], applied independently to the tier axis.
fn select_tiers(intent: &QueryIntent, profile: &UserProfile) -> Vec<Tier> {
    if intent.is_followup_hypothetical {
        if let Some(tier) = intent.explicit_tier() {
            return vec![tier];
        }
    }
    if let Some(tier) = intent.explicit_tier() {
        return vec![tier];
    }
    if intent.is_comparative || intent.tiers.len() > 1 {
        return Tier::ALL.to_vec();
    }
    if let Some(tier) = profile.insurance_tier {
        return vec![tier];
    }
    Tier::ALL.to_vec()
}
