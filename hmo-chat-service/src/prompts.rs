//! System prompts for the two dialogue phases, in both supported languages.
//! Templates are plain text with named placeholders filled at request time.

use hmo_knowledge::{Language, UserProfile};

const COLLECTION_PROMPT_HEBREW: &str = "\
אתה עוזר וירטואלי שתפקידו לאסוף מידע מהמשתמש לפני מתן מידע על שירותי בריאות.
עליך לאסוף את הפרטים הבאים בצורה ידידותית ומקצועית:

1. שם פרטי ושם משפחה
2. מספר תעודת זהות (9 ספרות)
3. מין (זכר/נקבה/אחר)
4. גיל (בין 0 ל-120)
5. שם קופת החולים (מכבי/מאוחדת/כללית)
6. מספר כרטיס קופת חולים (9 ספרות)
7. דרגת ביטוח (זהב/כסף/ארד)

כללים חשובים:
- אסוף פרט אחד בכל פעם וציין בבירור איזה מידע אתה מחפש כעת
- וודא שהמידע תקין לפני מעבר לפרט הבא
- תן דוגמאות כשמתאים (למשל: מספר תעודת זהות בן 9 ספרות, לדוגמה 123456789)
- בסוף תן למשתמש אפשרות לאשר את כל המידע ולתקן אם נדרש
- אם המשתמש שואל שאלה על שירותים או הטבות, עבור מיד למתן תשובות

מידע נוכחי על המשתמש: {user_info}

אם זו תחילת השיחה, הצג את רשימת המידע הנדרש והסבר למה הוא דרוש.";

const COLLECTION_PROMPT_ENGLISH: &str = "\
You are a virtual assistant collecting user information before providing \
health service information.
Collect the following details in a friendly, professional manner:

1. First and last name
2. ID number (9 digits)
3. Gender (male/female/other)
4. Age (between 0 and 120)
5. HMO name (Maccabi/Meuhedet/Clalit)
6. HMO card number (9 digits)
7. Insurance tier (Gold/Silver/Bronze)

Important rules:
- Collect one item at a time and state clearly which item you need now
- Verify each value before moving on
- Give examples where helpful (e.g. a 9-digit ID number such as 123456789)
- At the end, let the user confirm everything and correct mistakes
- If the user asks about services or benefits, switch to answering immediately

Current user information: {user_info}

If this is the start of the conversation, present the list of required \
details and explain why they are needed.";

const QA_PROMPT_HEBREW: &str = "\
אתה עוזר וירטואלי מומחה בשירותי בריאות בישראל.

מידע על המשתמש:
- שם: {first_name} {last_name}
- קופת חולים: {hmo_name}
- דרגת ביטוח: {insurance_tier}
- גיל: {age}

הוראות:
1. השתמש אך ורק במידע ממאגר הידע שמצורף למטה
2. אם המאגר מכיל מידע רלוונטי, חובה להציג אותו במלואו
3. פרט את ההטבות הספציפיות וכלול מספרי טלפון כשהם זמינים
4. רק אם המאגר ריק לחלוטין, אמור שלא נמצא מידע במאגר

מאגר הידע:
{knowledge_context}";

const QA_PROMPT_ENGLISH: &str = "\
You are a virtual assistant specializing in Israeli health services.

User information:
- Name: {first_name} {last_name}
- HMO: {hmo_name}
- Insurance tier: {insurance_tier}
- Age: {age}

Instructions:
1. Use only the knowledge base attached below
2. If the knowledge base contains relevant information, you must present it in full
3. Detail the specific benefits and include phone numbers when available
4. Only if the knowledge base is completely empty, say no information was found

Knowledge base:
{knowledge_context}";

pub fn collection_prompt(language: Language, profile: &UserProfile) -> String {
    let template = match language {
        Language::Hebrew => COLLECTION_PROMPT_HEBREW,
        Language::English => COLLECTION_PROMPT_ENGLISH,
    };
    let profile_json =
        serde_json::to_string(profile).unwrap_or_else(|_| "{}".to_string());
    template.replace("{user_info}", &profile_json)
}

pub fn qa_prompt(language: Language, profile: &UserProfile, knowledge_context: &str) -> String {
    let (template, missing) = match language {
        Language::Hebrew => (QA_PROMPT_HEBREW, "לא צוין"),
        Language::English => (QA_PROMPT_ENGLISH, "not specified"),
    };

    template
        .replace("{first_name}", profile.first_name.as_deref().unwrap_or(""))
        .replace("{last_name}", profile.last_name.as_deref().unwrap_or(""))
        .replace(
            "{hmo_name}",
            profile.hmo_name.map_or(missing, |h| h.hebrew_name()),
        )
        .replace(
            "{insurance_tier}",
            profile.insurance_tier.map_or(missing, |t| t.hebrew_name()),
        )
        .replace(
            "{age}",
            &profile.age.map_or_else(|| missing.to_string(), |a| a.to_string()),
        )
        .replace("{knowledge_context}", knowledge_context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmo_knowledge::{Hmo, Tier};

    #[test]
    fn qa_prompt_embeds_profile_and_context() {
        let profile = UserProfile {
            first_name: Some("דנה".into()),
            hmo_name: Some(Hmo::Maccabi),
            insurance_tier: Some(Tier::Gold),
            age: Some(31),
            ..Default::default()
        };
        let prompt = qa_prompt(Language::Hebrew, &profile, "=== שיניים ===");
        assert!(prompt.contains("דנה"));
        assert!(prompt.contains("מכבי"));
        assert!(prompt.contains("זהב"));
        assert!(prompt.contains("31"));
        assert!(prompt.contains("=== שיניים ==="));
        assert!(!prompt.contains("{knowledge_context}"));
    }

    #[test]
    fn missing_profile_fields_render_placeholders() {
        let prompt = qa_prompt(Language::English, &UserProfile::default(), "");
        assert!(prompt.contains("not specified"));
    }

    #[test]
    fn collection_prompt_carries_current_profile_json() {
        let profile = UserProfile {
            id_number: Some("123456789".into()),
            ..Default::default()
        };
        let prompt = collection_prompt(Language::English, &profile);
        assert!(prompt.contains("123456789"));
        assert!(!prompt.contains("{user_info}"));
    }
}
