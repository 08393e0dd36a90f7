//! OCR text normalization applied before field extraction.
//!
//! The layout model emits table pipes, checkbox markers and reversed phone
//! digits that confuse the extraction model. Everything here is plain text
//! surgery on the raw OCR output.

use std::sync::LazyLock;

use regex::Regex;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d\s]*").expect("valid digit run pattern"));

const SECOND_PAGE_MARKER: &str = "עמוד 2 מתוך 2";

pub fn clean_document_text(text: &str) -> String {
    let mut cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '|' | '[' | ']'))
        .collect();

    // The signature box renders a stray X glyph.
    cleaned = cleaned.replace("חתימה X", "חתימה");
    cleaned = cleaned.replace("חתימהX", "חתימה");

    // Checkbox markers become Hebrew labels the extraction prompt keys on.
    cleaned = cleaned.replace(":selected:", "נבחר: ");
    cleaned = cleaned.replace(":unselected:", "לא נבחר: ");

    cleaned = fix_phone_numbers(&cleaned);

    // The second page carries only clinic-internal boilerplate.
    if let Some(index) = cleaned.find(SECOND_PAGE_MARKER) {
        cleaned.truncate(index);
        cleaned.truncate(cleaned.trim_end().len());
    }

    cleaned
}

/// Phone numbers on the form always start with 0, but the OCR pass often
/// misreads the leading digit and scatters spaces through the run. On lines
/// mentioning a phone, collapse each digit run and force its first digit
/// to 0.
fn fix_phone_numbers(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.contains("טלפון") {
                DIGIT_RUN
                    .replace_all(line, |caps: &regex::Captures| {
                        let mut digits: Vec<char> =
                            caps[0].chars().filter(|c| c.is_ascii_digit()).collect();
                        if let Some(first) = digits.first_mut() {
                            *first = '0';
                        }
                        digits.into_iter().collect::<String>()
                    })
                    .into_owned()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
