//! Benefits extractor: turns one semi-structured category document into a
//! [`ServiceDocument`].
//!
//! Parsing never fails. Every expected piece of structure (heading, first
//! paragraph, table, contact list) degrades independently to an empty field
//! when absent, so a malformed document yields a partially filled record
//! rather than an error.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::types::{Hmo, ServiceCategory, ServiceDocument, ServiceEntry, Tier, TierBenefits};

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("valid selector"));
static PARAGRAPH_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid selector"));
static TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid selector"));
static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static CELL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static HEADING3_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3").expect("valid selector"));
static LIST_ITEM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("valid selector"));

/// Marker phrases identifying the customer-service contact heading.
const CONTACT_HEADING_MARKERS: [&str; 2] = ["טלפון", "לפרטים"];

/// Parse the raw markup of one category document.
pub fn parse_service_document(html: &str, category: ServiceCategory) -> ServiceDocument {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SEL)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| category.key().to_string());

    let description = document
        .select(&PARAGRAPH_SEL)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let services = document
        .select(&TABLE_SEL)
        .next()
        .map(extract_table)
        .unwrap_or_default();

    let contact_info = extract_contact_info(&document);

    debug!(
        category = category.key(),
        services = services.len(),
        contacts = contact_info.len(),
        "parsed service document"
    );

    ServiceDocument {
        title,
        description,
        services,
        contact_info,
    }
}

/// Extract the benefits matrix from the first table. The header row is
/// skipped; each row with at least four cells becomes one service entry,
/// cells 1..=3 mapping positionally to Maccabi, Meuhedet and Clalit.
fn extract_table(table: ElementRef) -> Vec<ServiceEntry> {
    let mut entries = Vec::new();

    for row in table.select(&ROW_SEL).skip(1) {
        let cells: Vec<ElementRef> = row.select(&CELL_SEL).collect();
        if cells.len() < 4 {
            continue;
        }

        let name = element_text(cells[0]);
        let mut benefits = BTreeMap::new();
        for (hmo, cell) in Hmo::ALL.iter().zip(&cells[1..4]) {
            benefits.insert(*hmo, parse_benefits_cell(&cell_lines(*cell)));
        }

        entries.push(ServiceEntry { name, benefits });
    }

    entries
}

/// Parse the tier-labeled text blocks of one table cell.
///
/// Forward-only single pass: a line starting with `<tier>:` opens that tier
/// and seeds it with the rest of the line; later unlabeled lines are
/// space-joined onto the open tier; lines before the first label are
/// dropped. A cell with no tier label at all maps every tier to the empty
/// string, which is distinct from a cell naming only some tiers.
fn parse_benefits_cell(lines: &[String]) -> TierBenefits {
    let mut benefits = TierBenefits::new();
    let mut current: Option<Tier> = None;

    for line in lines {
        if let Some((tier, rest)) = split_tier_label(line) {
            benefits.insert(tier, rest.to_string());
            current = Some(tier);
        } else if let Some(tier) = current {
            let text = benefits.entry(tier).or_default();
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(line);
        }
    }

    if benefits.is_empty() {
        for tier in Tier::ALL {
            benefits.insert(tier, String::new());
        }
    }

    benefits
}

fn split_tier_label(line: &str) -> Option<(Tier, &str)> {
    for tier in Tier::ALL {
        if let Some(rest) = line.strip_prefix(tier.hebrew_name()) {
            if let Some(rest) = rest.strip_prefix(':') {
                return Some((tier, rest.trim()));
            }
        }
    }
    None
}

/// Find the heading carrying a contact marker phrase and split the items of
/// the list that follows it on an `<HMO>:` prefix.
fn extract_contact_info(document: &Html) -> BTreeMap<Hmo, String> {
    let mut contact_info = BTreeMap::new();

    for heading in document.select(&HEADING3_SEL) {
        let text = element_text(heading);
        if !CONTACT_HEADING_MARKERS.iter().any(|m| text.contains(m)) {
            continue;
        }

        let Some(list) = following_list(heading) else {
            continue;
        };

        for item in list.select(&LIST_ITEM_SEL) {
            let item_text = element_text(item);
            for hmo in Hmo::ALL {
                let label = format!("{}:", hmo.hebrew_name());
                if let Some(idx) = item_text.find(&label) {
                    let value = item_text[idx + label.len()..].trim().to_string();
                    contact_info.entry(hmo).or_insert(value);
                }
            }
        }
        break;
    }

    contact_info
}

/// First `ul` element following a heading at the same level.
fn following_list(heading: ElementRef) -> Option<ElementRef> {
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "ul")
}

/// Whole-element text, whitespace-collapsed.
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Cell text as trimmed non-empty lines. Both literal newlines and `<br>`
/// separated text nodes count as line breaks.
fn cell_lines(cell: ElementRef) -> Vec<String> {
    cell.text()
        .flat_map(|node| node.split('\n'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_SERVICE_HTML: &str = r#"<!DOCTYPE html>
<html dir="rtl">
<body>
<h2>מרפאות תקשורת</h2>
<p>שירותי אבחון וטיפול בתחום התקשורת, הדיבור והשפה.</p>
<ul>
  <li>אבחון הפרעות דיבור</li>
  <li>טיפולי שפה</li>
</ul>
<table>
  <tr><th>שם השירות</th><th>מכבי</th><th>מאוחדת</th><th>כללית</th></tr>
  <tr>
    <td>אבחון הפרעות דיבור</td>
    <td>זהב: 80% הנחה
כסף: 50% הנחה
ארד: 30% הנחה</td>
    <td>זהב: 75% הנחה
עד 20 טיפולים בשנה
כסף: 40% הנחה</td>
    <td>הנחה כללית ללא פירוט מסלולים</td>
  </tr>
  <tr>
    <td>טיפולי שפה</td>
    <td>זהב: מלא</td>
    <td>כסף: חלקי</td>
    <td>ארד: בסיסי</td>
  </tr>
  <tr><td>שורה חסרה</td><td>בלבד</td></tr>
</table>
<h3>מספרי טלפון לשירות לקוחות:</h3>
<ul>
  <li>מכבי: *3555</li>
  <li>מאוחדת: *3833</li>
  <li>כללית: *2700</li>
</ul>
</body>
</html>"#;

    #[test]
    fn parses_title_and_description() {
        let doc = parse_service_document(MOCK_SERVICE_HTML, ServiceCategory::CommunicationClinic);
        assert_eq!(doc.title, "מרפאות תקשורת");
        assert!(doc.description.starts_with("שירותי אבחון"));
    }

    #[test]
    fn parses_table_rows_in_order_with_all_hmos() {
        let doc = parse_service_document(MOCK_SERVICE_HTML, ServiceCategory::CommunicationClinic);
        assert_eq!(doc.services.len(), 2);
        assert_eq!(doc.services[0].name, "אבחון הפרעות דיבור");
        assert_eq!(doc.services[1].name, "טיפולי שפה");
        for entry in &doc.services {
            for hmo in Hmo::ALL {
                assert!(entry.benefits.contains_key(&hmo), "missing {hmo:?}");
            }
        }
    }

    #[test]
    fn tier_state_machine_joins_continuation_lines() {
        let doc = parse_service_document(MOCK_SERVICE_HTML, ServiceCategory::CommunicationClinic);
        let meuhedet = &doc.services[0].benefits[&Hmo::Meuhedet];
        assert_eq!(
            meuhedet.get(&Tier::Gold).map(String::as_str),
            Some("75% הנחה עד 20 טיפולים בשנה")
        );
        assert_eq!(
            meuhedet.get(&Tier::Silver).map(String::as_str),
            Some("40% הנחה")
        );
        assert!(!meuhedet.contains_key(&Tier::Bronze));
    }

    #[test]
    fn cell_without_tier_labels_yields_all_empty_tiers() {
        let doc = parse_service_document(MOCK_SERVICE_HTML, ServiceCategory::CommunicationClinic);
        let clalit = &doc.services[0].benefits[&Hmo::Clalit];
        assert_eq!(clalit.len(), 3);
        for tier in Tier::ALL {
            assert_eq!(clalit.get(&tier).map(String::as_str), Some(""));
        }
    }

    #[test]
    fn partial_cell_keeps_only_labeled_tiers() {
        let doc = parse_service_document(MOCK_SERVICE_HTML, ServiceCategory::CommunicationClinic);
        let maccabi = &doc.services[1].benefits[&Hmo::Maccabi];
        assert_eq!(maccabi.len(), 1);
        assert_eq!(maccabi.get(&Tier::Gold).map(String::as_str), Some("מלא"));
    }

    #[test]
    fn short_rows_are_skipped() {
        let doc = parse_service_document(MOCK_SERVICE_HTML, ServiceCategory::CommunicationClinic);
        assert!(doc.services.iter().all(|s| s.name != "שורה חסרה"));
    }

    #[test]
    fn extracts_contact_info_per_hmo() {
        let doc = parse_service_document(MOCK_SERVICE_HTML, ServiceCategory::CommunicationClinic);
        assert_eq!(doc.contact_info.get(&Hmo::Maccabi).map(String::as_str), Some("*3555"));
        assert_eq!(doc.contact_info.get(&Hmo::Clalit).map(String::as_str), Some("*2700"));
    }

    #[test]
    fn document_without_table_degrades_to_empty_fields() {
        let html = "<html><body><h2>כותרת</h2></body></html>";
        let doc = parse_service_document(html, ServiceCategory::Dental);
        assert_eq!(doc.title, "כותרת");
        assert_eq!(doc.description, "");
        assert!(doc.services.is_empty());
        assert!(doc.contact_info.is_empty());
    }

    #[test]
    fn empty_document_falls_back_to_category_key_title() {
        let doc = parse_service_document("", ServiceCategory::Optometry);
        assert_eq!(doc.title, "optometry");
        assert!(doc.services.is_empty());
    }

    #[test]
    fn parsing_is_idempotent() {
        let first = parse_service_document(MOCK_SERVICE_HTML, ServiceCategory::CommunicationClinic);
        let second = parse_service_document(MOCK_SERVICE_HTML, ServiceCategory::CommunicationClinic);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
