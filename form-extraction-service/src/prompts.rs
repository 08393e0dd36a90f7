//! The field-extraction prompt.
//!
//! The rules are deliberately strict and literal: the model copies text
//! verbatim, resolves checkbox markers, and returns the full schema with
//! empty strings for anything absent. Address entrance-vs-apartment
//! disambiguation stays a prompt rule rather than post-processing.

pub const EXTRACTION_PROMPT: &str = r#"
You are extracting information from an Israeli National Insurance Institute (ביטוח לאומי) form.

Extract the following fields from the OCR text and return ONLY a valid JSON object.
For any field not found, use an empty string "".

Here are detailed extraction rules to follow EXACTLY:

1. Text Preservation - STRICT RULE:
   - NEVER shorten, abbreviate, or modify any written text from the document
   - Copy text EXACTLY as it appears, including spelling errors or unusual formatting

2. ID Numbers - STRICT RULE:
   - If ID number has MORE than 9 digits, keep ALL extra digits - do NOT truncate
   - If ID number has LESS than 9 digits, keep exactly what's written - do NOT add zeros
   - ID is only numbers with no letters in it! If there are spaces between the numbers remove them.

3. Job Type Detection - STRICT RULE:
   - Look for this EXACT pattern hierarchy:
     1. First find "סוג העבודה"
     2. Look at the line ABOVE "סוג העבודה" - this should contain "תאריך"
     3. Look at the line ABOVE the "תאריך" line - THIS is the actual job type value
   - Do NOT use any text that appears after or below "סוג העבודה"
   - If this pattern is not found, leave jobType empty ""

4. Signature Field - STRICT RULE:
   - Look ONLY at the line immediately after the word "חתימה" If that line contains text, fill by it!
   - If that line contains ANY numbers, dates, symbols, or institutional text, the signature field MUST be empty ""
   - NEVER use names from other parts of the document, just from the row after "חתימה"
   - Example: if you see "חתימה" followed by "5" or any number, signature = ""

5. First Name Inference - STRICT RULE:
   - First, look for direct "שם פרטי" field
   - If "שם פרטי" field is empty or not found, then you MAY infer from other sections:
     * Check "שם המבקש" section for full name, extract first name portion
     * Check signature area for full names
   - When inferring, extract ONLY the first name part, not the full name
   - If you find "יוסף כהן", extract only "יוסף" for firstName

6. Selection Field Extraction - STRICT RULE:
   - When you see "נבחר:" (selected), extract the text that comes immediately after it on the same line
   - If nothing follows "נבחר:" on the same line, look at the text on the line directly below
   - Stop extracting when you reach another selection marker or a clear field separator
   - Ignore any "לא נבחר:" (unselected) options completely

7. accidentLocation (מקום התאונה) - STRICT RULE:
   - Look for the "מקום התאונה:" section in the document
   - Possible values are: במפעל, תאונה בדרך ללא רכב, ת. דרכים בדרך לעבודה/מהעבודה, ת. דרכים בעבודה, אחר
   - The option marked with "נבחר:" is the selected one; options marked "לא נבחר:" are NOT selected

8. natureOfAccident - STRICT RULE:
   - This field can ONLY contain one of these two values: "סומן" or ""
   - If you see any indication that this field is marked/checked/selected, use "סומן"
   - If no clear indication is found, leave as empty string ""

9. Address Fields - Entrance vs Apartment - STRICT RULE:
   - Entrance (כניסה): letters (א, ב, ג, A, B, C) OR numbers, typically a single digit or letter
   - Apartment (דירה): numbers, single or multiple digits
   - Pattern Recognition Logic:
     * 3 components (street, house number, single number/letter): entrance="", apartment=that number
     * 4 components (street, house number, entrance, apartment): entrance=first value, apartment=second value
   - Extract based on POSITION in the form, not content type
   - Examples from real forms:
     * "hameri 48 3 tel aviv" → street="hameri", houseNumber="48", entrance="", apartment="3"
     * "הרמבם 16 1 12 אבן יהודה" → street="הרמבם", houseNumber="16", entrance="1", apartment="12"

10. CRITICAL: Return the COMPLETE JSON structure with ALL fields
    - NEVER remove any fields from the JSON structure, even if not found in the text. Leave empty fields as empty strings "" but keep the field in the JSON.
    - Never remove the field medicalDiagnoses in your answer, even if not found in the text.

11. ONLY phone numbers always start with 0. If the first digit is not read as zero, change the first digit to zero (do not add an extra zero). Do not change numbers like ID, only phone numbers!

Look for these Hebrew/English field mappings:
- שם משפחה / Last Name → lastName
- שם פרטי / First Name → firstName
- מספר זהות / ID Number → idNumber
- מין / Gender → gender
- תאריך לידה / Date of Birth → dateOfBirth (split into day, month, year)
- רחוב / Street → address.street
- מספר בית / House Number → address.houseNumber
- כניסה / Entrance → address.entrance
- דירה / Apartment → address.apartment
- ישוב / City → address.city
- מיקוד / Postal Code → address.postalCode
- תא דואר / PO Box → address.poBox
- טלפון קווי / Landline → landlinePhone
- טלפון נייד / Mobile → mobilePhone
- סוג העבודה / Job Type → jobType
- תאריך הפגיעה / Date of Injury → dateOfInjury (split into day, month, year)
- שעת הפגיעה / Time of Injury → timeOfInjury
- מקום התאונה / Accident Location → accidentLocation
- כתובת מקום התאונה / Accident Address → accidentAddress
- תיאור התאונה / Accident Description → accidentDescription
- האיבר שנפגע / Injured Body Part → injuredBodyPart
- חתימה / Signature → signature
- תאריך מילוי הטופס / Form Filling Date → formFillingDate (split into day, month, year)
- תאריך קבלת הטופס בקופה / Form Receipt Date → formReceiptDateAtClinic (split into day, month, year)
- Medical fields → medicalInstitutionFields

Return this exact JSON structure:
{
    "lastName": "",
    "firstName": "",
    "idNumber": "",
    "gender": "",
    "dateOfBirth": { "day": "", "month": "", "year": "" },
    "address": {
        "street": "",
        "houseNumber": "",
        "entrance": "",
        "apartment": "",
        "city": "",
        "postalCode": "",
        "poBox": ""
    },
    "landlinePhone": "",
    "mobilePhone": "",
    "jobType": "",
    "dateOfInjury": { "day": "", "month": "", "year": "" },
    "timeOfInjury": "",
    "accidentLocation": "",
    "accidentAddress": "",
    "accidentDescription": "",
    "injuredBodyPart": "",
    "signature": "",
    "formFillingDate": { "day": "", "month": "", "year": "" },
    "formReceiptDateAtClinic": { "day": "", "month": "", "year": "" },
    "medicalInstitutionFields": {
        "healthFundMember": "",
        "natureOfAccident": "",
        "medicalDiagnoses": ""
    }
}

OCR TEXT TO ANALYZE:
"#;
