//! Wire types for the extraction endpoint.
//!
//! The extracted-field schema is fixed: every key is always present in the
//! response, with `""` standing in for anything the form or the model did
//! not yield. Serde defaults keep that guarantee even when the model drops
//! a key.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Base64-encoded PDF bytes.
    pub document: String,
    /// Locale hint forwarded to the OCR collaborator. Defaults to Hebrew.
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub extraction_id: Uuid,
    pub fields: ExtractedFields,
    pub ocr_text_chars: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedFields {
    pub last_name: String,
    pub first_name: String,
    pub id_number: String,
    pub gender: String,
    pub date_of_birth: DateParts,
    pub address: Address,
    pub landline_phone: String,
    pub mobile_phone: String,
    pub job_type: String,
    pub date_of_injury: DateParts,
    pub time_of_injury: String,
    pub accident_location: String,
    pub accident_address: String,
    pub accident_description: String,
    pub injured_body_part: String,
    pub signature: String,
    pub form_filling_date: DateParts,
    pub form_receipt_date_at_clinic: DateParts,
    pub medical_institution_fields: MedicalInstitutionFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateParts {
    pub day: String,
    pub month: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub house_number: String,
    pub entrance: String,
    pub apartment: String,
    pub city: String,
    pub postal_code: String,
    pub po_box: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalInstitutionFields {
    pub health_fund_member: String,
    pub nature_of_accident: String,
    pub medical_diagnoses: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn assert_all_strings_present(value: &Value) {
        match value {
            Value::Object(map) => {
                assert!(!map.is_empty());
                for v in map.values() {
                    assert_all_strings_present(v);
                }
            }
            Value::String(s) => assert_eq!(s, ""),
            other => panic!("unexpected value in schema: {other}"),
        }
    }

    #[test]
    fn default_schema_has_every_key_as_empty_string() {
        let value = serde_json::to_value(ExtractedFields::default()).unwrap();
        assert_all_strings_present(&value);

        let map = value.as_object().unwrap();
        for key in [
            "lastName",
            "firstName",
            "idNumber",
            "gender",
            "dateOfBirth",
            "address",
            "landlinePhone",
            "mobilePhone",
            "jobType",
            "dateOfInjury",
            "timeOfInjury",
            "accidentLocation",
            "accidentAddress",
            "accidentDescription",
            "injuredBodyPart",
            "signature",
            "formFillingDate",
            "formReceiptDateAtClinic",
            "medicalInstitutionFields",
        ] {
            assert!(map.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn missing_keys_in_model_output_default_to_empty() {
        let partial = json!({
            "firstName": "יוסף",
            "address": { "street": "הרמבם", "houseNumber": "16" }
        });
        let fields: ExtractedFields = serde_json::from_value(partial).unwrap();
        assert_eq!(fields.first_name, "יוסף");
        assert_eq!(fields.address.street, "הרמבם");
        assert_eq!(fields.address.apartment, "");
        assert_eq!(fields.last_name, "");
        assert_eq!(fields.medical_institution_fields.medical_diagnoses, "");
    }
}
