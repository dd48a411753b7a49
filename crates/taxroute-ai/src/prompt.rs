//! Prompt and response contract for agency extraction.

use serde_json::{Value, json};
use taxroute_core::AgencyExtraction;

use crate::error::MatchError;
use crate::matcher::MatchRequest;

// ── Prompt templates ──

pub const SYSTEM_PROMPT: &str = "\
You resolve Vietnamese postal addresses to the tax authority that manages them.

You are given an address and a CSV excerpt of tax agencies (agency code, agency name) \
for the province named in the address.

Respond ONLY with a JSON object. No markdown fences, no explanation, just raw JSON:
{
  \"collectingAgency\": \"agency name copied exactly from the reference data\",
  \"agencyCode\": \"the code on the same row as collectingAgency\",
  \"district\": \"district or ward-level unit from the address, e.g. 'Quận 1', 'Thành phố Thủ Đức'\",
  \"province\": \"province or centrally-run city, e.g. 'Hà Nội', 'Hồ Chí Minh'\"
}

Prefer the agency responsible for the ward or commune when the reference data lists one; \
otherwise choose the district-level agency, then the province-level agency.
If a field cannot be determined, return an empty string for it.";

pub fn build_user_prompt(request: &MatchRequest) -> String {
    format!(
        "Input address: \"{address}\"\n\
         \n\
         Task 1: identify collectingAgency (Tên cơ quan quản lý thu) from the reference data.\n\
         Task 2: give the agencyCode (Mã cơ quan thu) of that agency.\n\
         Task 3: extract district and province from the address as normalised Vietnamese names.\n\
         \n\
         Tax reference data (CSV subset):\n\
         ```csv\n\
         {excerpt}\n\
         ```",
        address = request.address,
        excerpt = request.reference_excerpt,
    )
}

/// Structured-output schema: an object with the four required string keys.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "collectingAgency": { "type": "STRING" },
            "agencyCode": { "type": "STRING" },
            "district": { "type": "STRING" },
            "province": { "type": "STRING" }
        },
        "required": ["collectingAgency", "agencyCode", "district", "province"]
    })
}

/// Parse the model's JSON text, tolerating a surrounding markdown fence.
pub fn parse_extraction(text: &str) -> Result<AgencyExtraction, MatchError> {
    let body = strip_fence(text.trim());
    if body.is_empty() {
        return Err(MatchError::EmptyResponse);
    }
    Ok(serde_json::from_str(body)?)
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
