//! Resolution output and the semantic matcher's extraction contract.

use serde::{Deserialize, Serialize};

/// Sentinel shown in every field when an address cannot be resolved.
pub const NOT_FOUND: &str = "Không tìm thấy thông tin";

/// Resolved fiscal authorities for one address.
///
/// Serialised with the camelCase keys the form layer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAgency {
    /// Tax agency managing the address (Cơ quan quản lý thu).
    pub collecting_agency: String,
    /// Treasury receiving the remittance (Vào tài khoản của KBNN).
    pub treasury_account: String,
    /// Code of the collecting agency (Mã cơ quan thu).
    pub agency_code: String,
}

impl ResolvedAgency {
    /// The all-sentinel bundle returned on total failure.
    pub fn not_found() -> Self {
        Self {
            collecting_agency: NOT_FOUND.to_string(),
            treasury_account: NOT_FOUND.to_string(),
            agency_code: NOT_FOUND.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        *self == Self::not_found()
    }
}

/// Fields the semantic matcher extracts from an address and reference excerpt.
///
/// All four keys are required; a response missing any of them is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyExtraction {
    pub collecting_agency: String,
    pub agency_code: String,
    pub district: String,
    pub province: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_agency_uses_camel_case_keys() {
        let resolved = ResolvedAgency {
            collecting_agency: "Thuế cơ sở 1 thành phố Hà Nội".into(),
            treasury_account: "Phòng Giao dịch số 1 - Kho bạc Nhà nước khu vực I".into(),
            agency_code: "1010001".into(),
        };
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["collectingAgency"], "Thuế cơ sở 1 thành phố Hà Nội");
        assert_eq!(json["agencyCode"], "1010001");
        assert!(json.get("treasuryAccount").is_some());
    }

    #[test]
    fn not_found_fills_every_field() {
        let bundle = ResolvedAgency::not_found();
        assert!(bundle.is_not_found());
        assert_eq!(bundle.collecting_agency, NOT_FOUND);
        assert_eq!(bundle.treasury_account, NOT_FOUND);
        assert_eq!(bundle.agency_code, NOT_FOUND);
    }

    #[test]
    fn extraction_requires_all_keys() {
        let complete = r#"{
            "collectingAgency": "Thuế cơ sở 2 thành phố Hồ Chí Minh",
            "agencyCode": "1790002",
            "district": "Quận 5",
            "province": "Hồ Chí Minh"
        }"#;
        let parsed: AgencyExtraction = serde_json::from_str(complete).unwrap();
        assert_eq!(parsed.district, "Quận 5");

        let missing = r#"{"collectingAgency": "x", "agencyCode": "1", "district": "Quận 5"}"#;
        assert!(serde_json::from_str::<AgencyExtraction>(missing).is_err());
    }
}
