//! Resolution orchestrator: address → [`ResolvedAgency`].
//!
//! 1. select the agency reference excerpt for the address
//! 2. ask the semantic matcher for agency, code, district and province
//! 3. resolve the treasury from (district, province) in the local directory
//!
//! Every failure along the way ends in [`ResolvedAgency::not_found`]; callers
//! always get something to render.

use taxroute_core::{
    AgencyExtraction, AgencyReference, NOT_FOUND, ResolvedAgency, TREASURY_NAME, TreasuryLookup,
};
use tracing::{debug, warn};

use crate::error::MatchError;
use crate::matcher::{MatchRequest, SemanticMatcher};

/// Addresses shorter than this (in characters, trimmed) are rejected
/// without calling the matcher.
pub const MIN_ADDRESS_CHARS: usize = 5;

pub struct Resolver<'a, M> {
    matcher: M,
    reference: &'a AgencyReference,
    treasury: TreasuryLookup<'a>,
}

impl<M: SemanticMatcher> Resolver<'static, M> {
    /// Resolver over the embedded reference data.
    pub fn with_embedded_data(matcher: M) -> Self {
        Self::new(
            matcher,
            AgencyReference::embedded(),
            TreasuryLookup::embedded(),
        )
    }
}

impl<'a, M: SemanticMatcher> Resolver<'a, M> {
    pub fn new(matcher: M, reference: &'a AgencyReference, treasury: TreasuryLookup<'a>) -> Self {
        Self {
            matcher,
            reference,
            treasury,
        }
    }

    /// Resolve an address. Never fails: errors become the not-found bundle.
    pub async fn resolve(&self, address: &str) -> ResolvedAgency {
        match self.try_resolve(address).await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(error = %e, "address resolution failed; returning not-found bundle");
                ResolvedAgency::not_found()
            }
        }
    }

    /// Resolve an address, surfacing the failure instead of the sentinel.
    pub async fn try_resolve(&self, address: &str) -> Result<ResolvedAgency, MatchError> {
        let address = address.trim();
        if address.chars().count() < MIN_ADDRESS_CHARS {
            return Err(MatchError::AddressTooShort(address.to_string()));
        }

        let request = MatchRequest {
            address: address.to_string(),
            reference_excerpt: self.reference.select_excerpt(address),
        };
        let extraction = self.matcher.extract(&request).await?;
        let treasury_account = self.treasury_account(&extraction);

        Ok(ResolvedAgency {
            collecting_agency: extraction.collecting_agency,
            treasury_account,
            agency_code: extraction.agency_code,
        })
    }

    /// Directory lookup, then the province-level treasury name, then the sentinel.
    fn treasury_account(&self, extraction: &AgencyExtraction) -> String {
        if let Some(name) = self
            .treasury
            .resolve_treasury(&extraction.district, &extraction.province)
        {
            return name;
        }
        let province = extraction.province.trim();
        debug!(province, "province not in region table; using generic treasury name");
        if province.is_empty() {
            NOT_FOUND.to_string()
        } else {
            format!("{TREASURY_NAME} {province}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use taxroute_core::{DirectoryIndex, RegionTable};

    /// Returns a fixed extraction and counts calls.
    struct StubMatcher {
        extraction: AgencyExtraction,
        calls: AtomicUsize,
    }

    impl StubMatcher {
        fn new(district: &str, province: &str) -> Self {
            Self {
                extraction: AgencyExtraction {
                    collecting_agency: "Thuế cơ sở 1 thành phố Hồ Chí Minh".into(),
                    agency_code: "1790001".into(),
                    district: district.into(),
                    province: province.into(),
                },
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SemanticMatcher for StubMatcher {
        async fn extract(&self, _request: &MatchRequest) -> Result<AgencyExtraction, MatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.extraction.clone())
        }
    }

    struct FailingMatcher;

    #[async_trait]
    impl SemanticMatcher for FailingMatcher {
        async fn extract(&self, _request: &MatchRequest) -> Result<AgencyExtraction, MatchError> {
            Err(MatchError::Server {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }

    /// Records the excerpt it was given.
    struct ExcerptProbe;

    #[async_trait]
    impl SemanticMatcher for ExcerptProbe {
        async fn extract(&self, request: &MatchRequest) -> Result<AgencyExtraction, MatchError> {
            Ok(AgencyExtraction {
                collecting_agency: request.reference_excerpt.clone(),
                agency_code: String::new(),
                district: String::new(),
                province: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn resolves_agency_and_treasury() {
        let resolver = Resolver::with_embedded_data(StubMatcher::new("Quận 1", "Hồ Chí Minh"));
        let resolved = resolver
            .resolve("12 Lê Lợi, phường Bến Nghé, Quận 1, TP Hồ Chí Minh")
            .await;
        assert_eq!(resolved.collecting_agency, "Thuế cơ sở 1 thành phố Hồ Chí Minh");
        assert_eq!(resolved.agency_code, "1790001");
        assert_eq!(
            resolved.treasury_account,
            "Phòng Giao dịch số 1 - Kho bạc Nhà nước khu vực II"
        );
    }

    #[tokio::test]
    async fn unknown_district_uses_regional_treasury() {
        let resolver = Resolver::with_embedded_data(StubMatcher::new("Phường Mới", "Hà Nội"));
        let resolved = resolver.resolve("Số 1 phố Mới, Hà Nội").await;
        assert_eq!(resolved.treasury_account, "Kho bạc Nhà nước khu vực I");
    }

    #[tokio::test]
    async fn unknown_province_uses_generic_treasury() {
        let resolver = Resolver::with_embedded_data(StubMatcher::new("Quận X", "Tỉnh Mới"));
        let resolved = resolver.resolve("Số 1, Quận X, Tỉnh Mới").await;
        assert_eq!(resolved.treasury_account, "Kho bạc Nhà nước Tỉnh Mới");
    }

    #[tokio::test]
    async fn blank_province_is_not_found() {
        let resolver = Resolver::with_embedded_data(StubMatcher::new("", ""));
        let resolved = resolver.resolve("somewhere unknown").await;
        assert_eq!(resolved.treasury_account, NOT_FOUND);
        assert_eq!(resolved.agency_code, "1790001");
    }

    #[tokio::test]
    async fn matcher_failure_becomes_not_found() {
        let resolver = Resolver::with_embedded_data(FailingMatcher);
        let resolved = resolver.resolve("12 Lê Lợi, Quận 1, TP Hồ Chí Minh").await;
        assert!(resolved.is_not_found());
    }

    #[tokio::test]
    async fn short_address_skips_matcher() {
        let resolver = Resolver::with_embedded_data(StubMatcher::new("Quận 1", "Hồ Chí Minh"));
        let resolved = resolver.resolve("  HN ").await;
        assert!(resolved.is_not_found());
        assert_eq!(resolver.matcher.calls.load(Ordering::SeqCst), 0);
        assert!(matches!(
            resolver.try_resolve("").await,
            Err(MatchError::AddressTooShort(_))
        ));
    }

    #[tokio::test]
    async fn matcher_receives_province_excerpt() {
        let resolver = Resolver::with_embedded_data(ExcerptProbe);
        let resolved = resolver.resolve("phường Hải Châu, Đà Nẵng").await;
        assert!(resolved.collecting_agency.starts_with(taxroute_core::reference::AGENCY_HEADER));
        assert!(resolved.collecting_agency.contains("Thuế thành phố Đà Nẵng"));
    }

    #[tokio::test]
    async fn injected_data_is_used() {
        let index = DirectoryIndex::build("KHU VỰC 2\n,PGD Test,Quận 1\n");
        let regions = RegionTable::from_csv("Hồ Chí Minh,II\n").unwrap();
        let resolver = Resolver::new(
            StubMatcher::new("Quận 1", "Hồ Chí Minh"),
            AgencyReference::embedded(),
            TreasuryLookup::new(&index, &regions),
        );
        let resolved = resolver.resolve("Quận 1, Hồ Chí Minh").await;
        assert_eq!(
            resolved.treasury_account,
            "PGD Test - Kho bạc Nhà nước khu vực II"
        );
    }

    #[tokio::test]
    async fn repeated_resolution_is_stable() {
        let resolver = Resolver::with_embedded_data(StubMatcher::new("Quận Cầu Giấy", "Hà Nội"));
        let first = resolver.resolve("Số 1 Xuân Thủy, Cầu Giấy, Hà Nội").await;
        let second = resolver.resolve("Số 1 Xuân Thủy, Cầu Giấy, Hà Nội").await;
        assert_eq!(first, second);
        assert_eq!(resolver.matcher.calls.load(Ordering::SeqCst), 2);
    }
}
