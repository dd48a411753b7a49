//! The semantic matcher boundary.
//!
//! A matcher reads a free-text address together with a bounded agency
//! reference excerpt and returns the structured [`AgencyExtraction`]. The
//! production implementation calls a generative model; tests use stubs.

use async_trait::async_trait;
use taxroute_core::AgencyExtraction;

use crate::error::MatchError;

/// One extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRequest {
    pub address: String,
    /// Agency CSV excerpt from [`taxroute_core::AgencyReference::select_excerpt`].
    pub reference_excerpt: String,
}

#[async_trait]
pub trait SemanticMatcher: Send + Sync {
    /// Extract agency, agency code, district and province for the request.
    async fn extract(&self, request: &MatchRequest) -> Result<AgencyExtraction, MatchError>;
}
