//! Curated home sections and trending topics.
//!
//! The unfiltered "all" tab shows three short lists fetched concurrently and
//! independently of the paginated result list.

use tracing::{debug, warn};

use crate::api::MaterialsApi;
use crate::error::PortalResult;
use crate::models::{Material, Page};

/// Items per curated section.
pub const SECTION_SIZE: u32 = 6;

/// Shown when the topics endpoint fails.
pub const FALLBACK_TOPICS: [&str; 8] = [
    "Inteligência Artificial",
    "Sustentabilidade",
    "Blockchain",
    "Saúde Mental",
    "Energias Renováveis",
    "Direito Digital",
    "Neurociência",
    "Economia Circular",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub materials: Vec<Material>,
    pub is_loading: bool,
    pub failed: bool,
}

impl Section {
    fn settle(&mut self, result: PortalResult<Page<Material>>) {
        self.is_loading = false;
        match result {
            Ok(page) => {
                self.materials = page.content;
                self.failed = false;
            }
            Err(_) => self.failed = true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CuratedSections {
    /// Always empty for anonymous viewers
    pub recommended: Section,
    pub trending: Section,
    pub recent: Section,
}

impl CuratedSections {
    pub fn is_loading(&self) -> bool {
        self.recommended.is_loading || self.trending.is_loading || self.recent.is_loading
    }

    pub(crate) fn mark_loading(&mut self, include_recommended: bool) {
        if include_recommended {
            self.recommended.is_loading = true;
        } else {
            self.recommended = Section::default();
        }
        self.trending.is_loading = true;
        self.recent.is_loading = true;
    }

    /// Store the results. Returns true if any section failed.
    pub(crate) fn apply(&mut self, results: SectionResults) -> bool {
        let mut any_failed = false;
        match results.recommended {
            Some(result) => {
                any_failed |= result.is_err();
                self.recommended.settle(result);
            }
            None => self.recommended = Section::default(),
        }
        any_failed |= results.trending.is_err();
        self.trending.settle(results.trending);
        any_failed |= results.recent.is_err();
        self.recent.settle(results.recent);
        any_failed
    }
}

#[derive(Debug)]
pub struct SectionResults {
    /// `None` when the viewer is anonymous
    pub recommended: Option<PortalResult<Page<Material>>>,
    pub trending: PortalResult<Page<Material>>,
    pub recent: PortalResult<Page<Material>>,
}

/// Issue the section fetches concurrently. None waits for another to start.
pub async fn fetch_sections(api: &MaterialsApi, include_recommended: bool) -> SectionResults {
    let recommended = async {
        if include_recommended {
            Some(api.recommended(0, SECTION_SIZE).await)
        } else {
            None
        }
    };
    let (recommended, trending, recent) = futures::join!(
        recommended,
        api.trending(0, SECTION_SIZE),
        api.recent(0, SECTION_SIZE),
    );
    debug!(
        recommended = recommended.is_some(),
        trending_ok = trending.is_ok(),
        recent_ok = recent.is_ok(),
        "Curated sections fetched"
    );
    SectionResults {
        recommended,
        trending,
        recent,
    }
}

/// Trending topics, or the fallback list when the endpoint fails or
/// returns nothing.
pub async fn fetch_topics(api: &MaterialsApi) -> Vec<String> {
    match api.trending_topics().await {
        Ok(topics) if !topics.is_empty() => topics,
        Ok(_) => fallback_topics(),
        Err(err) => {
            warn!(error = %err, "Trending topics unavailable, using fallback list");
            fallback_topics()
        }
    }
}

fn fallback_topics() -> Vec<String> {
    FALLBACK_TOPICS.iter().map(|t| t.to_string()).collect()
}
