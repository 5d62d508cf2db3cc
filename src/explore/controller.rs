//! Resource explorer controller.
//!
//! Every state-changing action mutates [`FilterState`], writes the query
//! string through the [`Navigator`], then issues exactly one paginated fetch
//! for the active tab. Fetches are split into [`begin_fetch`], [`FetchTicket::run`]
//! and [`apply_fetch`] so a response from a superseded request is discarded
//! instead of overwriting a newer one.
//!
//! [`begin_fetch`]: ExploreController::begin_fetch
//! [`apply_fetch`]: ExploreController::apply_fetch

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::filters::{DateRange, FilterState, SortBy, Tab, ViewMode};
use super::query;
use super::sections::{self, CuratedSections};
use crate::api::{MaterialQuery, MaterialsApi};
use crate::auth::AuthController;
use crate::error::PortalResult;
use crate::models::{Area, Material, MaterialType, Page, PaginationInfo};
use crate::notifications::Notifier;
use crate::traits::Navigator;

pub const LOAD_FAILED: &str = "Não foi possível carregar os recursos. Tente novamente mais tarde.";
pub const SECTIONS_FAILED: &str =
    "Não foi possível carregar alguns recursos. Tente novamente mais tarde.";

/// What a fetch asks the server for.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Search(MaterialQuery),
    Recommended { page: u32, size: u32 },
    Trending { page: u32, size: u32 },
    Recent { page: u32, size: u32 },
}

/// A fetch in flight, stamped with the generation it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: FetchRequest,
}

impl FetchTicket {
    pub async fn run(&self, api: &MaterialsApi) -> PortalResult<Page<Material>> {
        match &self.request {
            FetchRequest::Search(query) => api.search(query).await,
            FetchRequest::Recommended { page, size } => api.recommended(*page, *size).await,
            FetchRequest::Trending { page, size } => api.trending(*page, *size).await,
            FetchRequest::Recent { page, size } => api.recent(*page, *size).await,
        }
    }
}

pub struct ExploreController {
    api: MaterialsApi,
    auth: AuthController,
    navigator: Arc<dyn Navigator>,
    notifier: Notifier,

    state: FilterState,
    materials: Vec<Material>,
    pagination: PaginationInfo,
    is_loading: bool,
    error: Option<String>,
    sections: CuratedSections,
    sections_loaded: bool,
    topics: Vec<String>,
    generation: u64,
}

impl std::fmt::Debug for ExploreController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExploreController")
            .field("state", &self.state)
            .field("materials", &self.materials.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl ExploreController {
    pub fn new(
        api: MaterialsApi,
        auth: AuthController,
        navigator: Arc<dyn Navigator>,
        notifier: Notifier,
    ) -> Self {
        let state = FilterState::default();
        Self {
            api,
            auth,
            navigator,
            notifier,
            pagination: PaginationInfo {
                size: state.page_size,
                ..PaginationInfo::default()
            },
            state,
            materials: Vec::new(),
            is_loading: false,
            error: None,
            sections: CuratedSections::default(),
            sections_loaded: false,
            topics: Vec::new(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn pagination(&self) -> PaginationInfo {
        self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn sections(&self) -> &CuratedSections {
        &self.sections
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn api(&self) -> &MaterialsApi {
        &self.api
    }

    /// Initialize from the query string present on arrival. The URL is read,
    /// not rewritten.
    pub async fn mount(&mut self, query_string: &str) {
        self.state = query::decode(query_string);
        info!(tab = %self.state.active_tab, page = self.state.page, "Explore mounted");
        self.topics = sections::fetch_topics(&self.api).await;
        self.refresh().await;
    }

    pub async fn submit_search(&mut self, term: &str) {
        self.state.search_term = term.trim().to_string();
        self.filter_changed().await;
    }

    pub async fn toggle_type(&mut self, material_type: MaterialType) {
        self.state.toggle_type(material_type);
        self.filter_changed().await;
    }

    pub async fn toggle_area(&mut self, area: Area) {
        self.state.toggle_area(area);
        self.filter_changed().await;
    }

    pub async fn set_date_range(&mut self, range: DateRange) {
        self.state.date_range = range;
        self.filter_changed().await;
    }

    pub async fn set_min_downloads(&mut self, min_downloads: u64) {
        self.state.min_downloads = min_downloads;
        self.filter_changed().await;
    }

    pub async fn set_only_free(&mut self, only_free: bool) {
        self.state.only_free = only_free;
        self.filter_changed().await;
    }

    pub async fn set_sort(&mut self, sort_by: SortBy) {
        self.state.sort_by = sort_by;
        self.filter_changed().await;
    }

    pub async fn set_tab(&mut self, tab: Tab) {
        self.state.active_tab = tab;
        self.filter_changed().await;
    }

    /// Remove one type chip.
    pub async fn remove_type(&mut self, material_type: MaterialType) {
        self.state.types.retain(|t| *t != material_type);
        self.filter_changed().await;
    }

    /// Remove one area chip.
    pub async fn remove_area(&mut self, area: Area) {
        self.state.areas.retain(|a| *a != area);
        self.filter_changed().await;
    }

    pub async fn clear_search(&mut self) {
        self.state.search_term.clear();
        self.filter_changed().await;
    }

    pub async fn reset_sort(&mut self) {
        self.state.sort_by = SortBy::Relevance;
        self.filter_changed().await;
    }

    /// Reset every filter. Tab, view mode and page size are kept.
    pub async fn clear_filters(&mut self) {
        self.state.clear_filters();
        self.filter_changed().await;
    }

    /// Fresh search for a trending topic on the "all" tab.
    pub async fn click_topic(&mut self, topic: &str) {
        self.state.clear_filters();
        self.state.search_term = topic.trim().to_string();
        self.state.active_tab = Tab::All;
        self.filter_changed().await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.state.page = page;
        self.write_url();
        self.refresh().await;
    }

    pub async fn set_page_size(&mut self, size: u32) {
        if size == 0 {
            return;
        }
        self.state.page_size = size;
        self.state.page = 0;
        self.write_url();
        self.refresh().await;
    }

    /// Presentation only: rewrites the URL, fetches nothing.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.view_mode = mode;
        self.write_url();
    }

    /// Re-run the fetches whose result depends on the viewer, after a login
    /// or logout.
    pub async fn auth_changed(&mut self) {
        self.sections_loaded = false;
        if self.state.active_tab == Tab::Recommended {
            self.refresh().await;
        } else if self.state.shows_curated_sections() {
            self.load_sections().await;
        }
    }

    async fn filter_changed(&mut self) {
        self.state.page = 0;
        self.write_url();
        self.refresh().await;
    }

    fn write_url(&self) {
        let encoded = query::encode(&self.state);
        debug!(query = %encoded, "Explore URL updated");
        self.navigator.replace_query(&encoded);
    }

    /// Fetch the list for the current state, plus the curated sections when
    /// they are showing and not loaded yet.
    pub async fn refresh(&mut self) {
        if let Some(ticket) = self.begin_fetch() {
            let result = ticket.run(&self.api).await;
            self.apply_fetch(&ticket, result);
        }

        if self.state.shows_curated_sections() {
            if !self.sections_loaded {
                self.load_sections().await;
            }
        } else {
            self.sections_loaded = false;
        }
    }

    /// Start a fetch for the current state. Returns `None` when the active
    /// tab has nothing to fetch (recommendations for an anonymous viewer).
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        self.generation += 1;
        let (page, size) = (self.state.page, self.state.page_size);
        let request = match self.state.active_tab {
            Tab::All => FetchRequest::Search(self.state.to_material_query()),
            Tab::Recommended if !self.auth.is_authenticated() => {
                debug!("Recommendations need a signed-in viewer");
                self.materials.clear();
                self.pagination = PaginationInfo {
                    current_page: page,
                    size,
                    ..PaginationInfo::default()
                };
                self.is_loading = false;
                return None;
            }
            Tab::Recommended => FetchRequest::Recommended { page, size },
            Tab::Trending => FetchRequest::Trending { page, size },
            Tab::Recent => FetchRequest::Recent { page, size },
        };
        self.is_loading = true;
        debug!(generation = self.generation, ?request, "Explore fetch issued");
        Some(FetchTicket {
            generation: self.generation,
            request,
        })
    }

    /// Apply a fetch result. Returns false if the ticket was superseded.
    pub fn apply_fetch(&mut self, ticket: &FetchTicket, result: PortalResult<Page<Material>>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                "Discarding stale explore response"
            );
            return false;
        }

        self.is_loading = false;
        match result {
            Ok(page) => {
                self.pagination = PaginationInfo::from_page(&page);
                self.materials = page.content;
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, tab = %self.state.active_tab, "Explore fetch failed");
                self.materials.clear();
                self.pagination = PaginationInfo {
                    current_page: self.state.page,
                    size: self.state.page_size,
                    ..PaginationInfo::default()
                };
                self.error = Some(LOAD_FAILED.to_string());
                self.notifier.error(LOAD_FAILED);
            }
        }
        true
    }

    async fn load_sections(&mut self) {
        let include_recommended = self.auth.is_authenticated();
        self.sections.mark_loading(include_recommended);
        let results = sections::fetch_sections(&self.api, include_recommended).await;
        if self.sections.apply(results) {
            self.notifier.error(SECTIONS_FAILED);
        }
        self.sections_loaded = true;
    }
}
