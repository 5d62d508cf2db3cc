//! Explore filter state.
//!
//! The in-memory cache of the explore query string. See [`super::query`]
//! for the codec.

use std::fmt;
use std::str::FromStr;

use crate::api::MaterialQuery;
use crate::models::{Area, MaterialType};

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Explore tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    All,
    Recommended,
    Trending,
    Recent,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::All => "all",
            Tab::Recommended => "recommended",
            Tab::Trending => "trending",
            Tab::Recent => "recent",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Tab::All),
            "recommended" => Ok(Tab::Recommended),
            "trending" => Ok(Tab::Trending),
            "recent" => Ok(Tab::Recent),
            other => Err(format!("unknown tab '{}'", other)),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(format!("unknown view mode '{}'", other)),
        }
    }
}

/// Result ordering. Relevance is the server default and is never sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Relevance,
    Recent,
    Downloads,
    Rating,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::Relevance,
        SortBy::Recent,
        SortBy::Downloads,
        SortBy::Rating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Recent => "recent",
            SortBy::Downloads => "downloads",
            SortBy::Rating => "rating",
        }
    }

    /// Value for the `sort` search parameter.
    pub fn server_key(&self) -> Option<&'static str> {
        match self {
            SortBy::Relevance => None,
            other => Some(other.as_str()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Relevance => "Relevância",
            SortBy::Recent => "Mais recentes",
            SortBy::Downloads => "Mais baixados",
            SortBy::Rating => "Melhor avaliados",
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| format!("unknown sort '{}'", s))
    }
}

/// Publication age window in years, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub min_years: u32,
    pub max_years: u32,
}

impl DateRange {
    pub const MAX_YEARS: u32 = 5;

    pub fn new(min_years: u32, max_years: u32) -> Self {
        let max_years = max_years.min(Self::MAX_YEARS);
        Self {
            min_years: min_years.min(max_years),
            max_years,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            min_years: 0,
            max_years: Self::MAX_YEARS,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min_years, self.max_years)
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid date range '{}'", s))?;
        let min = min.trim().parse().map_err(|_| format!("invalid date range '{}'", s))?;
        let max = max.trim().parse().map_err(|_| format!("invalid date range '{}'", s))?;
        Ok(DateRange::new(min, max))
    }
}

/// Complete explore state as encoded in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_term: String,
    /// Selection order is kept; duplicates are never stored
    pub types: Vec<MaterialType>,
    pub areas: Vec<Area>,
    pub sort_by: SortBy,
    pub date_range: DateRange,
    pub min_downloads: u64,
    pub only_free: bool,
    /// Zero-based
    pub page: u32,
    pub page_size: u32,
    pub view_mode: ViewMode,
    pub active_tab: Tab,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            types: Vec::new(),
            areas: Vec::new(),
            sort_by: SortBy::default(),
            date_range: DateRange::default(),
            min_downloads: 0,
            only_free: false,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            view_mode: ViewMode::default(),
            active_tab: Tab::default(),
        }
    }
}

impl FilterState {
    /// Whether any filter, search term or non-default sort is set.
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.trim().is_empty()
            || !self.types.is_empty()
            || !self.areas.is_empty()
            || self.sort_by != SortBy::Relevance
            || !self.date_range.is_default()
            || self.min_downloads > 0
            || self.only_free
    }

    /// The "all" tab without filters shows the curated sections.
    pub fn shows_curated_sections(&self) -> bool {
        self.active_tab == Tab::All && !self.has_active_filters()
    }

    pub fn toggle_type(&mut self, material_type: MaterialType) {
        toggle(&mut self.types, material_type);
    }

    pub fn toggle_area(&mut self, area: Area) {
        toggle(&mut self.areas, area);
    }

    /// Reset every filter field. Tab, view mode and page size survive.
    pub fn clear_filters(&mut self) {
        *self = FilterState {
            page_size: self.page_size,
            view_mode: self.view_mode,
            active_tab: self.active_tab,
            ..FilterState::default()
        };
    }

    /// Search payload for `GET /materials`.
    pub fn to_material_query(&self) -> MaterialQuery {
        let search = self.search_term.trim();
        MaterialQuery {
            page: self.page,
            size: self.page_size,
            search: (!search.is_empty()).then(|| search.to_string()),
            types: self.types.clone(),
            areas: self.areas.clone(),
            sort: self.sort_by.server_key().map(str::to_string),
            date_range: (!self.date_range.is_default()).then_some(self.date_range.max_years),
            min_downloads: (self.min_downloads > 0).then_some(self.min_downloads),
            only_free: self.only_free.then_some(true),
        }
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if let Some(pos) = items.iter().position(|x| *x == item) {
        items.remove(pos);
    } else {
        items.push(item);
    }
}
