use serde::{Deserialize, Serialize};

use super::deserialize_nullable;

/// Server pagination envelope, consumed verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "deserialize_nullable")]
    pub content: Vec<T>,
    /// Zero-based page index
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub empty: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            number: 0,
            total_pages: 0,
            total_elements: 0,
            size: 0,
            first: true,
            last: true,
            empty: true,
        }
    }
}

/// Pagination shown to the user. Always taken from the most recent server
/// page, never computed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub size: u32,
}

impl PaginationInfo {
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            current_page: page.number,
            total_pages: page.total_pages,
            total_elements: page.total_elements,
            size: page.size,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 0
    }
}
