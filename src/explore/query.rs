//! Explore state ⇄ query string codec.
//!
//! Keys, in emitted order: `q`, `type`, `area`, `sort`, `years`, `min`,
//! `free`, `tab`, `page`, `size`, `view`. Filter keys are omitted at their
//! default; `tab`, `page`, `size` and `view` are always written. Decoding is
//! lenient: unknown or malformed values fall back to defaults and never
//! fail.

use std::borrow::Cow;

use tracing::trace;

use super::filters::{DateRange, FilterState, SortBy, Tab, ViewMode, DEFAULT_PAGE_SIZE};
use crate::models::{Area, MaterialType};

/// Serialize the full state. The result has no leading `?`.
pub fn encode(state: &FilterState) -> String {
    let mut pairs: Vec<(&str, Cow<'_, str>)> = Vec::with_capacity(11);

    let search = state.search_term.trim();
    if !search.is_empty() {
        pairs.push(("q", Cow::Borrowed(search)));
    }
    if !state.types.is_empty() {
        pairs.push(("type", Cow::Owned(join(state.types.iter().map(|t| t.as_str())))));
    }
    if !state.areas.is_empty() {
        pairs.push(("area", Cow::Owned(join(state.areas.iter().map(|a| a.as_str())))));
    }
    if state.sort_by != SortBy::Relevance {
        pairs.push(("sort", Cow::Borrowed(state.sort_by.as_str())));
    }
    if !state.date_range.is_default() {
        pairs.push(("years", Cow::Owned(state.date_range.to_string())));
    }
    if state.min_downloads > 0 {
        pairs.push(("min", Cow::Owned(state.min_downloads.to_string())));
    }
    if state.only_free {
        pairs.push(("free", Cow::Borrowed("true")));
    }
    pairs.push(("tab", Cow::Borrowed(state.active_tab.as_str())));
    pairs.push(("page", Cow::Owned(state.page.to_string())));
    pairs.push(("size", Cow::Owned(state.page_size.to_string())));
    pairs.push(("view", Cow::Borrowed(state.view_mode.as_str())));

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Parse a query string, with or without a leading `?`. Later duplicates
/// win.
pub fn decode(query: &str) -> FilterState {
    let mut state = FilterState::default();

    for pair in query.trim_start_matches('?').split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_component(raw);
        let value = value.trim();

        match key {
            "q" => state.search_term = value.to_string(),
            "type" => state.types = parse_list::<MaterialType>(value),
            "area" => state.areas = parse_list::<Area>(value),
            "sort" => state.sort_by = value.parse().unwrap_or_default(),
            "years" => state.date_range = value.parse().unwrap_or_default(),
            "min" => state.min_downloads = value.parse().unwrap_or(0),
            "free" => state.only_free = value == "true" || value == "1",
            "tab" => state.active_tab = value.parse().unwrap_or(Tab::All),
            "page" => state.page = value.parse().unwrap_or(0),
            "size" => {
                state.page_size = value
                    .parse()
                    .ok()
                    .filter(|size| *size > 0)
                    .unwrap_or(DEFAULT_PAGE_SIZE)
            }
            "view" => state.view_mode = value.parse().unwrap_or(ViewMode::Grid),
            other => trace!(key = other, "Ignoring unknown explore parameter"),
        }
    }

    state
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(",")
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(value) => value.into_owned(),
        Err(_) => spaced,
    }
}

/// Comma-separated values; unknown entries and duplicates are dropped.
fn parse_list<T>(value: &str) -> Vec<T>
where
    T: std::str::FromStr + PartialEq,
{
    let mut items = Vec::new();
    for part in value.split(',') {
        if let Ok(item) = part.trim().parse::<T>() {
            if !items.contains(&item) {
                items.push(item);
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_encoding() {
        assert_eq!(
            encode(&FilterState::default()),
            "tab=all&page=0&size=12&view=grid"
        );
    }

    #[test]
    fn test_full_state_encoding() {
        let state = FilterState {
            search_term: "redes neurais".to_string(),
            types: vec![MaterialType::Article, MaterialType::Thesis],
            areas: vec![Area::ComputerScience],
            sort_by: SortBy::Downloads,
            date_range: DateRange::new(1, 3),
            min_downloads: 50,
            only_free: true,
            page: 3,
            page_size: 24,
            view_mode: ViewMode::List,
            active_tab: Tab::All,
        };
        assert_eq!(
            encode(&state),
            "q=redes%20neurais&type=ARTICLE%2CTCC&area=COMPUTER_SCIENCE&sort=downloads\
             &years=1-3&min=50&free=true&tab=all&page=3&size=24&view=list"
        );
        assert_eq!(decode(&encode(&state)), state);
    }

    #[test]
    fn test_round_trip_unicode_and_reserved_characters() {
        let state = FilterState {
            search_term: "ética & direito = 100%".to_string(),
            ..FilterState::default()
        };
        assert_eq!(decode(&encode(&state)), state);
    }

    #[test]
    fn test_decode_mount_url() {
        let state = decode("?tab=trending&page=2&size=12");
        assert_eq!(state.active_tab, Tab::Trending);
        assert_eq!(state.page, 2);
        assert_eq!(state.page_size, 12);
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_decode_is_lenient() {
        let state = decode("type=ARTICLE,BOGUS,article&sort=popular&page=-1&size=0&view=cards&tab=x&utm=1&q=a+b");
        assert_eq!(state.types, vec![MaterialType::Article]);
        assert_eq!(state.sort_by, SortBy::Relevance);
        assert_eq!(state.page, 0);
        assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(state.view_mode, ViewMode::Grid);
        assert_eq!(state.active_tab, Tab::All);
        assert_eq!(state.search_term, "a b");
    }

    #[test]
    fn test_decode_accepts_legacy_thesis_value() {
        let state = decode("type=THESIS");
        assert_eq!(state.types, vec![MaterialType::Thesis]);
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(decode(""), FilterState::default());
        assert_eq!(decode("?"), FilterState::default());
    }
}
