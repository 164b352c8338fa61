//! Canonical listing query and its two serializations.
//!
//! A [`QueryState`] is written to the page URL (`search`, `type`, `status`,
//! `sort`, `page`, each omitted at its default) and to the backend query
//! (`search`, `bike_type`, `status`, `ordering`, `page`). Parsing the URL form
//! back yields the same state, which is what lets a reload or a shared link
//! restore the listing exactly.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

use super::bike::{BikeStatus, BikeType, SortOrder};
use super::error::{BikeRentalError, Result};

/// Characters left unescaped in query values (RFC 3986 unreserved set).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Search, filter, sort and page selection for the bike listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_term: String,
    pub type_filter: Option<BikeType>,
    pub status_filter: Option<BikeStatus>,
    pub sort_by: Option<SortOrder>,
    /// One-based page number, never zero.
    pub page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            type_filter: None,
            status_filter: None,
            sort_by: None,
            page: 1,
        }
    }
}

/// Which filter control a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Type,
    Status,
    Sort,
}

impl std::str::FromStr for FilterKind {
    type Err = BikeRentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "type" => Ok(Self::Type),
            "status" => Ok(Self::Status),
            "sort" => Ok(Self::Sort),
            other => Err(BikeRentalError::Validation(format!("unknown filter kind '{other}'"))),
        }
    }
}

/// A new value for one filter control; `None` clears that filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Type(Option<BikeType>),
    Status(Option<BikeStatus>),
    Sort(Option<SortOrder>),
}

impl Filter {
    /// Builds a filter change from a control's raw value.
    ///
    /// The empty string selects "all" (no filter).
    ///
    /// # Errors
    ///
    /// Returns [`BikeRentalError::Validation`] if `value` is not one of the
    /// values the control offers.
    pub fn parse(kind: FilterKind, value: &str) -> Result<Self> {
        let value = value.trim();
        Ok(match kind {
            FilterKind::Type => Self::Type(parse_optional(value)?),
            FilterKind::Status => Self::Status(parse_optional(value)?),
            FilterKind::Sort => Self::Sort(parse_optional(value)?),
        })
    }

    #[must_use]
    pub const fn kind(&self) -> FilterKind {
        match self {
            Self::Type(_) => FilterKind::Type,
            Self::Status(_) => FilterKind::Status,
            Self::Sort(_) => FilterKind::Sort,
        }
    }
}

fn parse_optional<T>(value: &str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = BikeRentalError>,
{
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

impl QueryState {
    /// Parses the page URL's query string (with or without the leading `?`).
    ///
    /// Every field is optional. Values that are not part of a filter's
    /// vocabulary are dropped, and a missing, zero or non-numeric `page`
    /// falls back to 1. When a key repeats, the first occurrence wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use bike_rental::domain::{BikeType, QueryState};
    ///
    /// let state = QueryState::from_url_query("?type=City%20ride&page=3");
    /// assert_eq!(state.type_filter, Some(BikeType::CityRide));
    /// assert_eq!(state.page, 3);
    /// assert_eq!(state.to_url_query(), "type=City%20ride&page=3");
    /// ```
    #[must_use]
    pub fn from_url_query(query: &str) -> Self {
        let pairs = parse_query_string(query);
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let lenient = |key: &str, value: Option<&str>| -> Option<Filter> {
            let kind = match key {
                "type" => FilterKind::Type,
                "status" => FilterKind::Status,
                _ => FilterKind::Sort,
            };
            let value = value?;
            match Filter::parse(kind, value) {
                Ok(filter) => Some(filter),
                Err(e) => {
                    tracing::debug!(key = key, value = value, error = %e, "ignoring url parameter");
                    None
                }
            }
        };

        let mut state = Self {
            search_term: first("search").unwrap_or_default().to_string(),
            ..Self::default()
        };

        if let Some(Filter::Type(t)) = lenient("type", first("type")) {
            state.type_filter = t;
        }
        if let Some(Filter::Status(s)) = lenient("status", first("status")) {
            state.status_filter = s;
        }
        if let Some(Filter::Sort(s)) = lenient("sort", first("sort")) {
            state.sort_by = s;
        }

        state.page = first("page")
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        state
    }

    /// Serializes the state for the page URL, omitting default fields.
    ///
    /// Returns the query without a leading `?`; an all-default state is the
    /// empty string.
    #[must_use]
    pub fn to_url_query(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(5);
        if !self.search_term.is_empty() {
            pairs.push(("search", self.search_term.as_str()));
        }
        if let Some(t) = self.type_filter {
            pairs.push(("type", t.as_str()));
        }
        if let Some(s) = self.status_filter {
            pairs.push(("status", s.as_str()));
        }
        if let Some(s) = self.sort_by {
            pairs.push(("sort", s.as_str()));
        }
        let page = self.page.to_string();
        if self.page > 1 {
            pairs.push(("page", page.as_str()));
        }
        encode_pairs(pairs)
    }

    /// Parameters for the backend listing query.
    ///
    /// Empty fields are omitted; `page` is always present.
    #[must_use]
    pub fn api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(5);
        if !self.search_term.is_empty() {
            params.push(("search".to_string(), self.search_term.clone()));
        }
        if let Some(t) = self.type_filter {
            params.push(("bike_type".to_string(), t.as_str().to_string()));
        }
        if let Some(s) = self.status_filter {
            params.push(("status".to_string(), s.as_str().to_string()));
        }
        if let Some(s) = self.sort_by {
            params.push(("ordering".to_string(), s.as_str().to_string()));
        }
        params.push(("page".to_string(), self.page.to_string()));
        params
    }

    /// Whether any search, filter or sort is applied.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.is_empty()
            || self.type_filter.is_some()
            || self.status_filter.is_some()
            || self.sort_by.is_some()
    }

    /// Applies a filter change. Does not touch the page.
    pub fn apply_filter(&mut self, filter: Filter) {
        match filter {
            Filter::Type(t) => self.type_filter = t,
            Filter::Status(s) => self.status_filter = s,
            Filter::Sort(s) => self.sort_by = s,
        }
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self.to_url_query();
        if query.is_empty() {
            Ok(())
        } else {
            write!(f, "?{query}")
        }
    }
}

/// Splits a query string into decoded key/value pairs.
///
/// `+` is read as a space, as browsers do for form-encoded queries.
#[must_use]
pub fn parse_query_string(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// Joins pairs into a percent-encoded query string.
#[must_use]
pub fn encode_pairs<K, V, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k.as_ref(), QUERY_VALUE),
                utf8_percent_encode(v.as_ref(), QUERY_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
