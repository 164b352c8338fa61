//! View models for the bike listing.
//!
//! A [`ListViewModel`] is computed from [`ListState`] and holds only
//! display-ready data: the search box text, the three filter controls with
//! their options, what the results area should show and the pagination strip.
//! Renderers never look at the state directly.

use crate::app::ListState;
use crate::domain::{
    is_valid_image_url, Bike, BikeStatus, BikeType, FilterKind, QueryState, SortOrder,
};

pub const TITLE: &str = "Explore Our Bikes";
pub const SEARCH_PLACEHOLDER: &str = "Search by name, brand, type, or features...";

/// Pages shown on each side of the current one before an ellipsis.
pub const PAGE_WINDOW_DELTA: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewModel {
    pub title: &'static str,
    pub search: SearchBoxView,
    pub filters: Vec<FilterControl>,
    /// Whether "Clear Filters" is offered.
    pub show_clear_filters: bool,
    pub body: ListBody,
    /// Absent when everything fits on one page.
    pub pagination: Option<PaginationView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBoxView {
    pub text: String,
    pub placeholder: &'static str,
}

/// One dropdown: its caption and the options, with the current one marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    pub kind: FilterKind,
    pub caption: &'static str,
    pub options: Vec<FilterOption>,
}

impl FilterControl {
    #[must_use]
    pub fn selected(&self) -> Option<&FilterOption> {
        self.options.iter().find(|o| o.selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Wire value; empty for the "all" entry.
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    /// A fetch is in flight. `initial` is true when no bikes are on screen,
    /// which gets the full loading screen.
    Loading { initial: bool },

    /// The load failed and there is nothing else to show.
    Failed { message: String },

    /// The query matched no bikes.
    Empty,

    Results {
        header: String,
        cards: Vec<BikeCard>,
        /// A failed reload while older results stay on screen.
        error: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BikeCard {
    pub name: String,
    pub brand: Option<String>,
    pub bike_type: Option<String>,
    pub status: Option<String>,
    pub price_per_hour: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub current: u32,
    pub total: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub items: Vec<PageItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: u32, current: bool },
    Ellipsis,
}

impl ListViewModel {
    /// Builds the view for `state`, with `search_text` as typed so far and
    /// `api_base` used to resolve relative image paths.
    #[must_use]
    pub fn build(state: &ListState, search_text: &str, api_base: &str) -> Self {
        let query = &state.query;
        let total = state.total_pages();

        Self {
            title: TITLE,
            search: SearchBoxView {
                text: search_text.to_string(),
                placeholder: SEARCH_PLACEHOLDER,
            },
            filters: filter_controls(query),
            show_clear_filters: query.has_active_filters(),
            body: body(state, api_base),
            pagination: (total > 1).then(|| PaginationView {
                current: query.page,
                total,
                has_previous: query.page > 1,
                has_next: query.page < total,
                items: page_window(query.page, total),
            }),
        }
    }
}

fn body(state: &ListState, api_base: &str) -> ListBody {
    let items = &state.page_data.items;

    if items.is_empty() {
        if state.loading {
            return ListBody::Loading { initial: true };
        }
        if let Some(message) = state.error_message() {
            return ListBody::Failed { message };
        }
        if state.latest_seq == 0 {
            return ListBody::Loading { initial: true };
        }
        return ListBody::Empty;
    }

    if state.loading {
        return ListBody::Loading { initial: false };
    }

    ListBody::Results {
        header: results_header(items.len()),
        cards: items.iter().map(|bike| card(bike, api_base)).collect(),
        error: state.error_message(),
    }
}

/// `"1 Bike Found"`, `"5 Bikes Found"`.
#[must_use]
pub fn results_header(count: usize) -> String {
    let noun = if count == 1 { "Bike" } else { "Bikes" };
    format!("{count} {noun} Found")
}

fn card(bike: &Bike, api_base: &str) -> BikeCard {
    let status = bike.status.as_deref().map(|raw| {
        raw.parse::<BikeStatus>()
            .map_or_else(|_| raw.to_string(), |s| s.label().to_string())
    });
    let bike_type = bike.bike_type.as_deref().map(|raw| {
        raw.parse::<BikeType>()
            .map_or_else(|_| raw.to_string(), |t| t.label().to_string())
    });

    BikeCard {
        name: bike.name.clone(),
        brand: bike.brand.clone(),
        bike_type,
        status,
        price_per_hour: bike.price_label(),
        image_url: bike.image_url(api_base).filter(|u| is_valid_image_url(u)),
    }
}

fn filter_controls(query: &QueryState) -> Vec<FilterControl> {
    vec![
        control(FilterKind::Type, "Bike Type", "All Types", BikeType::ALL, query.type_filter),
        control(FilterKind::Status, "Status", "All Status", BikeStatus::ALL, query.status_filter),
        control(FilterKind::Sort, "Sort By", "Sort By", SortOrder::ALL, query.sort_by),
    ]
}

trait Choice: Copy + PartialEq {
    fn wire(self) -> &'static str;
    fn text(self) -> &'static str;
}

macro_rules! impl_choice {
    ($($ty:ty),*) => {
        $(impl Choice for $ty {
            fn wire(self) -> &'static str { self.as_str() }
            fn text(self) -> &'static str { self.label() }
        })*
    };
}

impl_choice!(BikeType, BikeStatus, SortOrder);

fn control<T: Choice>(
    kind: FilterKind,
    caption: &'static str,
    all_label: &'static str,
    values: &[T],
    current: Option<T>,
) -> FilterControl {
    let mut options = Vec::with_capacity(values.len() + 1);
    options.push(FilterOption {
        value: "",
        label: all_label,
        selected: current.is_none(),
    });
    options.extend(values.iter().map(|v| FilterOption {
        value: v.wire(),
        label: v.text(),
        selected: current == Some(*v),
    }));
    FilterControl {
        kind,
        caption,
        options,
    }
}

/// Page buttons around `current`: always the first and last page, up to
/// [`PAGE_WINDOW_DELTA`] neighbours on each side, and an ellipsis for each gap.
///
/// Empty when `total <= 1`.
///
/// # Examples
///
/// ```
/// use bike_rental::ui::viewmodel::{page_window, PageItem};
///
/// let labels: Vec<String> = page_window(6, 10)
///     .into_iter()
///     .map(|item| match item {
///         PageItem::Page { number, .. } => number.to_string(),
///         PageItem::Ellipsis => "...".to_string(),
///     })
///     .collect();
/// assert_eq!(labels, ["1", "...", "4", "5", "6", "7", "8", "...", "10"]);
/// ```
#[must_use]
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    if total <= 1 {
        return Vec::new();
    }

    let page = |number: u32| PageItem::Page {
        number,
        current: number == current,
    };

    let start = current.saturating_sub(PAGE_WINDOW_DELTA).max(2);
    let end = current.saturating_add(PAGE_WINDOW_DELTA).min(total - 1);

    let mut items = vec![page(1)];
    if current.saturating_sub(PAGE_WINDOW_DELTA) > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(page));
    if current.saturating_add(PAGE_WINDOW_DELTA) < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(page(total));
    items
}
