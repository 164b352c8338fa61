//! Plain-text rendering of the listing view model.
//!
//! The output is line-oriented so it reads well in a terminal and in logs:
//! title, search box, filter selections, the results area, then pagination.

use std::fmt::Write as _;

use crate::ui::viewmodel::{BikeCard, ListBody, ListViewModel, PageItem, PaginationView};

/// Prints the view to stdout.
pub fn render(vm: &ListViewModel) {
    print!("{}", render_to_string(vm));
}

/// Renders the view into a string.
#[must_use]
pub fn render_to_string(vm: &ListViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", vm.title);
    let _ = writeln!(out, "{}", "=".repeat(vm.title.len()));

    if vm.search.text.is_empty() {
        let _ = writeln!(out, "Search: ({})", vm.search.placeholder);
    } else {
        let _ = writeln!(out, "Search: {}", vm.search.text);
    }

    let filters: Vec<String> = vm
        .filters
        .iter()
        .map(|control| {
            let label = control.selected().map_or("", |o| o.label);
            format!("{}: {label}", control.caption)
        })
        .collect();
    let _ = writeln!(out, "{}", filters.join(" | "));
    if vm.show_clear_filters {
        let _ = writeln!(out, "[Clear Filters]");
    }
    out.push('\n');

    render_body(&mut out, &vm.body);

    if let Some(pagination) = &vm.pagination {
        out.push('\n');
        let _ = writeln!(out, "{}", pagination_line(pagination));
    }

    out
}

fn render_body(out: &mut String, body: &ListBody) {
    match body {
        ListBody::Loading { initial: true } => {
            let _ = writeln!(out, "Loading Bikes");
            let _ = writeln!(out, "Finding the perfect rides for you...");
        }
        ListBody::Loading { initial: false } => {
            let _ = writeln!(out, "Loading results...");
        }
        ListBody::Failed { message } => {
            let _ = writeln!(out, "Oops!");
            let _ = writeln!(out, "{message}");
            let _ = writeln!(out, "[Try Again]");
        }
        ListBody::Empty => {
            let _ = writeln!(out, "No bikes found");
            let _ = writeln!(out, "Try adjusting your search or filters");
            let _ = writeln!(out, "[Clear All Filters]");
        }
        ListBody::Results {
            header,
            cards,
            error,
        } => {
            if let Some(error) = error {
                let _ = writeln!(out, "! {error}");
            }
            let _ = writeln!(out, "{header}");
            for card in cards {
                let _ = writeln!(out, "{}", card_line(card));
            }
        }
    }
}

fn card_line(card: &BikeCard) -> String {
    let mut line = format!("- {}", card.name);
    if let Some(brand) = &card.brand {
        let _ = write!(line, " ({brand})");
    }
    for part in [&card.bike_type, &card.status].into_iter().flatten() {
        let _ = write!(line, " | {part}");
    }
    if let Some(price) = &card.price_per_hour {
        let _ = write!(line, " | ${price}/hr");
    }
    line
}

fn pagination_line(p: &PaginationView) -> String {
    let mut parts = Vec::with_capacity(p.items.len() + 2);
    parts.push(if p.has_previous { "< Previous" } else { "  Previous" }.to_string());
    parts.extend(p.items.iter().map(|item| match item {
        PageItem::Page { number, current: true } => format!("[{number}]"),
        PageItem::Page { number, .. } => number.to_string(),
        PageItem::Ellipsis => "...".to_string(),
    }));
    parts.push(if p.has_next { "Next >" } else { "Next  " }.to_string());
    parts.join(" ")
}
