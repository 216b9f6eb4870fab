//! Plain-text rendering of places and toys

use mctoy_core::{Catalog, PlaceRecord, SearchSummary, Toy};
use std::fmt::Write;

/// One place, with toy names resolved against the catalog
pub fn format_place(place: &PlaceRecord, catalog: &Catalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", place.display_name, place.place_id);
    let _ = writeln!(out, "  {}", place.address);
    let _ = write!(
        out,
        "  ({:.5}, {:.5})",
        place.coordinates.lat, place.coordinates.lng
    );
    if let Some(rating) = place.rating {
        let _ = write!(out, "  rating {:.1}", rating);
    }
    out.push('\n');

    if place.toys.is_empty() {
        out.push_str("  toys: none\n");
    } else {
        let names: Vec<&str> = place
            .toys
            .iter()
            .map(|toy| catalog.display_name(toy))
            .collect();
        let _ = writeln!(out, "  toys: {}", names.join(", "));
    }
    out
}

/// A list of places, or a note when there are none
pub fn format_places<'a>(
    places: impl IntoIterator<Item = &'a PlaceRecord>,
    catalog: &Catalog,
) -> String {
    let rendered: Vec<String> = places
        .into_iter()
        .map(|place| format_place(place, catalog))
        .collect();
    if rendered.is_empty() {
        "No locations.\n".to_string()
    } else {
        rendered.join("\n")
    }
}

/// Result line of a search
pub fn format_summary(summary: &SearchSummary) -> String {
    format!(
        "Found {} nearby ({} new) around ({:.4}, {:.4}); {} known in total.\n",
        summary.discovered, summary.added, summary.center.lat, summary.center.lng, summary.total
    )
}

/// One catalog entry
pub fn format_toy(toy: &Toy) -> String {
    match &toy.hover_image_ref {
        Some(hover) => format!("{}\n  {}\n  {}\n", toy.name, toy.idle_image_ref, hover),
        None => format!("{}\n  {}\n", toy.name, toy.idle_image_ref),
    }
}
