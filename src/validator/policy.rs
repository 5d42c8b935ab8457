//! Preservation-policy checks that tolerant mode may relax

use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::model::{Facet, StlDocument, StlFormat};

/// Check that the `solid` and `endsolid` names agree (ASCII only)
///
/// A missing name compares as the empty string, so `solid cube` closed by a
/// bare `endsolid` is a mismatch.
pub fn validate_solid_names(document: &StlDocument, diagnostics: &mut Diagnostics) {
    if document.format != StlFormat::Ascii {
        return;
    }

    let solid = document.solid_name.as_deref().unwrap_or("");
    let end = document.end_solid_name.as_deref().unwrap_or("");
    if solid == end {
        return;
    }

    let location = document
        .end_solid_line
        .map(Location::line)
        .unwrap_or(Location::Document);
    diagnostics.report(
        DiagnosticKind::NamingMismatch,
        location,
        format!(
            "Expected '{}' but got '{}'",
            format!("endsolid {}", solid).trim_end(),
            format!("endsolid {}", end).trim_end()
        ),
    );
}

/// Check that no vertex of the facet has a negative coordinate
///
/// One diagnostic per facet, listing every offending vertex.
pub fn validate_coordinates(index: usize, facet: &Facet, diagnostics: &mut Diagnostics) {
    let offending: Vec<String> = facet
        .vertices
        .iter()
        .enumerate()
        .filter(|(_, v)| v.has_negative_coordinate())
        .map(|(i, v)| format!("vertex {} ({}, {}, {})", i + 1, v.x, v.y, v.z))
        .collect();

    if offending.is_empty() {
        return;
    }

    diagnostics.report(
        DiagnosticKind::NegativeCoordinate,
        Location::facet(index, facet.line),
        format!(
            "Vertex coordinates must not be negative: {}",
            offending.join(", ")
        ),
    );
}
