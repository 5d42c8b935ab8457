//! Validation logic for parsed STL documents
//!
//! This module runs the checks that come after a successful parse. For every
//! facet, in file order:
//! - The facet is not degenerate (its vertices are not collinear or coincident)
//! - The vertices wind counterclockwise around the declared normal
//! - The declared normal is unit length (warning only)
//! - No vertex coordinate is negative
//!
//! and once per document:
//! - The `solid` and `endsolid` names agree (ASCII only)
//!
//! None of these checks is fatal: every facet is examined and every finding
//! is recorded, so a single run reports the complete set of defects.

mod geometry;
mod policy;

pub use geometry::validate_facet;
pub use policy::{validate_coordinates, validate_solid_names};

use crate::diagnostics::Diagnostics;
use crate::model::{StlDocument, ValidatorConfig};

/// Validate a parsed STL document
///
/// Findings are appended to `diagnostics`; their severity follows the
/// collector's tolerant-mode setting.
pub fn validate_document(
    document: &StlDocument,
    config: &ValidatorConfig,
    diagnostics: &mut Diagnostics,
) {
    let tolerances = config.tolerances();
    let before = diagnostics.len();

    for (index, facet) in document.facets.iter().enumerate() {
        validate_facet(index, facet, tolerances, diagnostics);
        validate_coordinates(index, facet, diagnostics);
    }
    validate_solid_names(document, diagnostics);

    tracing::debug!(
        facets = document.facets.len(),
        findings = diagnostics.len() - before,
        tolerant = config.tolerant(),
        "geometry validation finished"
    );
}
