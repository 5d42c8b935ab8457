//! Per-facet geometry checks

use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::mesh_ops;
use crate::model::{Facet, Tolerances};

/// Check one facet's degeneracy, winding order and declared normal length
///
/// A degenerate facet has no orientation, so the winding and length checks
/// are skipped for it.
pub fn validate_facet(
    index: usize,
    facet: &Facet,
    tolerances: &Tolerances,
    diagnostics: &mut Diagnostics,
) {
    let location = Location::facet(index, facet.line);

    let Some(computed) = mesh_ops::computed_normal(&facet.vertices, tolerances.collinear_epsilon)
    else {
        diagnostics.report(
            DiagnosticKind::DegenerateFacet,
            location,
            "Degenerate facet: vertices are collinear or coincident, \
             so the facet has no defined normal",
        );
        return;
    };

    let cosine = mesh_ops::winding_cosine(&facet.normal, &computed);
    if cosine <= tolerances.winding_epsilon {
        let n = &facet.normal;
        diagnostics.report(
            DiagnosticKind::WindingOrder,
            location,
            format!(
                "Winding order is not counterclockwise relative to the declared normal \
                 ({}, {}, {}); the vertices give normal ({:.6}, {:.6}, {:.6})",
                n.x, n.y, n.z, computed.x, computed.y, computed.z
            ),
        );
    }

    let magnitude = facet.normal.magnitude();
    if (magnitude - 1.0).abs() > tolerances.normal_magnitude_tolerance {
        diagnostics.report(
            DiagnosticKind::NonUnitNormal,
            location,
            format!("Declared normal has length {:.6}, expected 1", magnitude),
        );
    }
}
