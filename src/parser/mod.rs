//! Parsers for the two STL encodings
//!
//! Both parsers produce the same [`StlDocument`] shape, so everything after
//! parsing is format-agnostic. Non-fatal findings (attribute bytes, an unnamed
//! solid) and fatal structural findings are recorded in the shared
//! [`Diagnostics`] collector. A parser returns `None` when it recorded at least
//! one fatal finding; the pipeline then stops.

pub mod ascii;
pub mod binary;

use crate::diagnostics::Diagnostics;
use crate::model::{StlDocument, StlFormat};

pub use ascii::parse_ascii;
pub use binary::parse_binary;

/// Parse `bytes` with the parser for `format`
///
/// Returns `None` if a fatal finding was recorded.
pub fn parse_document(
    bytes: &[u8],
    format: StlFormat,
    diagnostics: &mut Diagnostics,
) -> Option<StlDocument> {
    match format {
        StlFormat::Ascii => parse_ascii(bytes, diagnostics),
        StlFormat::Binary => parse_binary(bytes, diagnostics),
    }
}
