//! Binary STL decoder
//!
//! ```text
//! UINT8[80]    – Header (opaque comment)
//! UINT32       – Number of facets
//! foreach facet
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (expected to be 0)
//! end
//! ```

use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::error::FormatError;
use crate::model::{Facet, Normal, StlDocument, Vertex};
use crate::sniffer::{
    COUNT_SIZE, FACET_RECORD_SIZE, HEADER_SIZE, declared_facet_count, expected_binary_size,
};

const FIELDS: [&str; 12] = [
    "normal x component",
    "normal y component",
    "normal z component",
    "vertex 1 x coordinate",
    "vertex 1 y coordinate",
    "vertex 1 z coordinate",
    "vertex 2 x coordinate",
    "vertex 2 y coordinate",
    "vertex 2 z coordinate",
    "vertex 3 x coordinate",
    "vertex 3 y coordinate",
    "vertex 3 z coordinate",
];

/// Decode a binary STL document
///
/// The format sniffer has normally verified the size equation already; it is
/// checked again here so the decoder is safe on any input. Returns `None` when
/// a fatal finding (truncation, size mismatch, non-finite value) was recorded.
pub fn parse_binary(bytes: &[u8], diagnostics: &mut Diagnostics) -> Option<StlDocument> {
    let Some(declared) = declared_facet_count(bytes) else {
        diagnostics.report_fatal(
            &FormatError::TruncatedHeader { size: bytes.len() },
            Location::Document,
        );
        return None;
    };

    let records = &bytes[HEADER_SIZE + COUNT_SIZE..];
    let declared_len = declared as usize;
    let mut document = StlDocument::binary(bytes[..HEADER_SIZE].to_vec());
    document
        .facets
        .reserve(declared_len.min(records.len() / FACET_RECORD_SIZE));

    let mut faults = 0;
    for index in 0..declared_len {
        let start = index * FACET_RECORD_SIZE;
        let Some(record) = records.get(start..start + FACET_RECORD_SIZE) else {
            diagnostics.report_fatal(
                &FormatError::Truncated {
                    facet: index,
                    needed: FACET_RECORD_SIZE,
                    available: records.len().saturating_sub(start),
                },
                Location::facet(index, None),
            );
            faults += 1;
            break;
        };

        match decode_record(record) {
            Ok((facet, attribute_bytes)) => {
                if attribute_bytes != 0 {
                    diagnostics.report(
                        DiagnosticKind::AttributeBytes,
                        Location::facet(index, None),
                        format!(
                            "Attribute byte count is {}, expected 0 for standard STL",
                            attribute_bytes
                        ),
                    );
                }
                document.facets.push(facet);
            }
            Err(error) => {
                diagnostics.report_fatal(&error, Location::facet(index, None));
                faults += 1;
            }
        }
    }

    if faults == 0 && expected_binary_size(declared) != bytes.len() as u64 {
        diagnostics.report_fatal(
            &FormatError::CountMismatch {
                declared,
                expected_size: expected_binary_size(declared),
                actual_size: bytes.len(),
            },
            Location::Document,
        );
        faults += 1;
    }

    if faults > 0 {
        tracing::debug!(faults, "binary layout violated");
        return None;
    }

    tracing::debug!(
        facets = declared,
        header = %document.header_comment().unwrap_or_default(),
        "decoded binary solid"
    );
    Some(document)
}

/// Decode one 50-byte record into a facet and its attribute byte count
fn decode_record(record: &[u8]) -> Result<(Facet, u16), FormatError> {
    let mut values = [0.0f64; 12];
    for (slot, (value, field)) in values.iter_mut().zip(FIELDS).enumerate() {
        let raw = read_f32(record, slot * 4);
        if !raw.is_finite() {
            return Err(FormatError::invalid_number(field, &raw.to_string()));
        }
        *value = f64::from(raw);
    }

    let attribute_bytes = u16::from_le_bytes([record[48], record[49]]);
    let vertex = |i: usize| Vertex::new(values[i], values[i + 1], values[i + 2]);
    let facet = Facet::new(
        Normal::new(values[0], values[1], values[2]),
        [vertex(3), vertex(6), vertex(9)],
    );
    Ok((facet, attribute_bytes))
}

fn read_f32(buf: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}
