//! Format detection for STL byte streams
//!
//! ASCII and binary STL share no magic bytes, and a binary header is free to
//! begin with the text `solid`. The binary size equation
//! `84 + 50 * count == file size` is therefore checked first and is
//! authoritative; the `solid` keyword is only consulted when it fails.

use crate::error::FormatError;
use crate::model::StlFormat;

/// Size of the opaque binary header
pub const HEADER_SIZE: usize = 80;

/// Size of the little-endian facet count that follows the header
pub const COUNT_SIZE: usize = 4;

/// Size of one binary facet record (normal + 3 vertices + attribute count)
pub const FACET_RECORD_SIZE: usize = 50;

/// File size a binary STL with `count` facets must have
pub fn expected_binary_size(count: u32) -> u64 {
    (HEADER_SIZE + COUNT_SIZE) as u64 + u64::from(count) * FACET_RECORD_SIZE as u64
}

/// Read the facet count at bytes 80..84, if the buffer is long enough
pub fn declared_facet_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + COUNT_SIZE)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Decide whether `bytes` hold a binary or an ASCII STL
///
/// # Errors
///
/// Returns [`FormatError::CountMismatch`] when the input is non-textual and
/// long enough to carry a binary header whose count disagrees with the size,
/// and [`FormatError::Unrecognized`] for anything else that is neither format.
///
/// # Example
///
/// ```
/// use stl_validator::sniffer::detect_format;
/// use stl_validator::StlFormat;
///
/// let text = b"solid cube\nendsolid cube\n";
/// assert_eq!(detect_format(text), Ok(StlFormat::Ascii));
///
/// let mut binary = vec![0u8; 84];
/// assert_eq!(detect_format(&binary), Ok(StlFormat::Binary));
/// binary.push(0);
/// assert!(detect_format(&binary).is_err());
/// ```
pub fn detect_format(bytes: &[u8]) -> Result<StlFormat, FormatError> {
    if let Some(count) = declared_facet_count(bytes) {
        if expected_binary_size(count) == bytes.len() as u64 {
            tracing::debug!(facets = count, "size equation holds, input is binary");
            return Ok(StlFormat::Binary);
        }
    }

    if starts_with_solid(bytes) {
        tracing::debug!("input begins with 'solid', treating input as ascii");
        return Ok(StlFormat::Ascii);
    }

    let unrecognized = FormatError::Unrecognized { size: bytes.len() };
    Err(count_mismatch(bytes).unwrap_or(unrecognized))
}

/// The binary size-equation failure for `bytes`, if they look binary
///
/// Returns [`FormatError::CountMismatch`] when the input is long enough to
/// carry a facet count, that count disagrees with the size, and the content
/// is not plausible text. Binary exporters often start the header with
/// `solid`, so this also explains a failed ASCII parse of such a file.
pub fn count_mismatch(bytes: &[u8]) -> Option<FormatError> {
    let declared = declared_facet_count(bytes)?;
    let expected_size = expected_binary_size(declared);
    if expected_size == bytes.len() as u64 || looks_like_text(bytes) {
        return None;
    }

    Some(FormatError::CountMismatch {
        declared,
        expected_size,
        actual_size: bytes.len(),
    })
}

/// Whether the content, after leading whitespace, begins with `solid` in any case
fn starts_with_solid(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..]
        .get(..5)
        .is_some_and(|keyword| keyword.eq_ignore_ascii_case(b"solid"))
}

/// Whether the bytes could plausibly be a text file
fn looks_like_text(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(text) => !text
            .chars()
            .any(|c| c.is_control() && !c.is_ascii_whitespace()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_with_count(declared: u32, actual: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes.extend_from_slice(&declared.to_le_bytes());
        bytes.resize(HEADER_SIZE + COUNT_SIZE + actual * FACET_RECORD_SIZE, 0);
        bytes
    }

    #[test]
    fn test_expected_binary_size() {
        assert_eq!(expected_binary_size(0), 84);
        assert_eq!(expected_binary_size(12), 684);
        let largest = 84 + 50 * u64::from(u32::MAX);
        assert_eq!(expected_binary_size(u32::MAX), largest);
    }

    #[test]
    fn test_binary_detected_by_size_equation() {
        let bytes = binary_with_count(3, 3);
        assert_eq!(detect_format(&bytes), Ok(StlFormat::Binary));
    }

    #[test]
    fn test_binary_header_starting_with_solid_is_still_binary() {
        let mut bytes = binary_with_count(1, 1);
        bytes[..10].copy_from_slice(b"solid part");
        assert_eq!(detect_format(&bytes), Ok(StlFormat::Binary));
    }

    #[test]
    fn test_ascii_detected_case_insensitively_after_whitespace() {
        let indented = b"  \n\tSOLID x\nendsolid x";
        assert_eq!(detect_format(indented), Ok(StlFormat::Ascii));
        assert_eq!(detect_format(b"solid"), Ok(StlFormat::Ascii));
    }

    #[test]
    fn test_binary_count_mismatch_reported() {
        let bytes = binary_with_count(5, 4);
        match detect_format(&bytes) {
            Err(FormatError::CountMismatch {
                declared,
                expected_size,
                actual_size,
            }) => {
                assert_eq!(declared, 5);
                assert_eq!(expected_size, 334);
                assert_eq!(actual_size, 284);
            }
            other => panic!("expected count mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_count_mismatch_behind_solid_header() {
        let mut bytes = binary_with_count(5, 4);
        bytes[..11].copy_from_slice(b"solid mould");
        // The keyword wins detection, but the size equation still explains it
        assert_eq!(detect_format(&bytes), Ok(StlFormat::Ascii));
        assert!(matches!(
            count_mismatch(&bytes),
            Some(FormatError::CountMismatch { declared: 5, .. })
        ));

        assert_eq!(count_mismatch(&binary_with_count(4, 4)), None);
        assert_eq!(count_mismatch(b"solid cube\nendsolid cube\n"), None);
    }

    #[test]
    fn test_unrecognized_inputs() {
        assert_eq!(
            detect_format(b""),
            Err(FormatError::Unrecognized { size: 0 })
        );
        assert_eq!(
            detect_format(b"sol"),
            Err(FormatError::Unrecognized { size: 3 })
        );
        let prose = "This is a plain text document that is long enough to hold an \
                     STL header but is not one.";
        assert!(prose.len() >= 84);
        assert!(matches!(
            detect_format(prose.as_bytes()),
            Err(FormatError::Unrecognized { .. })
        ));
    }
}
