//! Error types for STL validation
//!
//! Two kinds of errors live here:
//!
//! - [`Error`] is returned by the library when validation cannot even start,
//!   for example because the file does not exist. These are not findings about
//!   the STL content.
//! - [`FormatError`] describes a fatal finding about the content itself (an
//!   unrecognized format, a grammar violation, a truncated record). It never
//!   escapes the library as an `Err`: its `Display` output becomes the message
//!   of a fatal diagnostic in the [`ValidationResult`](crate::ValidationResult).
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O errors
//! - **E2xxx**: Format and structure errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error reading file
//! - `E1002`: File not found
//! - `E1003`: Report serialization error
//! - `E2001`: Unrecognized format (neither ASCII nor binary STL)
//! - `E2002`: Binary facet count disagrees with file size
//! - `E2003`: Unexpected token in ASCII grammar
//! - `E2004`: Unexpected end of file
//! - `E2005`: Invalid or non-finite number
//! - `E2006`: Facet loop without exactly three vertices
//! - `E2007`: Content after `endsolid`
//! - `E2008`: Truncated binary record
//! - `E2009`: Text is not valid UTF-8
//! - `E2010`: Binary header shorter than 84 bytes

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for STL validation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that prevent validation from running at all
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading the file
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - Insufficient permissions
    /// - Path is a directory
    /// - Disk read error
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file to validate does not exist
    ///
    /// **Error Code**: E1002
    #[error("[E1002] File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The JSON report could not be serialized
    ///
    /// **Error Code**: E1003
    #[error("[E1003] Report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal findings about the content of an STL file
///
/// Every variant is rendered into a Structural or Unrecognized-format
/// diagnostic. Once one of these is found the pipeline stops before the
/// geometry checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The bytes are neither a size-consistent binary STL nor text starting with `solid`
    ///
    /// **Error Code**: E2001
    ///
    /// **Suggestions**:
    /// - ASCII files must start with the keyword `solid`
    /// - Binary files must be exactly `84 + 50 * count` bytes long
    #[error(
        "[E2001] Unrecognized format: {size} bytes are neither an ASCII STL \
         (must start with 'solid') nor a binary STL (size must be 84 + 50 * facet count)"
    )]
    Unrecognized {
        /// Total size of the input in bytes
        size: usize,
    },

    /// A binary header declares a facet count the file size cannot hold
    ///
    /// **Error Code**: E2002
    #[error(
        "[E2002] Facet count mismatch: header declares {declared} facets \
         ({expected_size} bytes) but the file is {actual_size} bytes"
    )]
    CountMismatch {
        /// Facet count read from bytes 80..84
        declared: u32,
        /// File size implied by the declared count
        expected_size: u64,
        /// Actual file size
        actual_size: usize,
    },

    /// The ASCII grammar expected one token and found another
    ///
    /// **Error Code**: E2003
    #[error("[E2003] Expected '{expected}' but got '{found}'")]
    UnexpectedToken {
        /// What the grammar required at this point
        expected: String,
        /// The token actually present
        found: String,
    },

    /// The ASCII text ended in the middle of the grammar
    ///
    /// **Error Code**: E2004
    #[error("[E2004] Unexpected end of file, expected '{expected}'")]
    UnexpectedEof {
        /// What the grammar required at this point
        expected: String,
    },

    /// A numeric field did not hold a finite floating-point value
    ///
    /// **Error Code**: E2005
    ///
    /// **Suggestions**:
    /// - Use '.' as the decimal separator (e.g. "1.5", not "1,5")
    /// - NaN and infinity are not valid coordinates
    #[error(
        "[E2005] Invalid {field}: expected a finite floating-point number, got '{value}'"
    )]
    InvalidNumber {
        /// The field being parsed, e.g. "vertex y coordinate"
        field: String,
        /// The offending text (or the decoded value for binary records)
        value: String,
    },

    /// An `outer loop` held a vertex count other than three
    ///
    /// **Error Code**: E2006
    #[error("[E2006] Facet {facet} has {count} vertices, expected exactly 3")]
    VertexCount {
        /// Zero-based index of the offending facet
        facet: usize,
        /// Number of `vertex` lines found
        count: usize,
    },

    /// Tokens follow the closing `endsolid` line
    ///
    /// **Error Code**: E2007
    #[error("[E2007] Unexpected content after 'endsolid': '{found}'")]
    TrailingContent {
        /// First token after the solid
        found: String,
    },

    /// A binary record runs past the end of the buffer
    ///
    /// **Error Code**: E2008
    #[error(
        "[E2008] Binary facet {facet} is truncated: needs {needed} bytes, {available} available"
    )]
    Truncated {
        /// Zero-based index of the truncated record
        facet: usize,
        /// Bytes required for the record
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// ASCII input is not valid UTF-8
    ///
    /// **Error Code**: E2009
    #[error(
        "[E2009] Text is not valid UTF-8 (invalid byte sequence at offset {offset})"
    )]
    InvalidUtf8 {
        /// Byte offset of the first invalid sequence
        offset: usize,
    },

    /// A binary buffer too short to hold the header and facet count
    ///
    /// **Error Code**: E2010
    #[error("[E2010] Binary header is truncated: {size} bytes, need at least 84")]
    TruncatedHeader {
        /// Total size of the input in bytes
        size: usize,
    },
}

impl FormatError {
    /// Create an UnexpectedToken error
    ///
    /// # Example
    /// ```ignore
    /// FormatError::unexpected_token("endloop", "vertex")
    /// ```
    pub fn unexpected_token(expected: &str, found: &str) -> Self {
        FormatError::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Create an UnexpectedEof error
    pub fn unexpected_eof(expected: &str) -> Self {
        FormatError::UnexpectedEof {
            expected: expected.to_string(),
        }
    }

    /// Create an InvalidNumber error
    ///
    /// # Arguments
    /// * `field` - The field being parsed (e.g. "vertex x coordinate")
    /// * `value` - The value that failed to parse
    pub fn invalid_number(field: &str, value: &str) -> Self {
        FormatError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Whether this finding comes from format detection rather than a parser
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, FormatError::Unrecognized { .. })
    }
}
