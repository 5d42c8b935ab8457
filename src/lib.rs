//! # stl-validator
//!
//! A pass/fail validator for STL (Standard Tessellation Language) mesh files,
//! built to gate files entering a digital-preservation pipeline.
//!
//! Both encodings are supported: the keyword-delimited ASCII form and the
//! fixed 50-byte-per-facet binary form. Validation reports every defect it
//! finds, not just the first one.
//!
//! ## Pipeline
//!
//! 1. [`sniffer`] decides ASCII vs. binary from the raw bytes
//! 2. [`parser`] builds an [`StlDocument`] (grammar and layout errors are fatal)
//! 3. [`validator`] recomputes every facet normal and checks winding order,
//!    degeneracy, naming and coordinate range
//! 4. [`diagnostics`] grades every finding, applying tolerant mode
//! 5. [`report`] turns the findings into a verdict and an exit status
//!
//! ## Example
//!
//! ```no_run
//! use stl_validator::{ValidatorConfig, validate_file};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ValidatorConfig::new().with_tolerant(true);
//! let result = validate_file("model.stl", &config)?;
//!
//! for diagnostic in result.errors() {
//!     println!("{}", diagnostic);
//! }
//! std::process::exit(result.exit_code());
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod diagnostics;
pub mod error;
pub mod mesh_ops;
pub mod model;
pub mod parser;
pub mod report;
pub mod sniffer;
pub mod validator;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Location, Severity};
pub use error::{Error, FormatError, Result};
pub use model::{Facet, Normal, StlDocument, StlFormat, Tolerances, ValidatorConfig, Vertex};
pub use report::{EventOutcome, OutputFormat, ReportOptions, ValidationResult};

use std::path::Path;

/// Validate STL content held in memory
///
/// Never fails: every problem with the content, including an unrecognized
/// format, is reported as a diagnostic in the returned result.
///
/// # Example
///
/// ```
/// use stl_validator::{ValidatorConfig, validate_bytes};
///
/// let stl = b"solid empty\nendsolid empty\n";
/// let result = validate_bytes(stl, &ValidatorConfig::new());
/// assert!(result.passed());
/// assert_eq!(result.exit_code(), 0);
/// ```
pub fn validate_bytes(bytes: &[u8], config: &ValidatorConfig) -> ValidationResult {
    let mut diagnostics = Diagnostics::new(config.tolerant());

    let format = match sniffer::detect_format(bytes) {
        Ok(format) => format,
        Err(error) => {
            tracing::debug!(%error, "format detection failed");
            diagnostics.report_fatal(&error, Location::Document);
            return ValidationResult::new(None, 0, diagnostics);
        }
    };

    let Some(document) = parser::parse_document(bytes, format, &mut diagnostics) else {
        // Only a binary file whose header starts with `solid` has a mismatch here
        if let Some(error) = sniffer::count_mismatch(bytes) {
            diagnostics.report_fatal(&error, Location::Document);
        }
        return ValidationResult::new(Some(format), 0, diagnostics);
    };

    validator::validate_document(&document, config, &mut diagnostics);
    ValidationResult::new(Some(format), document.facet_count(), diagnostics)
}

/// Validate the STL file at `path`
///
/// The file is read into memory once and then validated with
/// [`validate_bytes`].
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the path does not exist and
/// [`Error::Io`] if it cannot be read. Problems with the file's content are
/// never errors; they are reported in the [`ValidationResult`].
pub fn validate_file<P: AsRef<Path>>(
    path: P,
    config: &ValidatorConfig,
) -> Result<ValidationResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;

    tracing::debug!(path = %path.display(), size = bytes.len(), "read input file");
    Ok(validate_bytes(&bytes, config))
}
