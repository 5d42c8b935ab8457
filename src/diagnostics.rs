//! Typed validation findings and the collector that accumulates them
//!
//! Every stage of the pipeline appends to a single [`Diagnostics`] sink.
//! Severity is decided here, not by the stage that found the problem: each
//! [`DiagnosticKind`] has a default severity, and in tolerant mode the
//! downgradable kinds are recorded as warnings instead of errors.

use crate::error::FormatError;
use serde::Serialize;
use std::fmt;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fails the file
    Error,
    /// Reported but never fails the file
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// The closed set of findings the validator can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Neither binary nor ASCII STL
    UnrecognizedFormat,
    /// Grammar violation, record truncation, count mismatch or bad number
    Structural,
    /// Collinear or coincident vertices
    DegenerateFacet,
    /// Vertices wound clockwise relative to the declared normal
    WindingOrder,
    /// `solid` and `endsolid` names differ
    NamingMismatch,
    /// A vertex coordinate is strictly negative
    NegativeCoordinate,
    /// Declared normal is not unit length
    NonUnitNormal,
    /// Binary record has a non-zero attribute byte count
    AttributeBytes,
    /// The `solid` line carries no name
    UnnamedSolid,
}

impl DiagnosticKind {
    /// Short identifier used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnrecognizedFormat => "unrecognized-format",
            DiagnosticKind::Structural => "structural",
            DiagnosticKind::DegenerateFacet => "degenerate-facet",
            DiagnosticKind::WindingOrder => "winding-order",
            DiagnosticKind::NamingMismatch => "naming-mismatch",
            DiagnosticKind::NegativeCoordinate => "negative-coordinate",
            DiagnosticKind::NonUnitNormal => "non-unit-normal",
            DiagnosticKind::AttributeBytes => "attribute-bytes",
            DiagnosticKind::UnnamedSolid => "unnamed-solid",
        }
    }

    /// Severity before any tolerant-mode downgrade
    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticKind::NonUnitNormal
            | DiagnosticKind::AttributeBytes
            | DiagnosticKind::UnnamedSolid => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether this finding stops the pipeline before geometry checks
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::UnrecognizedFormat | DiagnosticKind::Structural
        )
    }

    /// Whether tolerant mode turns this error into a warning
    pub fn is_downgradable(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::WindingOrder
                | DiagnosticKind::NamingMismatch
                | DiagnosticKind::NegativeCoordinate
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in the file a finding applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Location {
    /// The file as a whole
    Document,
    /// A 1-based line of an ASCII file
    Line {
        /// Line number
        line: usize,
    },
    /// A facet by zero-based index, with its ASCII line when known
    Facet {
        /// Facet index in file order
        index: usize,
        /// Line of the `facet` keyword (ASCII only)
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<usize>,
    },
}

impl Location {
    /// Location of a 1-based text line
    pub fn line(line: usize) -> Self {
        Location::Line { line }
    }

    /// Location of a facet
    pub fn facet(index: usize, line: Option<usize>) -> Self {
        Location::Facet { index, line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Document => f.write_str("document"),
            Location::Line { line } => write!(f, "line {}", line),
            Location::Facet {
                index,
                line: Some(line),
            } => write!(f, "facet {} (line {})", index, line),
            Location::Facet { index, line: None } => write!(f, "facet {}", index),
        }
    }
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Effective severity after tolerant-mode rules
    pub severity: Severity,
    /// What kind of problem this is
    pub kind: DiagnosticKind,
    /// Where it was found
    pub location: Location,
    /// Human-readable description
    pub message: String,
    /// True when tolerant mode turned an error into this warning
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub downgraded: bool,
}

impl Diagnostic {
    /// Whether this diagnostic fails the file
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.kind, self.location, self.message
        )?;
        if self.downgraded {
            f.write_str(" (tolerated)")?;
        }
        Ok(())
    }
}

/// Append-only sink for diagnostics, shared by every pipeline stage
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    tolerant: bool,
}

impl Diagnostics {
    /// Create an empty collector
    ///
    /// `tolerant` decides whether downgradable kinds are recorded as warnings.
    pub fn new(tolerant: bool) -> Self {
        Self {
            entries: Vec::new(),
            tolerant,
        }
    }

    /// Record a finding, applying the severity rules for its kind
    pub fn report(&mut self, kind: DiagnosticKind, location: Location, message: impl Into<String>) {
        let default = kind.default_severity();
        let downgraded = self.tolerant && default == Severity::Error && kind.is_downgradable();
        let severity = if downgraded {
            Severity::Warning
        } else {
            default
        };

        let diagnostic = Diagnostic {
            severity,
            kind,
            location,
            message: message.into(),
            downgraded,
        };
        tracing::trace!(%diagnostic, "diagnostic recorded");
        self.entries.push(diagnostic);
    }

    /// Record a fatal format finding
    ///
    /// Sniffer failures become [`DiagnosticKind::UnrecognizedFormat`], everything
    /// else [`DiagnosticKind::Structural`].
    pub fn report_fatal(&mut self, error: &FormatError, location: Location) {
        let kind = if error.is_unrecognized() {
            DiagnosticKind::UnrecognizedFormat
        } else {
            DiagnosticKind::Structural
        };
        self.report(kind, location, error.to_string());
    }

    /// Whether any fatal finding has been recorded
    pub fn has_fatal(&self) -> bool {
        self.entries.iter().any(|d| d.kind.is_fatal())
    }

    /// Number of error-severity findings
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_error()).count()
    }

    /// Number of warning-severity findings
    pub fn warning_count(&self) -> usize {
        self.entries.len() - self.error_count()
    }

    /// Number of findings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Findings in the order they were recorded
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Consume the collector, returning the findings in order
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
