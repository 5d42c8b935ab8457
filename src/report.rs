//! Validation verdicts and their presentation
//!
//! A [`ValidationResult`] is produced once per file and never mutated. It
//! derives the pass/fail verdict and exit status from its diagnostics and
//! renders them either as text lines or as a JSON event-outcome record for
//! preservation pipelines.

use crate::diagnostics::{Diagnostic, Diagnostics, Severity};
use crate::error::Result;
use crate::model::StlFormat;
use serde::Serialize;

/// Exit status for a file that passed
pub const SUCCESS_CODE: i32 = 0;

/// Exit status for a file that failed or could not be read
pub const ERROR_CODE: i32 = 1;

/// How a report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per diagnostic plus a summary line
    #[default]
    Text,
    /// A single JSON event-outcome object
    Json,
}

/// Presentation settings for the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    show_warnings: bool,
    format: OutputFormat,
}

impl ReportOptions {
    /// Errors only, as text
    pub fn new() -> Self {
        Self::default()
    }

    /// Include warning-severity diagnostics in the output
    pub fn with_warnings(mut self, show_warnings: bool) -> Self {
        self.show_warnings = show_warnings;
        self
    }

    /// Choose the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Whether warnings are shown
    pub fn show_warnings(&self) -> bool {
        self.show_warnings
    }

    /// The output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Outcome of validating one file
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    format: Option<StlFormat>,
    facet_count: usize,
    fatal: bool,
    diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Build a result from the collector at the end of the pipeline
    pub fn new(format: Option<StlFormat>, facet_count: usize, diagnostics: Diagnostics) -> Self {
        let fatal = diagnostics.has_fatal();
        Self {
            format,
            facet_count,
            fatal,
            diagnostics: diagnostics.into_vec(),
        }
    }

    /// True when no error-severity diagnostic remains
    pub fn passed(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Process exit status: 0 when passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            SUCCESS_CODE
        } else {
            ERROR_CODE
        }
    }

    /// Detected encoding, or `None` if the format was not recognized
    pub fn format(&self) -> Option<StlFormat> {
        self.format
    }

    /// Number of facets that reached the geometry checks
    pub fn facet_count(&self) -> usize {
        self.facet_count
    }

    /// Whether a fatal finding stopped the pipeline early
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// All diagnostics in the order they were found
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Error-severity diagnostics
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Warning-severity diagnostics, including downgraded errors
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Number of error-severity diagnostics
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of warning-severity diagnostics
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Diagnostics to show: everything, or errors only
    pub fn visible(&self, show_warnings: bool) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| show_warnings || d.is_error())
    }

    /// Render the report for `target` (usually the file path)
    pub fn render(&self, target: &str, options: &ReportOptions) -> Result<String> {
        match options.format() {
            OutputFormat::Text => Ok(self.render_text(target, options.show_warnings())),
            OutputFormat::Json => {
                let outcome = self.event_outcome(target, options.show_warnings());
                Ok(serde_json::to_string(&outcome)?)
            }
        }
    }

    /// Line-oriented report: one line per visible diagnostic, then a summary
    pub fn render_text(&self, target: &str, show_warnings: bool) -> String {
        let mut out = String::new();
        for diagnostic in self.visible(show_warnings) {
            out.push_str(&diagnostic.to_string());
            out.push('\n');
        }
        out.push_str(&format!(
            "{}: {} (format: {}, facets: {}, errors: {}, warnings: {})\n",
            target,
            if self.passed() { "PASS" } else { "FAIL" },
            self.format.map(|f| f.as_str()).unwrap_or("unknown"),
            self.facet_count,
            self.error_count(),
            self.warning_count()
        ));
        out
    }

    /// Event-outcome record in the shape preservation pipelines consume
    pub fn event_outcome(&self, target: &str, show_warnings: bool) -> EventOutcome<'_> {
        let counts = format!(
            "errors: {}, warnings: {}",
            self.error_count(),
            self.warning_count()
        );

        if self.passed() {
            EventOutcome {
                event_outcome_information: "pass",
                event_outcome_detail_note: format_detail_note(self.format, &counts),
                stdout: Some(format!("{} validates.", target)),
                diagnostics: self.visible(show_warnings).collect(),
            }
        } else {
            let first = self
                .errors()
                .next()
                .map(|d| format!(", first error on {}: {}", d.location, d.message))
                .unwrap_or_default();
            EventOutcome {
                event_outcome_information: "fail",
                event_outcome_detail_note: format!(
                    "STL file validation failed, {}{}",
                    counts, first
                ),
                stdout: None,
                diagnostics: self.visible(show_warnings).collect(),
            }
        }
    }
}

fn format_detail_note(format: Option<StlFormat>, result: &str) -> String {
    let mut note = "format=\"STL\";".to_string();
    if let Some(format) = format {
        note.push_str(&format!(" version=\"{}\";", format));
    }
    note.push_str(&format!(" result=\"{}\"", result));
    note
}

/// JSON event-outcome record
///
/// Serializes as an object with the keys `eventOutcomeInformation` (`"pass"`
/// or `"fail"`), `eventOutcomeDetailNote`, `stdout` and `diagnostics`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOutcome<'a> {
    /// `"pass"` or `"fail"`
    pub event_outcome_information: &'static str,
    /// Format, version and counts on success; failure summary otherwise
    pub event_outcome_detail_note: String,
    /// `"<target> validates."` on success, `null` on failure
    pub stdout: Option<String>,
    /// Visible diagnostics
    pub diagnostics: Vec<&'a Diagnostic>,
}

impl EventOutcome<'static> {
    /// Failure record for a file that could not be validated at all
    pub fn failure(note: impl Into<String>) -> Self {
        EventOutcome {
            event_outcome_information: "fail",
            event_outcome_detail_note: note.into(),
            stdout: None,
            diagnostics: Vec::new(),
        }
    }
}
