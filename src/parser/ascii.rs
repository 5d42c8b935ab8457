//! ASCII STL parser
//!
//! Grammar (keywords are case-insensitive, any whitespace separates tokens):
//!
//! ```text
//! solid <name>?
//! ( facet normal nx ny nz
//!     outer loop
//!       vertex x y z      (exactly three)
//!     endloop
//!   endfacet
//! )*
//! endsolid <name>?
//! ```
//!
//! A grammar violation is fatal, but the parser does not stop at the first
//! one: it resynchronizes at the next `endfacet` (or `facet`/`endsolid`) so a
//! single run reports every broken facet. Name agreement between `solid` and
//! `endsolid` is not checked here.

use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::error::FormatError;
use crate::model::{Facet, Normal, StlDocument, Vertex};

const AXES: [&str; 3] = ["x", "y", "z"];

/// A fatal finding and the line it applies to
type Step<T> = std::result::Result<T, (FormatError, usize)>;

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    line: usize,
}

impl Token<'_> {
    fn is(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }
}

/// Parse an ASCII STL document
///
/// Returns `None` if the text is not valid UTF-8 or violates the grammar; the
/// reasons are recorded in `diagnostics` as structural errors.
///
/// # Example
///
/// ```
/// use stl_validator::diagnostics::Diagnostics;
/// use stl_validator::parser::parse_ascii;
///
/// let text = b"solid tri
///   facet normal 0 0 1
///     outer loop
///       vertex 0 0 0
///       vertex 1 0 0
///       vertex 0 1 0
///     endloop
///   endfacet
/// endsolid tri
/// ";
/// let mut diagnostics = Diagnostics::new(false);
/// let document = parse_ascii(text, &mut diagnostics).unwrap();
/// assert_eq!(document.facets.len(), 1);
/// assert_eq!(document.solid_name.as_deref(), Some("tri"));
/// ```
pub fn parse_ascii(bytes: &[u8], diagnostics: &mut Diagnostics) -> Option<StlDocument> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            let offset = e.valid_up_to();
            let line = bytes[..offset].iter().filter(|&&b| b == b'\n').count() + 1;
            diagnostics.report_fatal(&FormatError::InvalidUtf8 { offset }, Location::line(line));
            return None;
        }
    };

    AsciiParser::new(text, diagnostics).parse()
}

struct AsciiParser<'a, 'd> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    eof_line: usize,
    faults: usize,
    diagnostics: &'d mut Diagnostics,
}

impl<'a, 'd> AsciiParser<'a, 'd> {
    fn new(text: &'a str, diagnostics: &'d mut Diagnostics) -> Self {
        let mut tokens = Vec::new();
        let mut eof_line = 1;
        for (index, line) in text.lines().enumerate() {
            eof_line = index + 1;
            tokens.extend(line.split_whitespace().map(|text| Token {
                text,
                line: index + 1,
            }));
        }

        Self {
            tokens,
            pos: 0,
            eof_line,
            faults: 0,
            diagnostics,
        }
    }

    fn parse(mut self) -> Option<StlDocument> {
        let solid_line = match self.expect("solid") {
            Ok(line) => line,
            Err((error, line)) => {
                self.fault(error, line);
                return None;
            }
        };

        let solid_name = self.read_name(solid_line);
        if solid_name.is_none() {
            self.diagnostics.report(
                DiagnosticKind::UnnamedSolid,
                Location::line(solid_line),
                "Expected 'solid <name>' but the solid has no name",
            );
        }

        let mut document = StlDocument::ascii(solid_name);
        let mut index = 0;

        loop {
            let Some(token) = self.peek() else {
                self.fault(FormatError::unexpected_eof("endsolid"), self.eof_line);
                break;
            };

            if token.is("facet") {
                match self.parse_facet(index) {
                    Ok(facet) => document.facets.push(facet),
                    Err((error, line)) => {
                        self.fault(error, line);
                        self.recover();
                    }
                }
                index += 1;
            } else if token.is("endsolid") {
                self.pos += 1;
                document.end_solid_name = self.read_name(token.line);
                document.end_solid_line = Some(token.line);
                if let Some(extra) = self.peek() {
                    self.fault(
                        FormatError::TrailingContent {
                            found: extra.text.to_string(),
                        },
                        extra.line,
                    );
                }
                break;
            } else {
                self.fault(
                    FormatError::unexpected_token("facet' or 'endsolid", token.text),
                    token.line,
                );
                self.pos += 1;
                self.recover();
            }
        }

        if self.faults > 0 {
            tracing::debug!(faults = self.faults, "ascii grammar violated");
            return None;
        }

        tracing::debug!(
            facets = document.facets.len(),
            solid = document.solid_name.as_deref().unwrap_or(""),
            "parsed ascii solid"
        );
        Some(document)
    }

    fn parse_facet(&mut self, index: usize) -> Step<Facet> {
        let line = self.expect("facet")?;
        self.expect("normal")?;
        let [nx, ny, nz] = self.triple("normal", "component")?;

        self.expect("outer")?;
        self.expect("loop")?;

        let mut vertices = Vec::with_capacity(3);
        while self.peek().is_some_and(|token| token.is("vertex")) {
            self.pos += 1;
            let [x, y, z] = self.triple("vertex", "coordinate")?;
            vertices.push(Vertex::new(x, y, z));
        }

        self.expect("endloop")?;
        let vertices: [Vertex; 3] = vertices.try_into().map_err(|found: Vec<Vertex>| {
            (
                FormatError::VertexCount {
                    facet: index,
                    count: found.len(),
                },
                line,
            )
        })?;
        self.expect("endfacet")?;

        Ok(Facet::new(Normal::new(nx, ny, nz), vertices).with_line(line))
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn fault(&mut self, error: FormatError, line: usize) {
        self.diagnostics.report_fatal(&error, Location::line(line));
        self.faults += 1;
    }

    /// Consume `keyword`, leaving any other token in place
    fn expect(&mut self, keyword: &str) -> Step<usize> {
        match self.peek() {
            Some(token) if token.is(keyword) => {
                self.pos += 1;
                Ok(token.line)
            }
            Some(token) => Err((
                FormatError::unexpected_token(keyword, token.text),
                token.line,
            )),
            None => Err((FormatError::unexpected_eof(keyword), self.eof_line)),
        }
    }

    fn number(&mut self, field: &str) -> Step<f64> {
        match self.peek() {
            Some(token) => match token.text.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    self.pos += 1;
                    Ok(value)
                }
                _ => Err((FormatError::invalid_number(field, token.text), token.line)),
            },
            None => Err((FormatError::unexpected_eof(field), self.eof_line)),
        }
    }

    fn triple(&mut self, what: &str, part: &str) -> Step<[f64; 3]> {
        let mut values = [0.0; 3];
        for (value, axis) in values.iter_mut().zip(AXES) {
            *value = self.number(&format!("{} {} {}", what, axis, part))?;
        }
        Ok(values)
    }

    /// Collect the rest of `line` as a name, stopping at a structural keyword
    fn read_name(&mut self, line: usize) -> Option<String> {
        let mut parts = Vec::new();
        while let Some(token) = self.peek() {
            if token.line != line || token.is("facet") || token.is("endsolid") {
                break;
            }
            parts.push(token.text);
            self.pos += 1;
        }
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Skip past the rest of a broken facet
    fn recover(&mut self) {
        while let Some(token) = self.peek() {
            if token.is("facet") || token.is("endsolid") {
                return;
            }
            self.pos += 1;
            if token.is("endfacet") {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    const TRIANGLE: &str = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid tri
";

    fn parse(text: &str) -> (Option<StlDocument>, Diagnostics) {
        let mut diagnostics = Diagnostics::new(false);
        let document = parse_ascii(text.as_bytes(), &mut diagnostics);
        (document, diagnostics)
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_parse_single_facet() {
        let (document, diagnostics) = parse(TRIANGLE);
        let document = document.expect("triangle should parse");
        assert!(diagnostics.is_empty());
        assert_eq!(document.solid_name.as_deref(), Some("tri"));
        assert_eq!(document.end_solid_name.as_deref(), Some("tri"));
        assert_eq!(document.end_solid_line, Some(9));
        assert_eq!(document.facets.len(), 1);

        let facet = &document.facets[0];
        assert_eq!(facet.line, Some(2));
        assert_eq!(facet.normal, Normal::new(0.0, 0.0, 1.0));
        assert_eq!(facet.vertices[1], Vertex::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let (document, diagnostics) = parse(&TRIANGLE.to_uppercase());
        let document = document.expect("uppercase keywords should parse");
        assert!(diagnostics.is_empty());
        assert_eq!(document.solid_name.as_deref(), Some("TRI"));
    }

    #[test]
    fn test_free_whitespace_on_one_line() {
        let text = "solid facet normal 0 0 1 outer loop vertex 0 0 0 vertex 1 0 0 \
                    vertex 0 1 0 endloop endfacet endsolid";
        let (document, diagnostics) = parse(text);
        let document = document.expect("single-line solid should parse");
        assert_eq!(document.facets.len(), 1);
        assert_eq!(document.solid_name, None);
        assert_eq!(document.end_solid_name, None);
        // Only the unnamed-solid warning
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_multi_word_names_and_scientific_notation() {
        let text = "solid my part v2\n\
                    facet normal 0.000000e+00 -1.000000E+00 0\n\
                    outer loop\n\
                    vertex 1.5e1 0 0\n\
                    vertex 0 0 .5\n\
                    vertex 1 0 1.\n\
                    endloop\n\
                    endfacet\n\
                    endsolid   my   part   v2\n";
        let (document, _) = parse(text);
        let document = document.expect("should parse");
        assert_eq!(document.solid_name.as_deref(), Some("my part v2"));
        assert_eq!(document.end_solid_name.as_deref(), Some("my part v2"));
        assert_eq!(document.facets[0].vertices[0].x, 15.0);
        assert_eq!(document.facets[0].normal.y, -1.0);
    }

    #[test]
    fn test_empty_solid_is_valid() {
        let (document, diagnostics) = parse("solid empty\nendsolid empty\n");
        let document = document.expect("empty solid should parse");
        assert!(document.facets.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unnamed_solid_is_a_warning() {
        let (document, diagnostics) = parse("solid\nendsolid\n");
        assert!(document.is_some());
        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.kind, DiagnosticKind::UnnamedSolid);
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.location, Location::line(1));
    }

    #[test]
    fn test_two_vertices_is_structural() {
        let text = TRIANGLE.replace("      vertex 0 1 0\n", "");
        let (document, diagnostics) = parse(&text);
        assert!(document.is_none());
        assert_eq!(diagnostics.error_count(), 1);
        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.kind, DiagnosticKind::Structural);
        assert_eq!(d.location, Location::line(2));
        assert!(d.message.contains("Facet 0 has 2 vertices"));
    }

    #[test]
    fn test_four_vertices_is_structural() {
        let four = "      vertex 0 1 0\n      vertex 1 1 0\n";
        let text = TRIANGLE.replace("      vertex 0 1 0\n", four);
        let (document, diagnostics) = parse(&text);
        assert!(document.is_none());
        assert!(messages(&diagnostics)[0].contains("Facet 0 has 4 vertices"));
    }

    #[test]
    fn test_invalid_number_reports_line() {
        let text = TRIANGLE.replace("vertex 1 0 0", "vertex 1 abc 0");
        let (document, diagnostics) = parse(&text);
        assert!(document.is_none());
        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.location, Location::line(5));
        assert!(d.message.contains("vertex y coordinate"));
        assert!(d.message.contains("'abc'"));
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for bad in ["nan", "inf", "-infinity", "1e999"] {
            let text = TRIANGLE.replace("normal 0 0 1", &format!("normal 0 {} 1", bad));
            let (document, diagnostics) = parse(&text);
            assert!(document.is_none(), "{} should be rejected", bad);
            assert!(messages(&diagnostics)[0].contains("normal y component"));
        }
    }

    #[test]
    fn test_missing_endloop() {
        let text = TRIANGLE.replace("    endloop\n", "");
        let (document, diagnostics) = parse(&text);
        assert!(document.is_none());
        assert_eq!(
            messages(&diagnostics),
            vec!["[E2003] Expected 'endloop' but got 'endfacet'".to_string()]
        );
    }

    #[test]
    fn test_missing_endsolid() {
        let text = TRIANGLE.replace("endsolid tri\n", "");
        let (document, diagnostics) = parse(&text);
        assert!(document.is_none());
        let d = diagnostics.iter().next().unwrap();
        assert!(d.message.contains("Unexpected end of file, expected 'endsolid'"));
        assert_eq!(d.location, Location::line(8));
    }

    #[test]
    fn test_trailing_content_after_endsolid() {
        let text = format!("{}solid again\n", TRIANGLE);
        let (document, diagnostics) = parse(&text);
        assert!(document.is_none());
        let d = diagnostics.iter().next().unwrap();
        assert!(d.message.contains("after 'endsolid'"));
        assert_eq!(d.location, Location::line(10));
    }

    #[test]
    fn test_recovery_reports_every_broken_facet() {
        let good = "facet normal 0 0 1\nouter loop\n\
                    vertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\n\
                    endloop\nendfacet\n";
        let two_vertices = "facet normal 0 0 1\nouter loop\n\
                            vertex 0 0 0\nvertex 1 0 0\n\
                            endloop\nendfacet\n";
        let bad_number = "facet normal 0 0 x\nouter loop\n\
                          vertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\n\
                          endloop\nendfacet\n";
        let text = format!(
            "solid s\n{}{}{}{}endsolid s\n",
            good, two_vertices, good, bad_number
        );
        let (document, diagnostics) = parse(&text);
        assert!(document.is_none());
        assert_eq!(diagnostics.error_count(), 2);
        let all = messages(&diagnostics);
        assert!(all[0].contains("Facet 1 has 2 vertices"));
        assert!(all[1].contains("normal z component"));
    }

    #[test]
    fn test_stray_token_between_facets() {
        let text = TRIANGLE.replace("endsolid tri", "garbage\nendsolid tri");
        let (document, diagnostics) = parse(&text);
        assert!(document.is_none());
        assert_eq!(diagnostics.error_count(), 1);
        let expected = "Expected 'facet' or 'endsolid' but got 'garbage'";
        assert!(messages(&diagnostics)[0].contains(expected));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut bytes = b"solid x\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        let mut diagnostics = Diagnostics::new(false);
        assert!(parse_ascii(&bytes, &mut diagnostics).is_none());
        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.location, Location::line(2));
        assert!(d.message.contains("offset 8"));
    }
}
