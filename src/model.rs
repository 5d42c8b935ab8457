//! Data structures representing STL documents and validation settings

use serde::Serialize;
use std::fmt;

/// The encoding an STL document was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StlFormat {
    /// Keyword-delimited text (`solid` ... `endsolid`)
    Ascii,
    /// 80-byte header, facet count and 50-byte facet records
    Binary,
}

impl StlFormat {
    /// Lowercase name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            StlFormat::Ascii => "ascii",
            StlFormat::Binary => "binary",
        }
    }
}

impl fmt::Display for StlFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vertex position in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Whether any coordinate is strictly negative
    pub fn has_negative_coordinate(&self) -> bool {
        self.x < 0.0 || self.y < 0.0 || self.z < 0.0
    }
}

/// A facet normal as declared in the file
///
/// The declared normal is kept verbatim: it is not required to be unit length
/// and may even be zero. The validator compares it against the normal computed
/// from the vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Normal {
    /// Create a new normal
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length of the declared vector
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y).hypot(self.z)
    }
}

/// One triangular face: a declared normal and exactly three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    /// Normal as declared in the file
    pub normal: Normal,
    /// Vertices in declared order
    pub vertices: [Vertex; 3],
    /// Line of the `facet` keyword (ASCII only)
    pub line: Option<usize>,
}

impl Facet {
    /// Create a facet with no source line
    pub fn new(normal: Normal, vertices: [Vertex; 3]) -> Self {
        Self {
            normal,
            vertices,
            line: None,
        }
    }

    /// Attach the source line of the `facet` keyword
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// A parsed STL file, independent of the encoding it came from
///
/// Built once by the ASCII or binary parser and not mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct StlDocument {
    /// Encoding the document was read from
    pub format: StlFormat,
    /// Name on the opening `solid` line (ASCII only)
    pub solid_name: Option<String>,
    /// Name on the closing `endsolid` line (ASCII only)
    pub end_solid_name: Option<String>,
    /// Line of the `endsolid` keyword (ASCII only)
    pub end_solid_line: Option<usize>,
    /// The 80 opaque header bytes (binary only)
    pub header: Option<Vec<u8>>,
    /// Facets in file order
    pub facets: Vec<Facet>,
}

impl StlDocument {
    /// Create an empty ASCII document
    pub fn ascii(solid_name: Option<String>) -> Self {
        Self {
            format: StlFormat::Ascii,
            solid_name,
            end_solid_name: None,
            end_solid_line: None,
            header: None,
            facets: Vec::new(),
        }
    }

    /// Create an empty binary document with the given header bytes
    pub fn binary(header: Vec<u8>) -> Self {
        Self {
            format: StlFormat::Binary,
            solid_name: None,
            end_solid_name: None,
            end_solid_line: None,
            header: Some(header),
            facets: Vec::new(),
        }
    }

    /// Number of facets in the document
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// The binary header as text, with trailing NUL bytes and whitespace removed
    ///
    /// Returns `None` for ASCII documents.
    pub fn header_comment(&self) -> Option<String> {
        self.header.as_ref().map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_end_matches(['\0', ' ', '\t', '\r', '\n'])
                .to_string()
        })
    }
}

/// Numeric tolerances used by the geometry checks
///
/// The defaults are chosen relative to `f32` precision (about 1.2e-7), since
/// binary STL stores single-precision values and most ASCII exporters print
/// six to seven significant digits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// A facet is degenerate when `|e1 x e2| <= collinear_epsilon * |e1| * |e2|`,
    /// i.e. when the sine of the angle between its edges is this small
    pub collinear_epsilon: f64,
    /// The cosine between the unit declared normal and the computed normal
    /// must exceed this value for the winding to count as counterclockwise
    pub winding_epsilon: f64,
    /// Allowed deviation of the declared normal's length from 1.0
    pub normal_magnitude_tolerance: f64,
}

impl Tolerances {
    /// Default collinearity threshold (sine of the edge angle)
    pub const DEFAULT_COLLINEAR_EPSILON: f64 = 1e-6;
    /// Default winding threshold (cosine between normals)
    pub const DEFAULT_WINDING_EPSILON: f64 = 1e-4;
    /// Default normal length tolerance
    pub const DEFAULT_NORMAL_MAGNITUDE_TOLERANCE: f64 = 1e-3;
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            collinear_epsilon: Self::DEFAULT_COLLINEAR_EPSILON,
            winding_epsilon: Self::DEFAULT_WINDING_EPSILON,
            normal_magnitude_tolerance: Self::DEFAULT_NORMAL_MAGNITUDE_TOLERANCE,
        }
    }
}

/// Configuration for validating STL files
///
/// Passed explicitly into every validation call, so concurrent validations
/// with different settings never interfere.
///
/// # Example
///
/// ```
/// use stl_validator::ValidatorConfig;
///
/// let config = ValidatorConfig::new().with_tolerant(true);
/// assert!(config.tolerant());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValidatorConfig {
    tolerant: bool,
    tolerances: Tolerances,
}

impl ValidatorConfig {
    /// Create a strict configuration with default tolerances
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable tolerant mode
    ///
    /// In tolerant mode winding-order, naming and negative-coordinate errors
    /// are downgraded to warnings and no longer fail the file.
    pub fn with_tolerant(mut self, tolerant: bool) -> Self {
        self.tolerant = tolerant;
        self
    }

    /// Replace the numeric tolerances
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Whether tolerant mode is enabled
    pub fn tolerant(&self) -> bool {
        self.tolerant
    }

    /// The numeric tolerances in use
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }
}
