//! Shared STL builders for integration tests

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

/// A facet as written to a file: declared normal and three vertices
pub type RawFacet = ([f32; 3], [[f32; 3]; 3]);

/// The twelve facets of a 10mm cube in the positive octant, wound
/// counterclockwise seen from outside, with outward unit normals
pub fn cube_facets() -> Vec<RawFacet> {
    let (o, s) = (0.0, 10.0);
    vec![
        // bottom
        ([o, o, -1.0], [[o, o, o], [o, s, o], [s, s, o]]),
        ([o, o, -1.0], [[o, o, o], [s, s, o], [s, o, o]]),
        // top
        ([o, o, 1.0], [[o, o, s], [s, o, s], [s, s, s]]),
        ([o, o, 1.0], [[o, o, s], [s, s, s], [o, s, s]]),
        // front
        ([o, -1.0, o], [[o, o, o], [s, o, o], [s, o, s]]),
        ([o, -1.0, o], [[o, o, o], [s, o, s], [o, o, s]]),
        // back
        ([o, 1.0, o], [[o, s, o], [o, s, s], [s, s, s]]),
        ([o, 1.0, o], [[o, s, o], [s, s, s], [s, s, o]]),
        // left
        ([-1.0, o, o], [[o, o, o], [o, o, s], [o, s, s]]),
        ([-1.0, o, o], [[o, o, o], [o, s, s], [o, s, o]]),
        // right
        ([1.0, o, o], [[s, o, o], [s, s, o], [s, s, s]]),
        ([1.0, o, o], [[s, o, o], [s, s, s], [s, o, s]]),
    ]
}

/// Reverse the winding of a facet without touching its declared normal
pub fn flip_winding(facet: &mut RawFacet) {
    facet.1.swap(1, 2);
}

/// Render facets as an ASCII STL document
pub fn ascii_stl(name: &str, end_name: &str, facets: &[RawFacet]) -> String {
    let mut out = format!("{}\n", format!("solid {}", name).trim_end());
    for (normal, vertices) in facets {
        let [x, y, z] = normal;
        out.push_str(&format!("  facet normal {} {} {}\n", x, y, z));
        out.push_str("    outer loop\n");
        for v in vertices {
            out.push_str(&format!("      vertex {} {} {}\n", v[0], v[1], v[2]));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    out.push_str(&format!("{}\n", format!("endsolid {}", end_name).trim_end()));
    out
}

/// Render facets as a binary STL, all attribute byte counts zero
pub fn binary_stl(header: &[u8], facets: &[RawFacet]) -> Vec<u8> {
    binary_stl_with_attributes(header, facets, &vec![0; facets.len()])
}

/// Render facets as a binary STL with explicit attribute byte counts
pub fn binary_stl_with_attributes(
    header: &[u8],
    facets: &[RawFacet],
    attributes: &[u16],
) -> Vec<u8> {
    let mut bytes = header.to_vec();
    bytes.resize(80, 0);
    bytes.extend_from_slice(&(facets.len() as u32).to_le_bytes());
    for ((normal, vertices), attribute) in facets.iter().zip(attributes) {
        for value in normal.iter().chain(vertices.iter().flatten()) {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&attribute.to_le_bytes());
    }
    bytes
}

/// Write bytes to a temporary `.stl` file
pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".stl")
        .tempfile()
        .expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
