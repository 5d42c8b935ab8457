#![no_main]

use libfuzzer_sys::arbitrary::{Arbitrary, Result, Unstructured};
use libfuzzer_sys::fuzz_target;
use stl_validator::{ValidatorConfig, validate_bytes};

#[derive(Debug)]
struct FuzzSolid {
    facets: Vec<[f32; 12]>,
    attributes: Vec<u16>,
}

impl<'a> Arbitrary<'a> for FuzzSolid {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let count = u.int_in_range(0..=64)?;
        let mut facets = Vec::with_capacity(count);
        let mut attributes = Vec::with_capacity(count);
        for _ in 0..count {
            facets.push(u.arbitrary()?);
            attributes.push(u.arbitrary()?);
        }
        Ok(FuzzSolid { facets, attributes })
    }
}

fuzz_target!(|solid: FuzzSolid| {
    // Well-formed binary layout with arbitrary geometry, including NaN and
    // infinities, so every facet reaches the geometry checks
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&(solid.facets.len() as u32).to_le_bytes());
    for (values, attribute) in solid.facets.iter().zip(&solid.attributes) {
        for value in values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&attribute.to_le_bytes());
    }

    let result = validate_bytes(&bytes, &ValidatorConfig::new());
    assert_eq!(result.passed(), result.error_count() == 0);
});
