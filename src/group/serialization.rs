//! Serialization and deserialization utilities for group elements and scalars.
//!
//! This module provides functions to convert group elements and scalars to and from
//! byte representations using canonical encodings.

use ff::PrimeField;
use group::prime::PrimeGroup;

/// Get the serialized length of a group element in bytes.
pub fn group_elt_serialized_len<G: PrimeGroup>() -> usize {
    G::Repr::default().as_ref().len()
}

/// Get the serialized length of a scalar in bytes.
pub fn scalar_serialized_len<F: PrimeField>() -> usize {
    F::Repr::default().as_ref().len()
}

/// Serialize a slice of group elements into a byte vector.
///
/// # Returns
/// - A `Vec<u8>` containing the concatenated canonical compressed byte representations.
pub fn serialize_elements<'a, G: PrimeGroup>(elements: impl IntoIterator<Item = &'a G>) -> Vec<u8> {
    let mut bytes = Vec::new();
    for element in elements {
        bytes.extend_from_slice(element.to_bytes().as_ref());
    }
    bytes
}

/// Deserialize a byte slice into exactly `count` group elements.
///
/// # Returns
/// - `Some(Vec<G>)`: The deserialized group elements if all are valid.
/// - `None`: If the byte slice length is incorrect or any element is invalid.
pub fn deserialize_elements<G: PrimeGroup>(data: &[u8], count: usize) -> Option<Vec<G>> {
    let element_len = group_elt_serialized_len::<G>();
    if data.len() != element_len * count {
        return None;
    }

    let mut elements = Vec::with_capacity(count);
    for chunk in data.chunks_exact(element_len) {
        let mut repr = G::Repr::default();
        repr.as_mut().copy_from_slice(chunk);
        let element: Option<G> = G::from_bytes(&repr).into();
        elements.push(element?);
    }
    Some(elements)
}

/// Serialize a slice of scalar field elements into a byte vector.
///
/// Scalars are written big-endian, which is the reverse of the `ff` representation
/// for the little-endian fields used in practice.
pub fn serialize_scalars<F: PrimeField>(scalars: &[F]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for scalar in scalars {
        let mut scalar_bytes = scalar.to_repr().as_ref().to_vec();
        scalar_bytes.reverse();
        bytes.extend_from_slice(&scalar_bytes);
    }
    bytes
}

/// Deserialize a byte slice into exactly `count` canonical scalars.
///
/// # Returns
/// - `Some(Vec<F>)`: The deserialized scalars if all are canonical.
/// - `None`: If the byte slice length is incorrect or any scalar is out of range.
pub fn deserialize_scalars<F: PrimeField>(data: &[u8], count: usize) -> Option<Vec<F>> {
    let scalar_len = scalar_serialized_len::<F>();
    if data.len() != scalar_len * count {
        return None;
    }

    let mut scalars = Vec::with_capacity(count);
    for chunk in data.chunks_exact(scalar_len) {
        let mut repr = F::Repr::default();
        let repr_mut = repr.as_mut();
        repr_mut.copy_from_slice(chunk);
        repr_mut.reverse();
        let scalar: Option<F> = F::from_repr(repr).into();
        scalars.push(scalar?);
    }
    Some(scalars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::{RistrettoPoint, Scalar};
    use group::Group;
    use rand::rngs::OsRng;

    #[test]
    fn elements_and_scalars_restore() {
        let mut rng = OsRng;
        let points = [RistrettoPoint::random(&mut rng), RistrettoPoint::generator()];
        let bytes = serialize_elements(&points);
        assert_eq!(bytes.len(), 64);
        assert_eq!(deserialize_elements::<RistrettoPoint>(&bytes, 2).unwrap(), points);
        assert!(deserialize_elements::<RistrettoPoint>(&bytes, 1).is_none());

        let scalars = [Scalar::from(5u64), <Scalar as ff::Field>::random(&mut rng)];
        let bytes = serialize_scalars(&scalars);
        assert_eq!(bytes[31], 5);
        assert_eq!(deserialize_scalars::<Scalar>(&bytes, 2).unwrap(), scalars);
    }

    #[test]
    fn non_canonical_scalar_is_rejected() {
        assert!(deserialize_scalars::<Scalar>(&[0xff; 32], 1).is_none());
    }
}
