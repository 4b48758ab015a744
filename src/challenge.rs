//! Challenge spaces.
//!
//! Every [`SigmaProtocol`](crate::traits::SigmaProtocol) draws its challenges from a
//! [`ChallengeSpace`]. A space knows how to sample a uniform challenge, how to encode
//! and restore challenges, and how to map or hash arbitrary bytes into itself; the
//! latter is what the Fiat-Shamir transform relies on.
//!
//! Composition operators that split one challenge among several branches (OR and
//! partial-knowledge proofs) need the space to be an additive group. That narrower
//! capability is expressed by [`SubtractiveChallengeSpace`].
//!
//! Two concrete spaces are provided:
//! - [`ScalarChallengeSpace`]: the scalar field of a prime-order group,
//! - [`ZnChallengeSpace`]: the residue classes modulo an arbitrary `n >= 2`.

use core::fmt::Debug;
use core::marker::PhantomData;

use ff::PrimeField;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::duplex_sponge::shake::ShakeDuplexSponge;
use crate::duplex_sponge::DuplexSpongeInterface;
use crate::errors::Error;
use crate::group::serialization::{deserialize_scalars, serialize_scalars};

/// Domain separator of [`ChallengeSpace::hash_into_challenge_space`].
const HASH_INTO_DOMAIN: &[u8] = b"sigma-compose/hash-into-challenge-space/v1";

/// Extra bytes squeezed beyond the challenge length, so that the modular
/// reduction of the sponge output is statistically close to uniform.
const REDUCTION_SLACK: usize = 16;

/// A structured domain of challenge values.
///
/// Two spaces comparing equal must produce equal challenges from equal bytes
/// (both for [`map_into_challenge_space`](Self::map_into_challenge_space) and
/// [`hash_into_challenge_space`](Self::hash_into_challenge_space)).
pub trait ChallengeSpace: Clone + PartialEq + Debug {
    type Challenge: Clone + PartialEq + Debug;

    /// Samples a uniformly random challenge.
    fn generate_random_challenge(&self, rng: &mut (impl RngCore + CryptoRng)) -> Self::Challenge;

    /// Cardinality of the space, or `None` when it is not known.
    ///
    /// Both spaces in this crate know their size. `None` is for spaces defined
    /// only through their encoding, such as hash-output bit strings.
    fn size(&self) -> Option<BigUint>;

    /// Length in bytes of an encoded challenge.
    fn challenge_len(&self) -> usize;

    /// Bytes binding the space's parameters, used for domain separation.
    fn descriptor(&self) -> Vec<u8>;

    fn serialize_challenge(&self, challenge: &Self::Challenge) -> Vec<u8>;

    /// Restores a challenge from [`serialize_challenge`](Self::serialize_challenge) output.
    fn restore_challenge(&self, data: &[u8]) -> Result<Self::Challenge, Error>;

    /// Deterministically maps bytes into the space.
    ///
    /// Inputs interpreted as integers smaller than the size of the space map
    /// injectively; longer inputs are reduced.
    fn map_into_challenge_space(&self, data: &[u8]) -> Self::Challenge;

    /// Hashes bytes into the space as a random oracle, separated by the space descriptor.
    fn hash_into_challenge_space(&self, data: &[u8]) -> Self::Challenge {
        let mut sponge = ShakeDuplexSponge::new(HASH_INTO_DOMAIN);
        let descriptor = self.descriptor();
        sponge.absorb(&(descriptor.len() as u64).to_be_bytes());
        sponge.absorb(&descriptor);
        sponge.absorb(&(data.len() as u64).to_be_bytes());
        sponge.absorb(data);
        let uniform_bytes = sponge.squeeze(self.challenge_len() + REDUCTION_SLACK);
        self.map_into_challenge_space(&uniform_bytes)
    }
}

/// A challenge space which is an additive group.
pub trait SubtractiveChallengeSpace: ChallengeSpace {
    fn zero(&self) -> Self::Challenge;

    fn add(&self, lhs: &Self::Challenge, rhs: &Self::Challenge) -> Self::Challenge;

    fn sub(&self, lhs: &Self::Challenge, rhs: &Self::Challenge) -> Self::Challenge;
}

fn field_cardinality<F: PrimeField>() -> BigUint {
    let bytes = (F::ZERO - F::ONE).to_repr();
    BigUint::from_bytes_le(bytes.as_ref()) + BigUint::one()
}

fn scalar_from_reduced<F: PrimeField>(reduced: &BigUint) -> Option<F> {
    let scalar_byte_length = F::Repr::default().as_ref().len();
    let reduced_bytes = reduced.to_bytes_le();
    if reduced_bytes.len() > scalar_byte_length {
        return None;
    }
    let mut repr = F::Repr::default();
    repr.as_mut()[..reduced_bytes.len()].copy_from_slice(&reduced_bytes);
    F::from_repr(repr).into()
}

/// The scalar field `F` of a prime-order group, used as challenge space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ScalarChallengeSpace<F: PrimeField> {
    _field: PhantomData<F>,
}

impl<F: PrimeField> ScalarChallengeSpace<F> {
    pub fn new() -> Self {
        Self {
            _field: PhantomData,
        }
    }
}

impl<F: PrimeField> ChallengeSpace for ScalarChallengeSpace<F> {
    type Challenge = F;

    fn generate_random_challenge(&self, rng: &mut (impl RngCore + CryptoRng)) -> F {
        F::random(&mut *rng)
    }

    fn size(&self) -> Option<BigUint> {
        Some(field_cardinality::<F>())
    }

    fn challenge_len(&self) -> usize {
        F::Repr::default().as_ref().len()
    }

    fn descriptor(&self) -> Vec<u8> {
        let mut descriptor = b"prime-field:".to_vec();
        descriptor.extend_from_slice(&field_cardinality::<F>().to_bytes_be());
        descriptor
    }

    fn serialize_challenge(&self, challenge: &F) -> Vec<u8> {
        serialize_scalars(&[*challenge])
    }

    fn restore_challenge(&self, data: &[u8]) -> Result<F, Error> {
        deserialize_scalars::<F>(data, 1)
            .and_then(|scalars| scalars.into_iter().next())
            .ok_or(Error::InvalidEncoding("scalar challenge"))
    }

    fn map_into_challenge_space(&self, data: &[u8]) -> F {
        let reduced = BigUint::from_bytes_be(data) % field_cardinality::<F>();
        // The reduced value is below the modulus, so it always has a canonical repr.
        scalar_from_reduced(&reduced).unwrap_or(F::ZERO)
    }
}

impl<F: PrimeField> SubtractiveChallengeSpace for ScalarChallengeSpace<F> {
    fn zero(&self) -> F {
        F::ZERO
    }

    fn add(&self, lhs: &F, rhs: &F) -> F {
        *lhs + rhs
    }

    fn sub(&self, lhs: &F, rhs: &F) -> F {
        *lhs - rhs
    }
}

/// The residue classes `Z_n` for an explicit modulus `n >= 2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZnChallengeSpace {
    modulus: BigUint,
}

impl ZnChallengeSpace {
    pub fn new(modulus: BigUint) -> Result<Self, Error> {
        if modulus < BigUint::from(2u32) {
            return Err(Error::InvalidParameters(
                "challenge space modulus must be at least 2".into(),
            ));
        }
        Ok(Self { modulus })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }
}

impl ChallengeSpace for ZnChallengeSpace {
    type Challenge = BigUint;

    fn generate_random_challenge(&self, rng: &mut (impl RngCore + CryptoRng)) -> BigUint {
        rng.gen_biguint_below(&self.modulus)
    }

    fn size(&self) -> Option<BigUint> {
        Some(self.modulus.clone())
    }

    fn challenge_len(&self) -> usize {
        ((self.modulus.bits() + 7) / 8) as usize
    }

    fn descriptor(&self) -> Vec<u8> {
        let mut descriptor = b"zn:".to_vec();
        descriptor.extend_from_slice(&self.modulus.to_bytes_be());
        descriptor
    }

    fn serialize_challenge(&self, challenge: &BigUint) -> Vec<u8> {
        let bytes = challenge.to_bytes_be();
        let mut out = vec![0u8; self.challenge_len().saturating_sub(bytes.len())];
        out.extend_from_slice(&bytes);
        out
    }

    fn restore_challenge(&self, data: &[u8]) -> Result<BigUint, Error> {
        if data.len() != self.challenge_len() {
            return Err(Error::InvalidEncoding("Z_n challenge"));
        }
        let challenge = BigUint::from_bytes_be(data);
        if challenge >= self.modulus {
            return Err(Error::InvalidEncoding("Z_n challenge"));
        }
        Ok(challenge)
    }

    fn map_into_challenge_space(&self, data: &[u8]) -> BigUint {
        BigUint::from_bytes_be(data) % &self.modulus
    }
}

impl SubtractiveChallengeSpace for ZnChallengeSpace {
    fn zero(&self) -> BigUint {
        BigUint::zero()
    }

    fn add(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        (lhs + rhs) % &self.modulus
    }

    fn sub(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        ((lhs % &self.modulus) + &self.modulus - (rhs % &self.modulus)) % &self.modulus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::Scalar;
    use rand::rngs::OsRng;

    #[test]
    fn zn_arithmetic_wraps() {
        let space = ZnChallengeSpace::new(BigUint::from(11u32)).unwrap();
        let three = BigUint::from(3u32);
        let nine = BigUint::from(9u32);
        assert_eq!(space.sub(&three, &nine), BigUint::from(5u32));
        assert_eq!(space.add(&space.sub(&three, &nine), &nine), three);
        assert_eq!(space.add(&nine, &nine), BigUint::from(7u32));
    }

    #[test]
    fn zn_rejects_tiny_modulus() {
        assert!(ZnChallengeSpace::new(BigUint::one()).is_err());
    }

    #[test]
    fn zn_restore_checks_range_and_length() {
        let space = ZnChallengeSpace::new(BigUint::from(300u32)).unwrap();
        assert_eq!(space.challenge_len(), 2);
        let c = BigUint::from(7u32);
        let bytes = space.serialize_challenge(&c);
        assert_eq!(bytes, vec![0, 7]);
        assert_eq!(space.restore_challenge(&bytes).unwrap(), c);
        assert!(space.restore_challenge(&[1, 44]).is_err());
        assert!(space.restore_challenge(&[7]).is_err());
    }

    #[test]
    fn random_challenges_stay_in_range() {
        let space = ZnChallengeSpace::new(BigUint::from(13u32)).unwrap();
        let mut rng = OsRng;
        for _ in 0..64 {
            assert!(space.generate_random_challenge(&mut rng) < BigUint::from(13u32));
        }
    }

    #[test]
    fn hashing_is_consistent_across_equal_spaces() {
        let a = ZnChallengeSpace::new(BigUint::from(1_000_003u32)).unwrap();
        let b = ZnChallengeSpace::new(BigUint::from(1_000_003u32)).unwrap();
        let c = ZnChallengeSpace::new(BigUint::from(1_000_033u32)).unwrap();
        assert_eq!(
            a.hash_into_challenge_space(b"data"),
            b.hash_into_challenge_space(b"data")
        );
        assert_ne!(
            a.hash_into_challenge_space(b"data"),
            a.hash_into_challenge_space(b"datb")
        );
        // Different parameters give an independent oracle.
        assert_ne!(
            a.hash_into_challenge_space(b"data"),
            c.hash_into_challenge_space(b"data")
        );
    }

    /// Fixed-length byte strings, as produced by a hash; the size is left unknown.
    #[derive(Clone, Debug, PartialEq)]
    struct ByteStrings {
        len: usize,
    }

    impl ChallengeSpace for ByteStrings {
        type Challenge = Vec<u8>;

        fn generate_random_challenge(&self, rng: &mut (impl RngCore + CryptoRng)) -> Vec<u8> {
            let mut challenge = vec![0u8; self.len];
            rng.fill_bytes(&mut challenge);
            challenge
        }

        fn size(&self) -> Option<BigUint> {
            None
        }

        fn challenge_len(&self) -> usize {
            self.len
        }

        fn descriptor(&self) -> Vec<u8> {
            (self.len as u64).to_be_bytes().to_vec()
        }

        fn serialize_challenge(&self, challenge: &Vec<u8>) -> Vec<u8> {
            challenge.clone()
        }

        fn restore_challenge(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
            if data.len() != self.len {
                return Err(Error::InvalidEncoding("byte-string challenge"));
            }
            Ok(data.to_vec())
        }

        fn map_into_challenge_space(&self, data: &[u8]) -> Vec<u8> {
            data.iter().rev().take(self.len).rev().copied().collect()
        }
    }

    #[test]
    fn spaces_of_unknown_size_still_hash_and_sample() {
        let space = ByteStrings { len: 16 };
        assert_eq!(space.size(), None);
        assert_eq!(space.generate_random_challenge(&mut OsRng).len(), 16);

        let c = space.hash_into_challenge_space(b"transcript");
        assert_eq!(c.len(), 16);
        assert_eq!(c, space.hash_into_challenge_space(b"transcript"));
        assert_ne!(c, ByteStrings { len: 17 }.hash_into_challenge_space(b"transcript")[1..]);
        assert_eq!(space.restore_challenge(&space.serialize_challenge(&c)).unwrap(), c);
    }

    #[test]
    fn scalar_space_matches_field() {
        let space = ScalarChallengeSpace::<Scalar>::new();
        let order = BigUint::parse_bytes(
            b"7237005577332262213973186563042994240857116359379907606001950938285454250989",
            10,
        )
        .unwrap();
        assert_eq!(space.size(), Some(order));
        assert_eq!(space.map_into_challenge_space(&[5]), Scalar::from(5u64));
        let c = space.hash_into_challenge_space(b"transcript");
        let restored = space
            .restore_challenge(&space.serialize_challenge(&c))
            .unwrap();
        assert_eq!(restored, c);
        let x = Scalar::from(3u64);
        let y = Scalar::from(10u64);
        assert_eq!(space.add(&space.sub(&x, &y), &y), x);
    }
}
