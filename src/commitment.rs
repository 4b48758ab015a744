//! Byte-string commitment schemes, as consumed by [`DamgardTechnique`](crate::damgard::DamgardTechnique).
//!
//! A [`CommitmentScheme`] commits to an arbitrary message and later opens it with
//! an opening value. The scheme must be hiding (the commitment reveals nothing about
//! the message) and binding (no one can open a commitment to two messages).

use rand::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_256};
use subtle::ConstantTimeEq;

use crate::errors::Error;

/// Commit/open interface over byte strings.
pub trait CommitmentScheme {
    type Commitment: Clone;
    type OpenValue: Clone;

    /// Commits to `message`, returning the commitment and the value that opens it.
    fn commit(
        &self,
        message: &[u8],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> (Self::Commitment, Self::OpenValue);

    /// Whether `open_value` opens `commitment` to `message`.
    fn verify(&self, commitment: &Self::Commitment, message: &[u8], open_value: &Self::OpenValue) -> bool;

    fn serialize_commitment(&self, commitment: &Self::Commitment) -> Vec<u8>;

    fn serialize_open_value(&self, open_value: &Self::OpenValue) -> Vec<u8>;

    fn restore_commitment(&self, data: &[u8]) -> Result<Self::Commitment, Error>;

    fn restore_open_value(&self, data: &[u8]) -> Result<Self::OpenValue, Error>;
}

/// Length of hash commitments and of their opening randomness.
pub const HASH_COMMITMENT_LEN: usize = 32;

/// `C = SHA3-256(domain || len(m) || m || r)` with 32 bytes of fresh randomness `r`.
///
/// Computationally hiding and binding in the random-oracle model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashCommitmentScheme {
    domain: Vec<u8>,
}

impl HashCommitmentScheme {
    pub fn new(domain: &[u8]) -> Self {
        Self {
            domain: domain.to_vec(),
        }
    }

    fn compute(&self, message: &[u8], randomness: &[u8; HASH_COMMITMENT_LEN]) -> [u8; HASH_COMMITMENT_LEN] {
        let mut hasher = Sha3_256::new();
        hasher.update((self.domain.len() as u64).to_be_bytes());
        hasher.update(&self.domain);
        hasher.update((message.len() as u64).to_be_bytes());
        hasher.update(message);
        hasher.update(randomness);
        hasher.finalize().into()
    }
}

impl Default for HashCommitmentScheme {
    fn default() -> Self {
        Self::new(b"sigma-compose/hash-commitment")
    }
}

fn restore_array(data: &[u8], what: &'static str) -> Result<[u8; HASH_COMMITMENT_LEN], Error> {
    data.try_into().map_err(|_| Error::InvalidEncoding(what))
}

impl CommitmentScheme for HashCommitmentScheme {
    type Commitment = [u8; HASH_COMMITMENT_LEN];
    type OpenValue = [u8; HASH_COMMITMENT_LEN];

    fn commit(
        &self,
        message: &[u8],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> (Self::Commitment, Self::OpenValue) {
        let mut randomness = [0u8; HASH_COMMITMENT_LEN];
        rng.fill_bytes(&mut randomness);
        (self.compute(message, &randomness), randomness)
    }

    fn verify(&self, commitment: &Self::Commitment, message: &[u8], open_value: &Self::OpenValue) -> bool {
        self.compute(message, open_value)[..]
            .ct_eq(&commitment[..])
            .into()
    }

    fn serialize_commitment(&self, commitment: &Self::Commitment) -> Vec<u8> {
        commitment.to_vec()
    }

    fn serialize_open_value(&self, open_value: &Self::OpenValue) -> Vec<u8> {
        open_value.to_vec()
    }

    fn restore_commitment(&self, data: &[u8]) -> Result<Self::Commitment, Error> {
        restore_array(data, "hash commitment")
    }

    fn restore_open_value(&self, data: &[u8]) -> Result<Self::OpenValue, Error> {
        restore_array(data, "hash commitment opening")
    }
}
