//! # Protocol Composition with AND/OR Logic
//!
//! This module builds composite [`SigmaProtocol`](crate::traits::SigmaProtocol)s
//! out of other Sigma protocols:
//! - [`AndProof`]: conjunction of any number of branches sharing one challenge,
//! - [`OrProof`]: disjunction of two (possibly heterogeneous) branches,
//! - [`ProofOfPartialKnowledge`]: an arbitrary AND/OR tree over named leaves,
//!   where the prover only knows witnesses for a satisfying set of leaves.
//!
//! Every branch of a composite must use the same challenge space; this is checked
//! when the composite is constructed. Disjunctions additionally need a
//! [`SubtractiveChallengeSpace`](crate::challenge::SubtractiveChallengeSpace) so that
//! the verifier's challenge can be split among the branches.
//!
//! ## Example Composition
//!
//! ```ignore
//! and(
//!    or(leaf("dleq", dleq), leaf("schnorr", schnorr)),
//!    leaf("pedersen", pedersen),
//! )
//! ```

pub mod and;
pub mod or;
pub mod partial_knowledge;

pub use and::AndProof;
pub use or::{OrAnnouncementSecret, OrProof, OrResponse, OrWitness};
pub use partial_knowledge::{
    PartialAnnouncement, PartialAnnouncementSecret, PartialKnowledge, PartialKnowledgeWitness,
    PartialResponse, ProofOfPartialKnowledge,
};

use sha3::{Digest, Sha3_256};

/// Derives the identifier of a composite from a tag and its children's identifiers.
pub(crate) fn composite_identifier(
    tag: u8,
    children: impl IntoIterator<Item = Vec<u8>>,
) -> Vec<u8> {
    let mut hasher = Sha3_256::new();
    hasher.update([tag; 32]);
    for child in children {
        hasher.update((child.len() as u64).to_be_bytes());
        hasher.update(&child);
    }
    hasher.finalize().to_vec()
}
