//! # sigma-compose
//!
//! Composable Sigma protocols and a round-based runtime to run them inside
//! two-party protocols.
//!
//! - [`traits`]: the three-move [`SigmaProtocol`] contract and its simulator.
//! - [`challenge`]: challenge spaces, including the subtractive ones that
//!   disjunctions need.
//! - [`schnorr_protocol`], [`modp_protocol`]: discrete-log relations to build on.
//! - [`composition`]: AND, OR and arbitrary partial-knowledge trees.
//! - [`damgard`]: commit-then-reveal wrapper for concurrent zero-knowledge.
//! - [`fiat_shamir`]: non-interactive proofs and signatures of knowledge.
//! - [`instance`], [`two_party`]: message-driven prover/verifier runners and the
//!   runtime multiplexing them as named sub-protocols.
//!
//! ```
//! use curve25519_dalek::{RistrettoPoint, Scalar};
//! use ff::Field;
//! use group::Group;
//! use rand::rngs::OsRng;
//! use sigma_compose::{DiscreteLogEquality, FiatShamirProofSystem};
//!
//! let x = Scalar::random(&mut OsRng);
//! let statement = DiscreteLogEquality::from_witness(vec![RistrettoPoint::generator()], &x)?;
//! let nizk = FiatShamirProofSystem::new(b"doc-example", statement);
//! let proof = nizk.create_proof(&x, b"hello", &mut OsRng)?;
//! assert!(nizk.check_proof(&proof, b"hello"));
//! # Ok::<(), sigma_compose::Error>(())
//! ```

pub mod challenge;
pub mod commitment;
pub mod composition;
pub mod damgard;
pub mod duplex_sponge;
pub mod errors;
pub mod fiat_shamir;
pub mod group;
pub mod instance;
pub mod modp_protocol;
pub mod representation;
pub mod schnorr_protocol;
pub mod traits;
pub mod two_party;

pub use challenge::{ChallengeSpace, ScalarChallengeSpace, SubtractiveChallengeSpace, ZnChallengeSpace};
pub use commitment::{CommitmentScheme, HashCommitmentScheme};
pub use composition::{AndProof, OrProof, OrWitness, PartialKnowledge, ProofOfPartialKnowledge};
pub use damgard::DamgardTechnique;
pub use errors::Error;
pub use fiat_shamir::{FiatShamirProof, FiatShamirProofSystem};
pub use instance::{ProtocolInstance, SigmaProverInstance, SigmaVerifierInstance};
pub use modp_protocol::ModPDiscreteLog;
pub use representation::Representation;
pub use schnorr_protocol::DiscreteLogEquality;
pub use traits::{run_honestly, Challenge, SigmaProtocol, SigmaProtocolSimulator, SigmaProtocolTranscript};
pub use two_party::{execute_locally, BaseProtocolInstance, RoundContext, RoundLogic, RuntimeConfig};
