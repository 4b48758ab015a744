//! Fiat-Shamir transformation for [`SigmaProtocol`]s.
//!
//! This module defines [`FiatShamirProofSystem`], a generic non-interactive wrapper
//! around any Sigma protocol. The verifier's challenge is replaced by a hash of
//! everything it would have seen before choosing it:
//!
//! ```text
//! c = hash_into_challenge_space(
//!         frame(protocol_id) || frame(session_id) || frame(instance_label)
//!      || frame(announcement) || frame(additional_data))
//! ```
//!
//! The challenge is never transmitted; [`FiatShamirProofSystem::check_proof`]
//! recomputes it. `additional_data` binds the proof to a message, which turns a
//! proof of knowledge into a signature of knowledge.

use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};

use crate::challenge::ChallengeSpace;
use crate::errors::Error;
use crate::representation::{frames, FrameReader};
use crate::traits::{Challenge, SigmaProtocol};

/// A non-interactive proof: the announcement and the response.
pub struct FiatShamirProof<P: SigmaProtocol> {
    pub announcement: P::Announcement,
    pub response: P::Response,
}

impl<P: SigmaProtocol> Clone for FiatShamirProof<P> {
    fn clone(&self) -> Self {
        Self {
            announcement: self.announcement.clone(),
            response: self.response.clone(),
        }
    }
}

/// A Fiat-Shamir transformation of a [`SigmaProtocol`] into a non-interactive proof.
///
/// The session identifier domain-separates proofs produced by different
/// applications (or different uses within one application) for the same statement.
#[derive(Clone, Debug)]
pub struct FiatShamirProofSystem<P> {
    session_id: Vec<u8>,
    protocol: P,
}

impl<P: SigmaProtocol> FiatShamirProofSystem<P> {
    pub fn new(session_id: &[u8], protocol: P) -> Self {
        Self {
            session_id: session_id.to_vec(),
            protocol,
        }
    }

    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    pub fn session_id(&self) -> &[u8] {
        &self.session_id
    }

    fn derive_challenge(&self, announcement: &P::Announcement, additional_data: &[u8]) -> Challenge<P> {
        let protocol_id = self.protocol.protocol_identifier();
        let instance_label = self.protocol.instance_label();
        let announcement = self.protocol.serialize_announcement(announcement);
        let hash_input = frames([
            protocol_id.as_slice(),
            self.session_id.as_slice(),
            instance_label.as_slice(),
            announcement.as_slice(),
            additional_data,
        ]);
        self.protocol
            .challenge_space()
            .hash_into_challenge_space(&hash_input)
    }

    /// Produces a proof that the prover knows `witness`, bound to `additional_data`.
    ///
    /// # Errors
    /// - [`Error::InvalidInstanceWitnessPair`] if the witness does not satisfy the statement.
    #[instrument(skip_all, fields(additional_data_len = additional_data.len()))]
    pub fn create_proof(
        &self,
        witness: &P::Witness,
        additional_data: &[u8],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<FiatShamirProof<P>, Error> {
        let (announcement, secret) = self.protocol.generate_announcement(witness, rng)?;
        let challenge = self.derive_challenge(&announcement, additional_data);
        let response = self.protocol.generate_response(secret, &challenge)?;
        Ok(FiatShamirProof {
            announcement,
            response,
        })
    }

    /// Recomputes the challenge and checks the resulting transcript.
    #[instrument(skip_all, fields(additional_data_len = additional_data.len()))]
    pub fn check_proof(&self, proof: &FiatShamirProof<P>, additional_data: &[u8]) -> bool {
        let challenge = self.derive_challenge(&proof.announcement, additional_data);
        self.protocol
            .check_transcript(&proof.announcement, &challenge, &proof.response)
    }

    /// `frame(announcement) || frame(response)`.
    pub fn serialize_proof(&self, proof: &FiatShamirProof<P>) -> Vec<u8> {
        frames([
            self.protocol.serialize_announcement(&proof.announcement).as_slice(),
            self.protocol.serialize_response(&proof.response).as_slice(),
        ])
    }

    /// # Errors
    /// - [`Error::InvalidEncoding`] on truncated input, trailing bytes, or
    ///   messages the protocol cannot restore.
    pub fn restore_proof(&self, data: &[u8]) -> Result<FiatShamirProof<P>, Error> {
        let mut reader = FrameReader::new(data);
        let announcement = self
            .protocol
            .restore_announcement(reader.next_frame("proof announcement")?)?;
        let response = self
            .protocol
            .restore_response(reader.next_frame("proof response")?)?;
        reader.finish("proof")?;
        Ok(FiatShamirProof {
            announcement,
            response,
        })
    }

    /// Restores and checks a serialized proof; undecodable proofs do not verify.
    pub fn check_serialized_proof(&self, data: &[u8], additional_data: &[u8]) -> bool {
        match self.restore_proof(data) {
            Ok(proof) => self.check_proof(&proof, additional_data),
            Err(err) => {
                debug!(%err, "rejecting undecodable proof");
                false
            }
        }
    }
}
