//! Generic interface for 3-message Sigma protocols.
//!
//! This module defines the [`SigmaProtocol`] and [`SigmaProtocolSimulator`] traits,
//! used to describe interactive zero-knowledge proofs of knowledge,
//! such as Schnorr proofs, that follow the 3-message Sigma protocol structure,
//! together with the [`SigmaProtocolTranscript`] they produce.

use rand::{CryptoRng, RngCore};

use crate::challenge::ChallengeSpace;
use crate::errors::Error;

/// Challenge type of a protocol, as given by its challenge space.
pub type Challenge<P> = <<P as SigmaProtocol>::Space as ChallengeSpace>::Challenge;

/// A trait defining the behavior of a generic Sigma protocol.
///
/// A value implementing this trait *is* the statement (common input): it holds
/// everything both parties know about one execution. The witness is only passed
/// to the prover.
///
/// ## Associated Types
/// - `Space`: The challenge space every challenge is drawn from.
/// - `Announcement`: The prover's first message.
/// - `AnnouncementSecret`: Prover-only state needed to compute the response.
///   It is returned by value from [`generate_announcement`](Self::generate_announcement)
///   and moved into [`generate_response`](Self::generate_response), so it cannot be
///   reused for a second response.
/// - `Response`: The prover's answer to the challenge.
/// - `Witness`: The prover's secret knowledge.
///
/// ## Minimal Implementation
/// Types implementing [`SigmaProtocol`] must define:
/// - `generate_announcement`: Generates the announcement and its secret.
/// - `generate_response`: Computes a response to a challenge.
/// - `check_transcript`: Verifies a full transcript `(announcement, challenge, response)`.
/// - the serialization / restore functions for announcements and responses.
///
/// ## Identification
/// To bind hashes of transcripts to the statement being proven, implementors provide
/// - `protocol_identifier`: A fixed byte identifier of the protocol.
/// - `instance_label`: Bytes encoding the common input.
pub trait SigmaProtocol {
    type Space: ChallengeSpace;
    type Announcement: Clone;
    type AnnouncementSecret;
    type Response: Clone;
    type Witness;

    /// The challenge space of this protocol.
    fn challenge_space(&self) -> &Self::Space;

    /// First step of the protocol. Given the witness and RNG, this generates:
    /// - A public announcement to send to the verifier.
    /// - The secret state to use when computing the response.
    fn generate_announcement(
        &self,
        witness: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Announcement, Self::AnnouncementSecret), Error>;

    /// Second step of the protocol, run by the verifier.
    fn generate_challenge(&self, rng: &mut (impl RngCore + CryptoRng)) -> Challenge<Self> {
        self.challenge_space().generate_random_challenge(rng)
    }

    /// Computes the prover's response to a challenge, consuming the announcement secret.
    fn generate_response(
        &self,
        secret: Self::AnnouncementSecret,
        challenge: &Challenge<Self>,
    ) -> Result<Self::Response, Error>;

    /// Final step of the protocol: checks that the announcement, challenge, and
    /// response form a valid transcript for this statement.
    fn check_transcript(
        &self,
        announcement: &Self::Announcement,
        challenge: &Challenge<Self>,
        response: &Self::Response,
    ) -> bool;

    /// Canonical, unique encoding of an announcement.
    fn serialize_announcement(&self, announcement: &Self::Announcement) -> Vec<u8>;

    fn serialize_response(&self, response: &Self::Response) -> Vec<u8>;

    fn restore_announcement(&self, data: &[u8]) -> Result<Self::Announcement, Error>;

    fn restore_response(&self, data: &[u8]) -> Result<Self::Response, Error>;

    fn serialize_challenge(&self, challenge: &Challenge<Self>) -> Vec<u8> {
        self.challenge_space().serialize_challenge(challenge)
    }

    fn restore_challenge(&self, data: &[u8]) -> Result<Challenge<Self>, Error> {
        self.challenge_space().restore_challenge(data)
    }

    fn protocol_identifier(&self) -> Vec<u8>;

    fn instance_label(&self) -> Vec<u8>;
}

/// A trait defining the behavior of a Sigma protocol whose transcripts can be
/// simulated without a witness (honest-verifier zero-knowledge).
///
/// OR and partial-knowledge compositions require simulation during actual proof
/// generation.
pub trait SigmaProtocolSimulator: SigmaProtocol + Sized {
    /// Generates a transcript for the given challenge that verifies without a witness,
    /// distributed like an honest transcript with that challenge.
    fn simulate_transcript(
        &self,
        challenge: &Challenge<Self>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<SigmaProtocolTranscript<Self>, Error>;
}

/// A full `(announcement, challenge, response)` triple.
pub struct SigmaProtocolTranscript<P: SigmaProtocol> {
    pub announcement: P::Announcement,
    pub challenge: Challenge<P>,
    pub response: P::Response,
}

impl<P: SigmaProtocol> SigmaProtocolTranscript<P> {
    pub fn new(
        announcement: P::Announcement,
        challenge: Challenge<P>,
        response: P::Response,
    ) -> Self {
        Self {
            announcement,
            challenge,
            response,
        }
    }

    /// Runs [`SigmaProtocol::check_transcript`] on this triple.
    pub fn verify(&self, protocol: &P) -> bool {
        protocol.check_transcript(&self.announcement, &self.challenge, &self.response)
    }
}

impl<P: SigmaProtocol> Clone for SigmaProtocolTranscript<P> {
    fn clone(&self) -> Self {
        Self {
            announcement: self.announcement.clone(),
            challenge: self.challenge.clone(),
            response: self.response.clone(),
        }
    }
}

/// Runs an honest prover and verifier against each other in memory.
///
/// Returns the transcript so that callers may inspect or re-verify it.
pub fn run_honestly<P: SigmaProtocol>(
    protocol: &P,
    witness: &P::Witness,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<SigmaProtocolTranscript<P>, Error> {
    let (announcement, secret) = protocol.generate_announcement(witness, rng)?;
    let challenge = protocol.generate_challenge(rng);
    let response = protocol.generate_response(secret, &challenge)?;
    Ok(SigmaProtocolTranscript::new(announcement, challenge, response))
}
