//! Conjunction of Sigma protocols.
//!
//! The prover runs every branch honestly; a single challenge is answered by all
//! branches, and the transcript verifies only if every branch verifies.

use rand::{CryptoRng, RngCore};

use super::composite_identifier;
use crate::errors::Error;
use crate::representation::{frames, FrameReader};
use crate::traits::{Challenge, SigmaProtocol, SigmaProtocolSimulator, SigmaProtocolTranscript};

/// `P_1 AND ... AND P_k` over branches of the same type.
///
/// For heterogeneous conjunctions use a leaf enum, or a
/// [`ProofOfPartialKnowledge`](super::ProofOfPartialKnowledge) built with `and`.
#[derive(Clone, Debug)]
pub struct AndProof<P: SigmaProtocol> {
    protocols: Vec<P>,
}

impl<P: SigmaProtocol> AndProof<P> {
    /// # Errors
    /// - [`Error::InvalidParameters`] if `protocols` is empty.
    /// - [`Error::ChallengeSpaceMismatch`] if the branches disagree on the challenge space.
    pub fn new(protocols: Vec<P>) -> Result<Self, Error> {
        let first = protocols
            .first()
            .ok_or_else(|| Error::InvalidParameters("AND of zero protocols".into()))?;
        if protocols
            .iter()
            .any(|p| p.challenge_space() != first.challenge_space())
        {
            return Err(Error::ChallengeSpaceMismatch);
        }
        Ok(Self { protocols })
    }

    pub fn protocols(&self) -> &[P] {
        &self.protocols
    }
}

impl<P: SigmaProtocol> SigmaProtocol for AndProof<P> {
    type Space = P::Space;
    type Announcement = Vec<P::Announcement>;
    type AnnouncementSecret = Vec<P::AnnouncementSecret>;
    type Response = Vec<P::Response>;
    type Witness = Vec<P::Witness>;

    fn challenge_space(&self) -> &P::Space {
        // `new` guarantees at least one branch.
        self.protocols[0].challenge_space()
    }

    fn generate_announcement(
        &self,
        witnesses: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Announcement, Self::AnnouncementSecret), Error> {
        if witnesses.len() != self.protocols.len() {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let mut announcements = Vec::with_capacity(self.protocols.len());
        let mut secrets = Vec::with_capacity(self.protocols.len());
        for (protocol, witness) in self.protocols.iter().zip(witnesses) {
            let (announcement, secret) = protocol.generate_announcement(witness, rng)?;
            announcements.push(announcement);
            secrets.push(secret);
        }
        Ok((announcements, secrets))
    }

    fn generate_response(
        &self,
        secrets: Self::AnnouncementSecret,
        challenge: &Challenge<Self>,
    ) -> Result<Self::Response, Error> {
        if secrets.len() != self.protocols.len() {
            return Err(Error::InvalidInstanceWitnessPair);
        }
        self.protocols
            .iter()
            .zip(secrets)
            .map(|(protocol, secret)| protocol.generate_response(secret, challenge))
            .collect()
    }

    fn check_transcript(
        &self,
        announcements: &Self::Announcement,
        challenge: &Challenge<Self>,
        responses: &Self::Response,
    ) -> bool {
        announcements.len() == self.protocols.len()
            && responses.len() == self.protocols.len()
            && self
                .protocols
                .iter()
                .zip(announcements)
                .zip(responses)
                .all(|((protocol, announcement), response)| {
                    protocol.check_transcript(announcement, challenge, response)
                })
    }

    fn serialize_announcement(&self, announcements: &Self::Announcement) -> Vec<u8> {
        let parts: Vec<Vec<u8>> = self
            .protocols
            .iter()
            .zip(announcements)
            .map(|(protocol, announcement)| protocol.serialize_announcement(announcement))
            .collect();
        frames(parts.iter().map(Vec::as_slice))
    }

    fn serialize_response(&self, responses: &Self::Response) -> Vec<u8> {
        let parts: Vec<Vec<u8>> = self
            .protocols
            .iter()
            .zip(responses)
            .map(|(protocol, response)| protocol.serialize_response(response))
            .collect();
        frames(parts.iter().map(Vec::as_slice))
    }

    fn restore_announcement(&self, data: &[u8]) -> Result<Self::Announcement, Error> {
        let mut reader = FrameReader::new(data);
        let announcements = self
            .protocols
            .iter()
            .map(|protocol| protocol.restore_announcement(reader.next_frame("AND announcement")?))
            .collect::<Result<Vec<_>, _>>()?;
        reader.finish("AND announcement")?;
        Ok(announcements)
    }

    fn restore_response(&self, data: &[u8]) -> Result<Self::Response, Error> {
        let mut reader = FrameReader::new(data);
        let responses = self
            .protocols
            .iter()
            .map(|protocol| protocol.restore_response(reader.next_frame("AND response")?))
            .collect::<Result<Vec<_>, _>>()?;
        reader.finish("AND response")?;
        Ok(responses)
    }

    fn protocol_identifier(&self) -> Vec<u8> {
        composite_identifier(1, self.protocols.iter().map(|p| p.protocol_identifier()))
    }

    fn instance_label(&self) -> Vec<u8> {
        let labels: Vec<Vec<u8>> = self.protocols.iter().map(|p| p.instance_label()).collect();
        frames(labels.iter().map(Vec::as_slice))
    }
}

impl<P: SigmaProtocolSimulator> SigmaProtocolSimulator for AndProof<P> {
    fn simulate_transcript(
        &self,
        challenge: &Challenge<Self>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<SigmaProtocolTranscript<Self>, Error> {
        let mut announcements = Vec::with_capacity(self.protocols.len());
        let mut responses = Vec::with_capacity(self.protocols.len());
        for protocol in &self.protocols {
            let transcript = protocol.simulate_transcript(challenge, rng)?;
            announcements.push(transcript.announcement);
            responses.push(transcript.response);
        }
        Ok(SigmaProtocolTranscript::new(
            announcements,
            challenge.clone(),
            responses,
        ))
    }
}
