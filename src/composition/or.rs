//! Disjunction of two Sigma protocols.
//!
//! The prover knows a witness for one branch only. It simulates the other branch
//! with a challenge of its own choosing, runs the known branch honestly, and
//! answers the verifier's challenge `c` with `c_known = c - c_simulated`. The
//! response carries the left branch challenge; the verifier recomputes the right
//! one and checks both branches.

use rand::{CryptoRng, RngCore};

use super::composite_identifier;
use crate::challenge::{ChallengeSpace, SubtractiveChallengeSpace};
use crate::errors::Error;
use crate::representation::{frames, FrameReader};
use crate::traits::{Challenge, SigmaProtocol, SigmaProtocolSimulator, SigmaProtocolTranscript};

/// `P OR Q`, where both branches share a subtractive challenge space.
#[derive(Clone, Debug)]
pub struct OrProof<P, Q> {
    left: P,
    right: Q,
}

/// Witness for exactly one branch of an [`OrProof`].
pub enum OrWitness<P: SigmaProtocol, Q: SigmaProtocol> {
    Left(P::Witness),
    Right(Q::Witness),
}

/// Prover state: the honest branch's secret and the simulated branch's transcript.
pub enum OrAnnouncementSecret<P: SigmaProtocol, Q: SigmaProtocol> {
    Left {
        secret: P::AnnouncementSecret,
        simulated: SigmaProtocolTranscript<Q>,
    },
    Right {
        secret: Q::AnnouncementSecret,
        simulated: SigmaProtocolTranscript<P>,
    },
}

/// Third message of an [`OrProof`].
pub struct OrResponse<P: SigmaProtocol, Q: SigmaProtocol> {
    pub left_challenge: Challenge<P>,
    pub left: P::Response,
    pub right: Q::Response,
}

impl<P: SigmaProtocol, Q: SigmaProtocol> Clone for OrResponse<P, Q> {
    fn clone(&self) -> Self {
        Self {
            left_challenge: self.left_challenge.clone(),
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

impl<P, Q> OrProof<P, Q>
where
    P: SigmaProtocol,
    Q: SigmaProtocol<Space = P::Space>,
    P::Space: SubtractiveChallengeSpace,
{
    /// # Errors
    /// - [`Error::ChallengeSpaceMismatch`] if the branches disagree on the challenge space.
    pub fn new(left: P, right: Q) -> Result<Self, Error> {
        if left.challenge_space() != right.challenge_space() {
            return Err(Error::ChallengeSpaceMismatch);
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> &P {
        &self.left
    }

    pub fn right(&self) -> &Q {
        &self.right
    }
}

impl<P, Q> SigmaProtocol for OrProof<P, Q>
where
    P: SigmaProtocolSimulator,
    Q: SigmaProtocolSimulator<Space = P::Space>,
    P::Space: SubtractiveChallengeSpace,
{
    type Space = P::Space;
    type Announcement = (P::Announcement, Q::Announcement);
    type AnnouncementSecret = OrAnnouncementSecret<P, Q>;
    type Response = OrResponse<P, Q>;
    type Witness = OrWitness<P, Q>;

    fn challenge_space(&self) -> &P::Space {
        self.left.challenge_space()
    }

    fn generate_announcement(
        &self,
        witness: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Announcement, Self::AnnouncementSecret), Error> {
        match witness {
            OrWitness::Left(witness) => {
                let challenge = self.right.generate_challenge(rng);
                let simulated = self.right.simulate_transcript(&challenge, rng)?;
                let (announcement, secret) = self.left.generate_announcement(witness, rng)?;
                Ok((
                    (announcement, simulated.announcement.clone()),
                    OrAnnouncementSecret::Left { secret, simulated },
                ))
            }
            OrWitness::Right(witness) => {
                let challenge = self.left.generate_challenge(rng);
                let simulated = self.left.simulate_transcript(&challenge, rng)?;
                let (announcement, secret) = self.right.generate_announcement(witness, rng)?;
                Ok((
                    (simulated.announcement.clone(), announcement),
                    OrAnnouncementSecret::Right { secret, simulated },
                ))
            }
        }
    }

    fn generate_response(
        &self,
        secret: Self::AnnouncementSecret,
        challenge: &Challenge<Self>,
    ) -> Result<Self::Response, Error> {
        let space = self.challenge_space();
        match secret {
            OrAnnouncementSecret::Left { secret, simulated } => {
                let left_challenge = space.sub(challenge, &simulated.challenge);
                let left = self.left.generate_response(secret, &left_challenge)?;
                Ok(OrResponse {
                    left_challenge,
                    left,
                    right: simulated.response,
                })
            }
            OrAnnouncementSecret::Right { secret, simulated } => {
                let right_challenge = space.sub(challenge, &simulated.challenge);
                let right = self.right.generate_response(secret, &right_challenge)?;
                Ok(OrResponse {
                    left_challenge: simulated.challenge,
                    left: simulated.response,
                    right,
                })
            }
        }
    }

    fn check_transcript(
        &self,
        (left_announcement, right_announcement): &Self::Announcement,
        challenge: &Challenge<Self>,
        response: &Self::Response,
    ) -> bool {
        let right_challenge = self.challenge_space().sub(challenge, &response.left_challenge);
        self.left
            .check_transcript(left_announcement, &response.left_challenge, &response.left)
            && self
                .right
                .check_transcript(right_announcement, &right_challenge, &response.right)
    }

    fn serialize_announcement(&self, (left, right): &Self::Announcement) -> Vec<u8> {
        frames([
            self.left.serialize_announcement(left).as_slice(),
            self.right.serialize_announcement(right).as_slice(),
        ])
    }

    fn serialize_response(&self, response: &Self::Response) -> Vec<u8> {
        frames([
            self.challenge_space()
                .serialize_challenge(&response.left_challenge)
                .as_slice(),
            self.left.serialize_response(&response.left).as_slice(),
            self.right.serialize_response(&response.right).as_slice(),
        ])
    }

    fn restore_announcement(&self, data: &[u8]) -> Result<Self::Announcement, Error> {
        let mut reader = FrameReader::new(data);
        let left = self
            .left
            .restore_announcement(reader.next_frame("OR announcement")?)?;
        let right = self
            .right
            .restore_announcement(reader.next_frame("OR announcement")?)?;
        reader.finish("OR announcement")?;
        Ok((left, right))
    }

    fn restore_response(&self, data: &[u8]) -> Result<Self::Response, Error> {
        let mut reader = FrameReader::new(data);
        let left_challenge = self
            .challenge_space()
            .restore_challenge(reader.next_frame("OR response")?)?;
        let left = self.left.restore_response(reader.next_frame("OR response")?)?;
        let right = self.right.restore_response(reader.next_frame("OR response")?)?;
        reader.finish("OR response")?;
        Ok(OrResponse {
            left_challenge,
            left,
            right,
        })
    }

    fn protocol_identifier(&self) -> Vec<u8> {
        composite_identifier(
            2,
            [self.left.protocol_identifier(), self.right.protocol_identifier()],
        )
    }

    fn instance_label(&self) -> Vec<u8> {
        frames([
            self.left.instance_label().as_slice(),
            self.right.instance_label().as_slice(),
        ])
    }
}

impl<P, Q> SigmaProtocolSimulator for OrProof<P, Q>
where
    P: SigmaProtocolSimulator,
    Q: SigmaProtocolSimulator<Space = P::Space>,
    P::Space: SubtractiveChallengeSpace,
{
    fn simulate_transcript(
        &self,
        challenge: &Challenge<Self>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<SigmaProtocolTranscript<Self>, Error> {
        let space = self.challenge_space();
        let left_challenge = space.generate_random_challenge(rng);
        let right_challenge = space.sub(challenge, &left_challenge);
        let left = self.left.simulate_transcript(&left_challenge, rng)?;
        let right = self.right.simulate_transcript(&right_challenge, rng)?;
        Ok(SigmaProtocolTranscript::new(
            (left.announcement, right.announcement),
            challenge.clone(),
            OrResponse {
                left_challenge,
                left: left.response,
                right: right.response,
            },
        ))
    }
}
