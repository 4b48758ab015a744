//! Stateful prover and verifier runners for a single Sigma protocol execution.
//!
//! Both runners implement [`ProtocolInstance`], the message-driven interface the
//! [two-party runtime](crate::two_party) uses to multiplex sub-protocols: each
//! call consumes the peer's latest message (if any) and returns the next message
//! to send (if any). Messages are [`Representation::Bytes`] holding the
//! protocol's canonical encodings.

use rand::{CryptoRng, RngCore};
use tracing::{debug, warn};

use crate::errors::Error;
use crate::representation::Representation;
use crate::traits::{Challenge, SigmaProtocol};

/// One party of an interactive protocol, advanced one message at a time.
pub trait ProtocolInstance {
    /// Processes the peer's message and produces this party's reply.
    ///
    /// `None` as input means nothing arrived this round; `None` as output means
    /// nothing to send.
    fn next_message(&mut self, incoming: Option<Representation>) -> Result<Option<Representation>, Error>;

    fn has_terminated(&self) -> bool;

    /// Verdict of a verifying party once terminated; `None` for parties that do not judge.
    fn is_accepting(&self) -> Option<bool> {
        None
    }
}

impl<T: ProtocolInstance + ?Sized> ProtocolInstance for Box<T> {
    fn next_message(&mut self, incoming: Option<Representation>) -> Result<Option<Representation>, Error> {
        (**self).next_message(incoming)
    }

    fn has_terminated(&self) -> bool {
        (**self).has_terminated()
    }

    fn is_accepting(&self) -> Option<bool> {
        (**self).is_accepting()
    }
}

enum ProverState<P: SigmaProtocol> {
    Init,
    Announced(P::AnnouncementSecret),
    Responded,
}

/// Prover side: `INIT -> ANNOUNCED -> RESPONDED`.
pub struct SigmaProverInstance<P: SigmaProtocol, R> {
    protocol: P,
    witness: P::Witness,
    rng: R,
    state: ProverState<P>,
}

impl<P: SigmaProtocol, R: RngCore + CryptoRng> SigmaProverInstance<P, R> {
    pub fn new(protocol: P, witness: P::Witness, rng: R) -> Self {
        Self {
            protocol,
            witness,
            rng,
            state: ProverState::Init,
        }
    }

    pub fn protocol(&self) -> &P {
        &self.protocol
    }
}

impl<P: SigmaProtocol, R: RngCore + CryptoRng> ProtocolInstance for SigmaProverInstance<P, R> {
    fn next_message(&mut self, incoming: Option<Representation>) -> Result<Option<Representation>, Error> {
        match std::mem::replace(&mut self.state, ProverState::Responded) {
            ProverState::Init => {
                if incoming.is_some() {
                    self.state = ProverState::Init;
                    return Err(Error::UnexpectedMessage("prover INIT"));
                }
                let (announcement, secret) = self
                    .protocol
                    .generate_announcement(&self.witness, &mut self.rng)?;
                self.state = ProverState::Announced(secret);
                debug!("prover announced");
                Ok(Some(self.protocol.serialize_announcement(&announcement).into()))
            }
            ProverState::Announced(secret) => {
                let Some(message) = incoming else {
                    self.state = ProverState::Announced(secret);
                    return Ok(None);
                };
                let challenge = self.protocol.restore_challenge(message.as_bytes()?)?;
                let response = self.protocol.generate_response(secret, &challenge)?;
                debug!("prover responded");
                Ok(Some(self.protocol.serialize_response(&response).into()))
            }
            ProverState::Responded => Err(Error::ProtocolTerminated),
        }
    }

    fn has_terminated(&self) -> bool {
        matches!(self.state, ProverState::Responded)
    }
}

enum VerifierState<P: SigmaProtocol> {
    Init,
    Challenged {
        announcement: P::Announcement,
        challenge: Challenge<P>,
    },
    Finished {
        accepting: bool,
    },
}

/// Verifier side: `INIT -> CHALLENGED -> ACCEPT | REJECT`.
///
/// Messages that do not decode are treated as a rejected transcript, not as an error.
pub struct SigmaVerifierInstance<P: SigmaProtocol, R> {
    protocol: P,
    rng: R,
    state: VerifierState<P>,
}

impl<P: SigmaProtocol, R: RngCore + CryptoRng> SigmaVerifierInstance<P, R> {
    pub fn new(protocol: P, rng: R) -> Self {
        Self {
            protocol,
            rng,
            state: VerifierState::Init,
        }
    }

    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// The challenge sent to the prover, once one was sent.
    pub fn challenge(&self) -> Option<&Challenge<P>> {
        match &self.state {
            VerifierState::Challenged { challenge, .. } => Some(challenge),
            _ => None,
        }
    }
}

impl<P: SigmaProtocol, R: RngCore + CryptoRng> ProtocolInstance for SigmaVerifierInstance<P, R> {
    fn next_message(&mut self, incoming: Option<Representation>) -> Result<Option<Representation>, Error> {
        if matches!(self.state, VerifierState::Finished { .. }) {
            return Err(Error::ProtocolTerminated);
        }
        let Some(message) = incoming else {
            return Ok(None);
        };
        let bytes = message.as_bytes()?;

        match std::mem::replace(&mut self.state, VerifierState::Finished { accepting: false }) {
            VerifierState::Init => match self.protocol.restore_announcement(bytes) {
                Ok(announcement) => {
                    let challenge = self.protocol.generate_challenge(&mut self.rng);
                    let reply = self.protocol.serialize_challenge(&challenge);
                    self.state = VerifierState::Challenged {
                        announcement,
                        challenge,
                    };
                    debug!("verifier challenged");
                    Ok(Some(reply.into()))
                }
                Err(err) => {
                    warn!(%err, "undecodable announcement, rejecting");
                    Ok(None)
                }
            },
            VerifierState::Challenged {
                announcement,
                challenge,
            } => {
                let accepting = match self.protocol.restore_response(bytes) {
                    Ok(response) => self
                        .protocol
                        .check_transcript(&announcement, &challenge, &response),
                    Err(err) => {
                        warn!(%err, "undecodable response, rejecting");
                        false
                    }
                };
                debug!(accepting, "verifier finished");
                self.state = VerifierState::Finished { accepting };
                Ok(None)
            }
            VerifierState::Finished { .. } => Err(Error::ProtocolTerminated),
        }
    }

    fn has_terminated(&self) -> bool {
        matches!(self.state, VerifierState::Finished { .. })
    }

    fn is_accepting(&self) -> Option<bool> {
        match self.state {
            VerifierState::Finished { accepting } => Some(accepting),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modp_protocol::ModPDiscreteLog;
    use num_bigint::BigUint;
    use rand::rngs::OsRng;

    fn statement() -> ModPDiscreteLog {
        ModPDiscreteLog::from_witness(
            BigUint::from(23u32),
            BigUint::from(11u32),
            BigUint::from(4u32),
            &BigUint::from(9u32),
        )
        .unwrap()
    }

    #[test]
    fn prover_and_verifier_agree() {
        let mut prover = SigmaProverInstance::new(statement(), BigUint::from(9u32), OsRng);
        let mut verifier = SigmaVerifierInstance::new(statement(), OsRng);

        assert_eq!(verifier.next_message(None).unwrap(), None);
        let announcement = prover.next_message(None).unwrap();
        let challenge = verifier.next_message(announcement).unwrap();
        assert!(verifier.challenge().is_some());
        assert_eq!(prover.next_message(None).unwrap(), None);
        let response = prover.next_message(challenge).unwrap();
        assert!(prover.has_terminated());
        assert_eq!(verifier.next_message(response).unwrap(), None);
        assert!(verifier.has_terminated());
        assert_eq!(verifier.is_accepting(), Some(true));
        assert!(matches!(prover.next_message(None), Err(Error::ProtocolTerminated)));
    }

    #[test]
    fn garbage_response_rejects() {
        let mut prover = SigmaProverInstance::new(statement(), BigUint::from(9u32), OsRng);
        let mut verifier = SigmaVerifierInstance::new(statement(), OsRng);
        let announcement = prover.next_message(None).unwrap();
        verifier.next_message(announcement).unwrap();
        verifier
            .next_message(Some(Representation::Bytes(vec![0xff; 7])))
            .unwrap();
        assert_eq!(verifier.is_accepting(), Some(false));
    }

    #[test]
    fn wrong_message_shape_is_an_error() {
        let mut verifier = SigmaVerifierInstance::new(statement(), OsRng);
        assert!(matches!(
            verifier.next_message(Some(Representation::empty_map())),
            Err(Error::UnexpectedRepresentation { .. })
        ));
    }
}
