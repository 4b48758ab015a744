//! Proofs of partial knowledge over an arbitrary AND/OR tree of named leaves.
//!
//! The prover supplies witnesses for a set of leaves (typically the result of
//! evaluating an access structure). Every subtree the witnesses do not satisfy is
//! simulated; in each OR node the challenge is split so that the simulated
//! children keep their self-chosen challenges and the satisfied child answers the
//! remainder. An OR response carries the challenges of all children but the
//! last; the verifier recomputes the last one.

use std::collections::{BTreeMap, BTreeSet};

use rand::{CryptoRng, RngCore};
use tracing::instrument;

use super::composite_identifier;
use crate::challenge::{ChallengeSpace, SubtractiveChallengeSpace};
use crate::errors::Error;
use crate::representation::{frames, FrameReader};
use crate::traits::{Challenge, SigmaProtocol, SigmaProtocolSimulator, SigmaProtocolTranscript};

/// Encoding of a message whose shape disagrees with the formula.
///
/// Such values are never produced by the prover or by restore, and
/// `check_transcript` rejects them, so they encode as the empty string.
fn shape_mismatch(what: &str) -> Vec<u8> {
    if cfg!(debug_assertions) {
        panic!("{what} does not match the shape of the formula");
    }
    Vec::new()
}

/// Boolean formula over named Sigma protocol leaves.
#[derive(Clone, Debug)]
pub enum PartialKnowledge<L> {
    Leaf { name: String, protocol: L },
    And(Vec<PartialKnowledge<L>>),
    Or(Vec<PartialKnowledge<L>>),
}

impl<L> PartialKnowledge<L> {
    pub fn leaf(name: impl Into<String>, protocol: L) -> Self {
        Self::Leaf {
            name: name.into(),
            protocol,
        }
    }

    pub fn and(children: impl IntoIterator<Item = PartialKnowledge<L>>) -> Self {
        Self::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = PartialKnowledge<L>>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    /// Names of all leaves, left to right.
    pub fn leaf_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_leaves(&mut |name, _| names.push(name));
        names
    }

    /// Whether knowing witnesses for exactly the leaves in `known` satisfies the formula.
    pub fn is_satisfied_by<W>(&self, known: &BTreeMap<String, W>) -> bool {
        match self {
            Self::Leaf { name, .. } => known.contains_key(name),
            Self::And(children) => children.iter().all(|child| child.is_satisfied_by(known)),
            Self::Or(children) => children.iter().any(|child| child.is_satisfied_by(known)),
        }
    }

    fn collect_leaves<'a>(&'a self, visit: &mut impl FnMut(&'a str, &'a L)) {
        match self {
            Self::Leaf { name, protocol } => visit(name, protocol),
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_leaves(visit);
                }
            }
        }
    }

    fn has_empty_gate(&self) -> bool {
        match self {
            Self::Leaf { .. } => false,
            Self::And(children) | Self::Or(children) => {
                children.is_empty() || children.iter().any(Self::has_empty_gate)
            }
        }
    }
}

/// Witnesses keyed by leaf name; the key set is the satisfiable leaf set.
pub type PartialKnowledgeWitness<L> = BTreeMap<String, <L as SigmaProtocol>::Witness>;

/// Announcement mirroring the shape of the formula.
pub enum PartialAnnouncement<L: SigmaProtocol> {
    Leaf(L::Announcement),
    And(Vec<PartialAnnouncement<L>>),
    Or(Vec<PartialAnnouncement<L>>),
}

impl<L: SigmaProtocol> Clone for PartialAnnouncement<L> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(announcement) => Self::Leaf(announcement.clone()),
            Self::And(children) => Self::And(children.clone()),
            Self::Or(children) => Self::Or(children.clone()),
        }
    }
}

/// Response mirroring the shape of the formula.
///
/// `Or(challenges, responses)` holds one challenge fewer than there are children.
pub enum PartialResponse<L: SigmaProtocol> {
    Leaf(L::Response),
    And(Vec<PartialResponse<L>>),
    Or(Vec<Challenge<L>>, Vec<PartialResponse<L>>),
}

impl<L: SigmaProtocol> Clone for PartialResponse<L> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(response) => Self::Leaf(response.clone()),
            Self::And(children) => Self::And(children.clone()),
            Self::Or(challenges, children) => Self::Or(challenges.clone(), children.clone()),
        }
    }
}

/// Prover state: honest leaf secrets, or complete simulated subtrees.
pub enum PartialAnnouncementSecret<L: SigmaProtocol> {
    Leaf(L::AnnouncementSecret),
    Simulated {
        challenge: Challenge<L>,
        response: PartialResponse<L>,
    },
    And(Vec<PartialAnnouncementSecret<L>>),
    Or(Vec<PartialAnnouncementSecret<L>>),
}

/// A [`SigmaProtocol`] for a validated [`PartialKnowledge`] formula.
#[derive(Clone, Debug)]
pub struct ProofOfPartialKnowledge<L: SigmaProtocol> {
    root: PartialKnowledge<L>,
    space: L::Space,
}

impl<L> ProofOfPartialKnowledge<L>
where
    L: SigmaProtocolSimulator,
    L::Space: SubtractiveChallengeSpace,
{
    /// # Errors
    /// - [`Error::InvalidParameters`] for duplicate leaf names or empty AND/OR gates.
    /// - [`Error::ChallengeSpaceMismatch`] if the leaves disagree on the challenge space.
    pub fn new(root: PartialKnowledge<L>) -> Result<Self, Error> {
        if root.has_empty_gate() {
            return Err(Error::InvalidParameters("empty AND/OR gate".into()));
        }

        let mut names = BTreeSet::new();
        let mut spaces = Vec::new();
        let mut duplicate = None;
        root.collect_leaves(&mut |name, protocol| {
            if !names.insert(name) {
                duplicate = Some(name.to_string());
            }
            spaces.push(protocol.challenge_space().clone());
        });
        if let Some(name) = duplicate {
            return Err(Error::InvalidParameters(format!("duplicate leaf name {name:?}")));
        }
        let space = spaces
            .first()
            .cloned()
            .ok_or_else(|| Error::InvalidParameters("formula without leaves".into()))?;
        if spaces.iter().any(|s| *s != space) {
            return Err(Error::ChallengeSpaceMismatch);
        }
        drop(names);
        Ok(Self { root, space })
    }

    pub fn formula(&self) -> &PartialKnowledge<L> {
        &self.root
    }

    fn announce(
        &self,
        node: &PartialKnowledge<L>,
        witnesses: &PartialKnowledgeWitness<L>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(PartialAnnouncement<L>, PartialAnnouncementSecret<L>), Error> {
        match node {
            PartialKnowledge::Leaf { name, protocol } => {
                let witness = witnesses
                    .get(name)
                    .ok_or(Error::InvalidInstanceWitnessPair)?;
                let (announcement, secret) = protocol.generate_announcement(witness, rng)?;
                Ok((
                    PartialAnnouncement::Leaf(announcement),
                    PartialAnnouncementSecret::Leaf(secret),
                ))
            }
            PartialKnowledge::And(children) => {
                let mut announcements = Vec::with_capacity(children.len());
                let mut secrets = Vec::with_capacity(children.len());
                for child in children {
                    let (announcement, secret) = self.announce(child, witnesses, rng)?;
                    announcements.push(announcement);
                    secrets.push(secret);
                }
                Ok((
                    PartialAnnouncement::And(announcements),
                    PartialAnnouncementSecret::And(secrets),
                ))
            }
            PartialKnowledge::Or(children) => {
                let known = children
                    .iter()
                    .position(|child| child.is_satisfied_by(witnesses))
                    .ok_or(Error::InvalidInstanceWitnessPair)?;
                let mut announcements = Vec::with_capacity(children.len());
                let mut secrets = Vec::with_capacity(children.len());
                for (index, child) in children.iter().enumerate() {
                    if index == known {
                        let (announcement, secret) = self.announce(child, witnesses, rng)?;
                        announcements.push(announcement);
                        secrets.push(secret);
                    } else {
                        let challenge = self.space.generate_random_challenge(rng);
                        let (announcement, response) = self.simulate(child, &challenge, rng)?;
                        announcements.push(announcement);
                        secrets.push(PartialAnnouncementSecret::Simulated {
                            challenge,
                            response,
                        });
                    }
                }
                Ok((
                    PartialAnnouncement::Or(announcements),
                    PartialAnnouncementSecret::Or(secrets),
                ))
            }
        }
    }

    fn simulate(
        &self,
        node: &PartialKnowledge<L>,
        challenge: &Challenge<L>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(PartialAnnouncement<L>, PartialResponse<L>), Error> {
        match node {
            PartialKnowledge::Leaf { protocol, .. } => {
                let transcript = protocol.simulate_transcript(challenge, rng)?;
                Ok((
                    PartialAnnouncement::Leaf(transcript.announcement),
                    PartialResponse::Leaf(transcript.response),
                ))
            }
            PartialKnowledge::And(children) => {
                let mut announcements = Vec::with_capacity(children.len());
                let mut responses = Vec::with_capacity(children.len());
                for child in children {
                    let (announcement, response) = self.simulate(child, challenge, rng)?;
                    announcements.push(announcement);
                    responses.push(response);
                }
                Ok((
                    PartialAnnouncement::And(announcements),
                    PartialResponse::And(responses),
                ))
            }
            PartialKnowledge::Or(children) => {
                let mut challenges: Vec<Challenge<L>> = (1..children.len())
                    .map(|_| self.space.generate_random_challenge(rng))
                    .collect();
                let last = self.remaining_challenge(challenge, &challenges);
                let mut announcements = Vec::with_capacity(children.len());
                let mut responses = Vec::with_capacity(children.len());
                for (child, child_challenge) in children
                    .iter()
                    .zip(challenges.iter().chain(core::iter::once(&last)))
                {
                    let (announcement, response) = self.simulate(child, child_challenge, rng)?;
                    announcements.push(announcement);
                    responses.push(response);
                }
                Ok((
                    PartialAnnouncement::Or(announcements),
                    PartialResponse::Or(challenges, responses),
                ))
            }
        }
    }

    fn respond(
        &self,
        node: &PartialKnowledge<L>,
        secret: PartialAnnouncementSecret<L>,
        challenge: &Challenge<L>,
    ) -> Result<PartialResponse<L>, Error> {
        match (node, secret) {
            (PartialKnowledge::Leaf { protocol, .. }, PartialAnnouncementSecret::Leaf(secret)) => {
                Ok(PartialResponse::Leaf(
                    protocol.generate_response(secret, challenge)?,
                ))
            }
            (PartialKnowledge::And(children), PartialAnnouncementSecret::And(secrets))
                if children.len() == secrets.len() =>
            {
                children
                    .iter()
                    .zip(secrets)
                    .map(|(child, secret)| self.respond(child, secret, challenge))
                    .collect::<Result<Vec<_>, _>>()
                    .map(PartialResponse::And)
            }
            (PartialKnowledge::Or(children), PartialAnnouncementSecret::Or(secrets))
                if children.len() == secrets.len() =>
            {
                let simulated: Vec<Challenge<L>> = secrets
                    .iter()
                    .filter_map(|secret| match secret {
                        PartialAnnouncementSecret::Simulated { challenge, .. } => {
                            Some(challenge.clone())
                        }
                        _ => None,
                    })
                    .collect();
                let known_challenge = self.remaining_challenge(challenge, &simulated);

                let mut challenges = Vec::with_capacity(children.len());
                let mut responses = Vec::with_capacity(children.len());
                for (child, secret) in children.iter().zip(secrets) {
                    match secret {
                        PartialAnnouncementSecret::Simulated {
                            challenge,
                            response,
                        } => {
                            challenges.push(challenge);
                            responses.push(response);
                        }
                        secret => {
                            responses.push(self.respond(child, secret, &known_challenge)?);
                            challenges.push(known_challenge.clone());
                        }
                    }
                }
                challenges.pop();
                Ok(PartialResponse::Or(challenges, responses))
            }
            _ => Err(Error::InvalidInstanceWitnessPair),
        }
    }

    fn check(
        &self,
        node: &PartialKnowledge<L>,
        announcement: &PartialAnnouncement<L>,
        challenge: &Challenge<L>,
        response: &PartialResponse<L>,
    ) -> bool {
        match (node, announcement, response) {
            (
                PartialKnowledge::Leaf { protocol, .. },
                PartialAnnouncement::Leaf(announcement),
                PartialResponse::Leaf(response),
            ) => protocol.check_transcript(announcement, challenge, response),
            (
                PartialKnowledge::And(children),
                PartialAnnouncement::And(announcements),
                PartialResponse::And(responses),
            ) => {
                children.len() == announcements.len()
                    && children.len() == responses.len()
                    && children
                        .iter()
                        .zip(announcements)
                        .zip(responses)
                        .all(|((child, announcement), response)| {
                            self.check(child, announcement, challenge, response)
                        })
            }
            (
                PartialKnowledge::Or(children),
                PartialAnnouncement::Or(announcements),
                PartialResponse::Or(challenges, responses),
            ) => {
                if children.len() != announcements.len()
                    || children.len() != responses.len()
                    || challenges.len() + 1 != children.len()
                {
                    return false;
                }
                let last = self.remaining_challenge(challenge, challenges);
                children
                    .iter()
                    .zip(announcements)
                    .zip(responses)
                    .zip(challenges.iter().chain(core::iter::once(&last)))
                    .all(|(((child, announcement), response), child_challenge)| {
                        self.check(child, announcement, child_challenge, response)
                    })
            }
            _ => false,
        }
    }

    /// `challenge - sum(shares)`.
    fn remaining_challenge(&self, challenge: &Challenge<L>, shares: &[Challenge<L>]) -> Challenge<L> {
        let spent = shares
            .iter()
            .fold(self.space.zero(), |acc, share| self.space.add(&acc, share));
        self.space.sub(challenge, &spent)
    }

    fn serialize_announcement_node(
        &self,
        node: &PartialKnowledge<L>,
        announcement: &PartialAnnouncement<L>,
    ) -> Vec<u8> {
        match (node, announcement) {
            (PartialKnowledge::Leaf { protocol, .. }, PartialAnnouncement::Leaf(announcement)) => {
                protocol.serialize_announcement(announcement)
            }
            (PartialKnowledge::And(children), PartialAnnouncement::And(announcements))
            | (PartialKnowledge::Or(children), PartialAnnouncement::Or(announcements)) => {
                let parts: Vec<Vec<u8>> = children
                    .iter()
                    .zip(announcements)
                    .map(|(child, announcement)| self.serialize_announcement_node(child, announcement))
                    .collect();
                frames(parts.iter().map(Vec::as_slice))
            }
            _ => shape_mismatch("announcement"),
        }
    }

    fn serialize_response_node(
        &self,
        node: &PartialKnowledge<L>,
        response: &PartialResponse<L>,
    ) -> Vec<u8> {
        match (node, response) {
            (PartialKnowledge::Leaf { protocol, .. }, PartialResponse::Leaf(response)) => {
                protocol.serialize_response(response)
            }
            (PartialKnowledge::And(children), PartialResponse::And(responses)) => {
                let parts: Vec<Vec<u8>> = children
                    .iter()
                    .zip(responses)
                    .map(|(child, response)| self.serialize_response_node(child, response))
                    .collect();
                frames(parts.iter().map(Vec::as_slice))
            }
            (PartialKnowledge::Or(children), PartialResponse::Or(challenges, responses)) => {
                let mut parts: Vec<Vec<u8>> = challenges
                    .iter()
                    .map(|challenge| self.space.serialize_challenge(challenge))
                    .collect();
                parts.extend(
                    children
                        .iter()
                        .zip(responses)
                        .map(|(child, response)| self.serialize_response_node(child, response)),
                );
                frames(parts.iter().map(Vec::as_slice))
            }
            _ => shape_mismatch("response"),
        }
    }

    fn restore_announcement_node(
        &self,
        node: &PartialKnowledge<L>,
        data: &[u8],
    ) -> Result<PartialAnnouncement<L>, Error> {
        match node {
            PartialKnowledge::Leaf { protocol, .. } => {
                Ok(PartialAnnouncement::Leaf(protocol.restore_announcement(data)?))
            }
            PartialKnowledge::And(children) | PartialKnowledge::Or(children) => {
                let mut reader = FrameReader::new(data);
                let announcements = children
                    .iter()
                    .map(|child| {
                        self.restore_announcement_node(
                            child,
                            reader.next_frame("partial-knowledge announcement")?,
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                reader.finish("partial-knowledge announcement")?;
                Ok(match node {
                    PartialKnowledge::And(_) => PartialAnnouncement::And(announcements),
                    _ => PartialAnnouncement::Or(announcements),
                })
            }
        }
    }

    fn restore_response_node(
        &self,
        node: &PartialKnowledge<L>,
        data: &[u8],
    ) -> Result<PartialResponse<L>, Error> {
        match node {
            PartialKnowledge::Leaf { protocol, .. } => {
                Ok(PartialResponse::Leaf(protocol.restore_response(data)?))
            }
            PartialKnowledge::And(children) => {
                let mut reader = FrameReader::new(data);
                let responses = children
                    .iter()
                    .map(|child| {
                        self.restore_response_node(child, reader.next_frame("AND response")?)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                reader.finish("AND response")?;
                Ok(PartialResponse::And(responses))
            }
            PartialKnowledge::Or(children) => {
                let mut reader = FrameReader::new(data);
                let challenges = (1..children.len())
                    .map(|_| {
                        self.space
                            .restore_challenge(reader.next_frame("OR challenge")?)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let responses = children
                    .iter()
                    .map(|child| {
                        self.restore_response_node(child, reader.next_frame("OR response")?)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                reader.finish("OR response")?;
                Ok(PartialResponse::Or(challenges, responses))
            }
        }
    }

    fn identifier_node(node: &PartialKnowledge<L>) -> Vec<u8> {
        match node {
            PartialKnowledge::Leaf { protocol, .. } => {
                composite_identifier(0, [protocol.protocol_identifier()])
            }
            PartialKnowledge::And(children) => {
                composite_identifier(1, children.iter().map(Self::identifier_node))
            }
            PartialKnowledge::Or(children) => {
                composite_identifier(2, children.iter().map(Self::identifier_node))
            }
        }
    }

    fn label_node(node: &PartialKnowledge<L>) -> Vec<u8> {
        match node {
            PartialKnowledge::Leaf { name, protocol } => {
                frames([name.as_bytes(), protocol.instance_label().as_slice()])
            }
            PartialKnowledge::And(children) | PartialKnowledge::Or(children) => {
                let labels: Vec<Vec<u8>> = children.iter().map(Self::label_node).collect();
                frames(labels.iter().map(Vec::as_slice))
            }
        }
    }
}

impl<L> SigmaProtocol for ProofOfPartialKnowledge<L>
where
    L: SigmaProtocolSimulator,
    L::Space: SubtractiveChallengeSpace,
{
    type Space = L::Space;
    type Announcement = PartialAnnouncement<L>;
    type AnnouncementSecret = PartialAnnouncementSecret<L>;
    type Response = PartialResponse<L>;
    type Witness = PartialKnowledgeWitness<L>;

    fn challenge_space(&self) -> &L::Space {
        &self.space
    }

    /// # Errors
    /// - [`Error::InvalidInstanceWitnessPair`] if the witnessed leaves do not satisfy the formula.
    #[instrument(skip_all, fields(known_leaves = witnesses.len()))]
    fn generate_announcement(
        &self,
        witnesses: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Announcement, Self::AnnouncementSecret), Error> {
        if !self.root.is_satisfied_by(witnesses) {
            return Err(Error::InvalidInstanceWitnessPair);
        }
        self.announce(&self.root, witnesses, rng)
    }

    fn generate_response(
        &self,
        secret: Self::AnnouncementSecret,
        challenge: &Challenge<Self>,
    ) -> Result<Self::Response, Error> {
        self.respond(&self.root, secret, challenge)
    }

    fn check_transcript(
        &self,
        announcement: &Self::Announcement,
        challenge: &Challenge<Self>,
        response: &Self::Response,
    ) -> bool {
        self.check(&self.root, announcement, challenge, response)
    }

    fn serialize_announcement(&self, announcement: &Self::Announcement) -> Vec<u8> {
        self.serialize_announcement_node(&self.root, announcement)
    }

    fn serialize_response(&self, response: &Self::Response) -> Vec<u8> {
        self.serialize_response_node(&self.root, response)
    }

    fn restore_announcement(&self, data: &[u8]) -> Result<Self::Announcement, Error> {
        self.restore_announcement_node(&self.root, data)
    }

    fn restore_response(&self, data: &[u8]) -> Result<Self::Response, Error> {
        self.restore_response_node(&self.root, data)
    }

    fn protocol_identifier(&self) -> Vec<u8> {
        Self::identifier_node(&self.root)
    }

    fn instance_label(&self) -> Vec<u8> {
        Self::label_node(&self.root)
    }
}

impl<L> SigmaProtocolSimulator for ProofOfPartialKnowledge<L>
where
    L: SigmaProtocolSimulator,
    L::Space: SubtractiveChallengeSpace,
{
    fn simulate_transcript(
        &self,
        challenge: &Challenge<Self>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<SigmaProtocolTranscript<Self>, Error> {
        let (announcement, response) = self.simulate(&self.root, challenge, rng)?;
        Ok(SigmaProtocolTranscript::new(
            announcement,
            challenge.clone(),
            response,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modp_protocol::ModPDiscreteLog;
    use crate::traits::run_honestly;
    use num_bigint::BigUint;
    use rand::rngs::OsRng;

    #[test]
    fn satisfiability_follows_the_gates() {
        // a AND (b OR c)
        let formula = PartialKnowledge::and([
            PartialKnowledge::leaf("a", ()),
            PartialKnowledge::or([PartialKnowledge::leaf("b", ()), PartialKnowledge::leaf("c", ())]),
        ]);
        assert_eq!(formula.leaf_names(), vec!["a", "b", "c"]);

        let known = |names: &[&str]| -> BTreeMap<String, ()> {
            names.iter().map(|name| (name.to_string(), ())).collect()
        };
        assert!(formula.is_satisfied_by(&known(&["a", "c"])));
        assert!(formula.is_satisfied_by(&known(&["a", "b", "c"])));
        assert!(!formula.is_satisfied_by(&known(&["b", "c"])));
        assert!(!formula.is_satisfied_by(&known(&["a"])));
    }

    fn modp_or() -> (
        ProofOfPartialKnowledge<ModPDiscreteLog>,
        SigmaProtocolTranscript<ProofOfPartialKnowledge<ModPDiscreteLog>>,
    ) {
        let leaf = |x: u32| {
            ModPDiscreteLog::from_witness(
                BigUint::from(23u32),
                BigUint::from(11u32),
                BigUint::from(4u32),
                &BigUint::from(x),
            )
            .unwrap()
        };
        let proof = ProofOfPartialKnowledge::new(PartialKnowledge::or([
            PartialKnowledge::leaf("a", leaf(2)),
            PartialKnowledge::leaf("b", leaf(3)),
        ]))
        .unwrap();
        let witnesses = BTreeMap::from([("a".to_string(), BigUint::from(2u32))]);
        let transcript = run_honestly(&proof, &witnesses, &mut OsRng).unwrap();
        (proof, transcript)
    }

    fn reshaped(announcement: &PartialAnnouncement<ModPDiscreteLog>) -> PartialAnnouncement<ModPDiscreteLog> {
        match announcement.clone() {
            PartialAnnouncement::Or(children) => PartialAnnouncement::And(children),
            other => other,
        }
    }

    #[test]
    fn mismatched_shapes_do_not_verify() {
        let (proof, transcript) = modp_or();
        assert!(transcript.verify(&proof));

        let announcement = reshaped(&transcript.announcement);
        assert!(!proof.check_transcript(&announcement, &transcript.challenge, &transcript.response));
        assert!(!proof.check_transcript(
            &transcript.announcement,
            &transcript.challenge,
            &PartialResponse::And(vec![])
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not match the shape of the formula")]
    fn serializing_a_mismatched_shape_panics_in_debug_builds() {
        let (proof, transcript) = modp_or();
        proof.serialize_announcement(&reshaped(&transcript.announcement));
    }

    #[test]
    fn empty_gates_are_detected() {
        let formula: PartialKnowledge<()> =
            PartialKnowledge::or([PartialKnowledge::leaf("a", ()), PartialKnowledge::and([])]);
        assert!(formula.has_empty_gate());
        assert!(!PartialKnowledge::leaf("a", ()).has_empty_gate());
    }
}
