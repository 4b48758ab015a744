//! Round-based runtime for two-party protocols with embedded sub-protocols.
//!
//! A [`BaseProtocolInstance`] runs one party of a high-level protocol. The
//! application provides the per-round logic through [`RoundLogic`]; inside a
//! round the logic exchanges values with the peer through a mailbox
//! ([`RoundContext::send`] / [`RoundContext::receive`]) and may start named
//! sub-protocols, such as the prover or verifier of a Sigma protocol, or another
//! nested [`BaseProtocolInstance`].
//!
//! Every call to [`ProtocolInstance::next_message`] processes one round:
//!
//! 1. the incoming message is dispatched, by name, to every running sub-protocol;
//! 2. arguments (sub-protocols whose verdict matters) that just terminated are
//!    checked, and a rejected argument aborts the execution;
//! 3. the high-level logic runs, unless it already asked to terminate;
//! 4. the outbound message is assembled from the sub-protocol replies and the
//!    values sent through the mailbox.
//!
//! A round message is a [`Representation::Map`] keyed by sub-protocol name, with
//! mailbox values under [`HIGH_LEVEL_KEY`]. The two parties alternate; the party
//! that sends first processes the even rounds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::Error;
use crate::instance::ProtocolInstance;
use crate::representation::Representation;

/// Key of the mailbox payload in a round message.
pub const HIGH_LEVEL_KEY: &str = "__high_level";

fn check_identifier(id: &str) -> Result<(), Error> {
    if id.is_empty() || id.starts_with("__") {
        return Err(Error::ReservedIdentifier(id.to_string()));
    }
    Ok(())
}

/// Application logic of one party, called once per round.
pub trait RoundLogic {
    fn do_round(&mut self, ctx: &mut RoundContext<'_>) -> Result<(), Error>;
}

impl<F> RoundLogic for F
where
    F: FnMut(&mut RoundContext<'_>) -> Result<(), Error>,
{
    fn do_round(&mut self, ctx: &mut RoundContext<'_>) -> Result<(), Error> {
        self(ctx)
    }
}

struct SubProtocol {
    instance: Box<dyn ProtocolInstance>,
    argument: bool,
}

/// What the high-level logic may do during one round.
pub struct RoundContext<'a> {
    round: usize,
    inbox: &'a mut BTreeMap<String, Representation>,
    outbox: BTreeMap<String, Representation>,
    running: &'a BTreeMap<String, SubProtocol>,
    completed: &'a BTreeMap<String, Option<bool>>,
    started: Vec<(String, SubProtocol)>,
    terminate: bool,
}

impl RoundContext<'_> {
    /// Current round; even for the party that sent first.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Queues `value` for the peer; it can be received in the peer's next round.
    ///
    /// # Errors
    /// - [`Error::ReservedIdentifier`] for empty ids or ids starting with `__`.
    /// - [`Error::MailboxCollision`] if `id` was already sent this round.
    pub fn send(&mut self, id: &str, value: impl Into<Representation>) -> Result<(), Error> {
        check_identifier(id)?;
        if self.outbox.contains_key(id) {
            return Err(Error::MailboxCollision(id.to_string()));
        }
        self.outbox.insert(id.to_string(), value.into());
        Ok(())
    }

    /// Takes the value the peer sent under `id`. Each value can be received once.
    ///
    /// # Errors
    /// - [`Error::MailboxEmpty`] if no value is pending under `id`.
    pub fn receive(&mut self, id: &str) -> Result<Representation, Error> {
        self.inbox
            .remove(id)
            .ok_or_else(|| Error::MailboxEmpty(id.to_string()))
    }

    pub fn has_received(&self, id: &str) -> bool {
        self.inbox.contains_key(id)
    }

    /// Starts `instance` under `name`; it is first stepped in the next round.
    pub fn run_sub_protocol(
        &mut self,
        name: &str,
        instance: impl ProtocolInstance + 'static,
    ) -> Result<(), Error> {
        self.start(name, Box::new(instance), false)
    }

    /// Like [`run_sub_protocol`](Self::run_sub_protocol), for a verifying instance
    /// whose rejection aborts the whole execution.
    ///
    /// The instance must report [`ProtocolInstance::is_accepting`]; terminating
    /// with anything but `Some(true)` counts as a rejection.
    pub fn run_argument(
        &mut self,
        name: &str,
        instance: impl ProtocolInstance + 'static,
    ) -> Result<(), Error> {
        self.start(name, Box::new(instance), true)
    }

    fn start(&mut self, name: &str, instance: Box<dyn ProtocolInstance>, argument: bool) -> Result<(), Error> {
        check_identifier(name)?;
        if self.is_running(name) || self.completed.contains_key(name) {
            return Err(Error::DuplicateSubProtocol(name.to_string()));
        }
        self.started
            .push((name.to_string(), SubProtocol { instance, argument }));
        Ok(())
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.running.contains_key(name) || self.started.iter().any(|(n, _)| n == name)
    }

    pub fn has_completed(&self, name: &str) -> bool {
        self.completed.contains_key(name)
    }

    /// Verdict of a completed sub-protocol, if it reports one.
    pub fn accepted(&self, name: &str) -> Option<bool> {
        self.completed.get(name).copied().flatten()
    }

    /// Stops running the logic; the party terminates once its sub-protocols have.
    pub fn terminate(&mut self) {
        self.terminate = true;
    }
}

/// One party of a two-party protocol driven by `L`.
pub struct BaseProtocolInstance<L> {
    logic: L,
    round: usize,
    started: bool,
    sends_first: bool,
    running: BTreeMap<String, SubProtocol>,
    completed: BTreeMap<String, Option<bool>>,
    inbox: BTreeMap<String, Representation>,
    terminate_requested: bool,
    failed: bool,
}

impl<L: RoundLogic> BaseProtocolInstance<L> {
    pub fn new(logic: L, sends_first: bool) -> Self {
        Self {
            logic,
            round: usize::from(!sends_first),
            started: false,
            sends_first,
            running: BTreeMap::new(),
            completed: BTreeMap::new(),
            inbox: BTreeMap::new(),
            terminate_requested: false,
            failed: false,
        }
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }

    pub fn into_logic(self) -> L {
        self.logic
    }

    /// The round the next call to `next_message` will process.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Whether an earlier round failed; a failed instance accepts no further messages.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    fn advance(&mut self, incoming: Option<Representation>) -> Result<Option<Representation>, Error> {
        if !self.started {
            if !self.sends_first && incoming.is_none() {
                return Ok(None);
            }
            self.started = true;
        }

        let mut incoming = match incoming {
            Some(message) => message.into_map()?,
            None => BTreeMap::new(),
        };
        if let Some(values) = incoming.remove(HIGH_LEVEL_KEY) {
            for (id, value) in values.into_map()? {
                if self.inbox.contains_key(&id) {
                    return Err(Error::MailboxCollision(id));
                }
                self.inbox.insert(id, value);
            }
        }
        // The peer's copy of a completed sub-protocol may still send one empty reply.
        incoming.retain(|name, payload| {
            !(self.completed.contains_key(name) && is_empty_payload(payload))
        });
        if let Some(name) = incoming.keys().find(|name| !self.running.contains_key(*name)) {
            if self.completed.contains_key(name) {
                return Err(Error::UnexpectedMessage("completed sub-protocol"));
            }
            return Err(Error::UnknownSubProtocol(name.clone()));
        }

        let mut outgoing = BTreeMap::new();
        for (name, sub) in &mut self.running {
            if let Some(reply) = sub.instance.next_message(incoming.remove(name))? {
                outgoing.insert(name.clone(), reply);
            }
        }

        let finished: Vec<String> = self
            .running
            .iter()
            .filter(|(_, sub)| sub.instance.has_terminated())
            .map(|(name, _)| name.clone())
            .collect();
        for name in finished {
            let Some(sub) = self.running.remove(&name) else {
                continue;
            };
            let verdict = sub.instance.is_accepting();
            if sub.argument && verdict != Some(true) {
                warn!(round = self.round, argument = %name, "argument rejected");
                return Err(Error::ArgumentRejected(name));
            }
            debug!(round = self.round, sub_protocol = %name, ?verdict, "sub-protocol completed");
            self.completed.insert(name, verdict);
        }

        if !self.terminate_requested {
            let mut ctx = RoundContext {
                round: self.round,
                inbox: &mut self.inbox,
                outbox: BTreeMap::new(),
                running: &self.running,
                completed: &self.completed,
                started: Vec::new(),
                terminate: false,
            };
            self.logic.do_round(&mut ctx)?;

            let RoundContext {
                outbox,
                started,
                terminate,
                ..
            } = ctx;
            for (name, sub) in started {
                self.running.insert(name, sub);
            }
            if !outbox.is_empty() {
                outgoing.insert(HIGH_LEVEL_KEY.to_string(), Representation::Map(outbox));
            }
            self.terminate_requested = terminate;
        }

        debug!(
            round = self.round,
            running = ?self.running.keys().collect::<Vec<_>>(),
            outbound = ?outgoing.keys().collect::<Vec<_>>(),
            "round processed"
        );
        self.round += 2;
        Ok(Some(Representation::Map(outgoing)))
    }
}

impl<L: RoundLogic> ProtocolInstance for BaseProtocolInstance<L> {
    /// Processes one round.
    ///
    /// A party that does not send first stays idle (and returns `None`) until
    /// it receives its first message. Any error is final: the instance refuses
    /// further messages afterwards.
    fn next_message(&mut self, incoming: Option<Representation>) -> Result<Option<Representation>, Error> {
        if self.failed || self.has_terminated() {
            return Err(Error::ProtocolTerminated);
        }
        let result = self.advance(incoming);
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn has_terminated(&self) -> bool {
        self.terminate_requested && self.running.is_empty()
    }
}

/// Limits for [`execute_locally`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Messages (in both directions) after which execution is abandoned.
    pub max_messages: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { max_messages: 64 }
    }
}

fn is_empty_payload(payload: &Representation) -> bool {
    matches!(payload, Representation::Map(entries) if entries.is_empty())
}

fn is_empty_message(message: &Option<Representation>) -> bool {
    message.as_ref().map_or(true, is_empty_payload)
}

/// Runs two parties against each other in memory, `first` speaking first.
///
/// Returns the number of steps taken once both parties have terminated. A
/// terminated party may only be handed empty messages.
///
/// # Errors
/// - Any error raised by either party.
/// - [`Error::UnexpectedMessage`] if a message is addressed to a terminated party.
/// - [`Error::RoundLimitExceeded`] after `config.max_messages` steps.
pub fn execute_locally(
    first: &mut dyn ProtocolInstance,
    second: &mut dyn ProtocolInstance,
    config: &RuntimeConfig,
) -> Result<usize, Error> {
    let mut message = None;
    let mut steps = 0;
    let mut first_to_move = true;
    while !(first.has_terminated() && second.has_terminated()) {
        if steps >= config.max_messages {
            return Err(Error::RoundLimitExceeded(config.max_messages));
        }
        let party: &mut dyn ProtocolInstance = if first_to_move {
            &mut *first
        } else {
            &mut *second
        };
        if party.has_terminated() {
            if !is_empty_message(&message) {
                return Err(Error::UnexpectedMessage("terminated"));
            }
            message = None;
        } else {
            message = party.next_message(message.take())?;
        }
        steps += 1;
        first_to_move = !first_to_move;
    }
    debug!(steps, "local execution finished");
    Ok(steps)
}
