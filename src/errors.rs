//! # Error: Error Types for Sigma Protocols and their Runtime.
//!
//! This module defines the [`Error`] enum, which enumerates the possible failure modes
//! encountered while configuring, executing or restoring Sigma protocols and while
//! running two-party protocols on top of them.
//!
//! A transcript or proof that does not verify is *not* an error: verification
//! predicates return `bool` and callers branch on them. The variants below cover:
//! - configuration mistakes (mismatched challenge spaces, reserved identifiers),
//! - malformed encodings handed to a restore function,
//! - protocol-fatal events in the two-party runtime (a rejected argument).

/// Represents an error encountered during the configuration or execution of a protocol.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The proof is invalid: verification failed.
    #[error("Verification failed.")]
    VerificationFailure,
    /// Indicates an invalid statement/witness pair.
    #[error("Invalid instance/witness pair.")]
    InvalidInstanceWitnessPair,
    /// Composed branches do not share the same challenge space.
    #[error("Composed protocols do not share a challenge space.")]
    ChallengeSpaceMismatch,
    /// Public parameters or statements rejected at construction.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    /// A byte string could not be restored into the expected message.
    #[error("Invalid encoding of {0}.")]
    InvalidEncoding(&'static str),
    /// A structured value had the wrong shape for the requested restore.
    #[error("Unexpected representation, expected {expected}.")]
    UnexpectedRepresentation {
        /// The shape that was expected.
        expected: &'static str,
    },
    /// A mailbox id or sub-protocol name collides with a reserved key.
    #[error("Identifier {0:?} is reserved.")]
    ReservedIdentifier(String),
    /// `receive` was called on a mailbox id with no pending value.
    #[error("No pending value for mailbox id {0:?}.")]
    MailboxEmpty(String),
    /// A value was sent twice on the same mailbox id before being consumed.
    #[error("Mailbox id {0:?} already holds an unread value.")]
    MailboxCollision(String),
    /// A round message addressed a sub-protocol that is not running.
    #[error("No running sub-protocol named {0:?}.")]
    UnknownSubProtocol(String),
    /// A sub-protocol was registered under a name already in use.
    #[error("A sub-protocol named {0:?} is already running.")]
    DuplicateSubProtocol(String),
    /// An argument sub-protocol terminated without accepting.
    #[error("Argument {0:?} was rejected.")]
    ArgumentRejected(String),
    /// A protocol instance received a message it cannot handle in its current state.
    #[error("Unexpected message in state {0}.")]
    UnexpectedMessage(&'static str),
    /// A terminated (or failed) instance was asked for another message.
    #[error("The protocol instance has already terminated.")]
    ProtocolTerminated,
    /// The local execution driver gave up after the configured number of messages.
    #[error("Execution did not terminate within {0} messages.")]
    RoundLimitExceeded(usize),
}
