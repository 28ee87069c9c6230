//! Testing utilities for code built on chime.
//!
//! Enabled with the `testing` feature.
//!
//! - [`RecordingTransport`]: an in-memory [`Transport`] that records every
//!   call, hands out sequential message ids and can be told to fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{TransportError, TransportResult};
use crate::foundation::{ChannelId, EmojiKey, MessageId, MessageRef, Payload};
use crate::integration::Transport;

// ============================================================================
// Recorded calls
// ============================================================================

/// A transport operation, used to select which calls should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Send,
    Edit,
    Delete,
    AddReaction,
    ClearReactions,
}

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Send {
        channel: ChannelId,
        payload: Payload,
    },
    Edit {
        message: MessageRef,
        payload: Payload,
    },
    Delete(MessageRef),
    AddReaction {
        message: MessageRef,
        emoji: EmojiKey,
    },
    ClearReactions(MessageRef),
}

impl TransportCall {
    /// The operation this call performed.
    pub fn operation(&self) -> Operation {
        match self {
            Self::Send { .. } => Operation::Send,
            Self::Edit { .. } => Operation::Edit,
            Self::Delete(_) => Operation::Delete,
            Self::AddReaction { .. } => Operation::AddReaction,
            Self::ClearReactions(_) => Operation::ClearReactions,
        }
    }
}

// ============================================================================
// Recording Transport
// ============================================================================

/// An in-memory transport for tests.
///
/// Every call is recorded, including calls that were made to fail. Sent
/// messages get ids counting up from `1`.
///
/// # Example
///
/// ```rust,ignore
/// let transport = Arc::new(RecordingTransport::new());
/// transport.fail_on(Operation::Delete, TransportError::http(404, "Unknown Message"));
///
/// // run a session...
///
/// assert_eq!(transport.count(Operation::Delete), 1);
/// ```
pub struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
    failures: Mutex<HashMap<Operation, TransportError>>,
    next_id: AtomicU64,
    last_sent: Mutex<Option<MessageRef>>,
    can_react: AtomicBool,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    /// Creates a transport that succeeds at everything and allows reactions.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            last_sent: Mutex::new(None),
            can_react: AtomicBool::new(true),
        }
    }

    /// Creates a transport reporting that reactions are not permitted.
    pub fn without_reactions() -> Self {
        let transport = Self::new();
        transport.set_can_add_reactions(false);
        transport
    }

    /// Makes every future call of `operation` fail with `error`.
    pub fn fail_on(&self, operation: Operation, error: TransportError) {
        self.failures.lock().insert(operation, error);
    }

    /// Stops failing `operation`.
    pub fn succeed_on(&self, operation: Operation) {
        self.failures.lock().remove(&operation);
    }

    /// Sets the answer of [`Transport::can_add_reactions`].
    pub fn set_can_add_reactions(&self, allowed: bool) {
        self.can_react.store(allowed, Ordering::SeqCst);
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls of `operation`.
    pub fn count(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Payloads of every `send`, in order.
    pub fn sent(&self) -> Vec<Payload> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                TransportCall::Send { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    /// Payloads of every `edit`, in order.
    pub fn edits(&self) -> Vec<Payload> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                TransportCall::Edit { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    /// Emoji added as reactions, in order.
    pub fn reactions(&self) -> Vec<EmojiKey> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                TransportCall::AddReaction { emoji, .. } => Some(emoji.clone()),
                _ => None,
            })
            .collect()
    }

    /// Identity of the most recently sent message, if any send succeeded.
    pub fn last_message(&self) -> Option<MessageRef> {
        *self.last_sent.lock()
    }

    fn record(&self, call: TransportCall) -> TransportResult<()> {
        let operation = call.operation();
        self.calls.lock().push(call);
        match self.failures.lock().get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, channel: ChannelId, payload: &Payload) -> TransportResult<MessageRef> {
        self.record(TransportCall::Send {
            channel,
            payload: payload.clone(),
        })?;
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let message = MessageRef::new(channel, id);
        *self.last_sent.lock() = Some(message);
        Ok(message)
    }

    async fn edit(&self, message: MessageRef, payload: &Payload) -> TransportResult<()> {
        self.record(TransportCall::Edit {
            message,
            payload: payload.clone(),
        })
    }

    async fn delete(&self, message: MessageRef) -> TransportResult<()> {
        self.record(TransportCall::Delete(message))
    }

    async fn add_reaction(&self, message: MessageRef, emoji: &EmojiKey) -> TransportResult<()> {
        self.record(TransportCall::AddReaction {
            message,
            emoji: emoji.clone(),
        })
    }

    async fn clear_reactions(&self, message: MessageRef) -> TransportResult<()> {
        self.record(TransportCall::ClearReactions(message))
    }

    fn can_add_reactions(&self, _channel: ChannelId) -> bool {
        self.can_react.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequential_ids() {
        let transport = RecordingTransport::new();
        let first = transport.send(ChannelId(5), &"a".into()).await.unwrap();
        let second = transport.send(ChannelId(5), &"b".into()).await.unwrap();

        assert_eq!(first, MessageRef::new(5, 1));
        assert_eq!(second, MessageRef::new(5, 2));
        assert_eq!(transport.last_message(), Some(second));
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_recorded() {
        let transport = RecordingTransport::new();
        transport.fail_on(Operation::Delete, TransportError::http(404, "gone"));

        let message = MessageRef::new(1, 1);
        let result = transport.delete(message).await;
        assert_eq!(result, Err(TransportError::http(404, "gone")));
        assert_eq!(transport.count(Operation::Delete), 1);

        transport.succeed_on(Operation::Delete);
        assert!(transport.delete(message).await.is_ok());
    }

    #[test]
    fn test_reaction_capability() {
        let transport = RecordingTransport::without_reactions();
        assert!(!transport.can_add_reactions(ChannelId(1)));
    }
}
