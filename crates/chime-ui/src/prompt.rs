//! One-shot text prompts.

use std::sync::Arc;
use std::time::Duration;

use chime_core::{
    BoxedFeed, ChannelId, Context, EventKind, IncomingMessage, Listener, ListenerId, Payload,
    TransportError, UserId,
};
use chime_session::{SessionError, SessionResult};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// Waits for the next message of one user in one channel.
struct Reply {
    channel_id: ChannelId,
    author_id: UserId,
    sender: Mutex<Option<oneshot::Sender<String>>>,
}

impl Listener for Reply {
    fn on_message(&self, event: &IncomingMessage) {
        if event.channel_id != self.channel_id || event.author_id != self.author_id {
            return;
        }
        if let Some(sender) = self.sender.lock().take() {
            trace!(message = %event.message_id, "Prompt answered");
            let _ = sender.send(event.content.clone());
        }
    }
}

/// The reply listener's registration, undone on drop so a cancelled prompt
/// leaves nothing behind in the feed.
struct Subscription {
    feed: BoxedFeed,
    id: ListenerId,
}

impl Subscription {
    fn register(feed: &BoxedFeed, listener: Arc<Reply>) -> Self {
        Self {
            feed: Arc::clone(feed),
            id: feed.subscribe(EventKind::MessageCreate, listener),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.feed.unsubscribe(self.id) {
            debug!(id = %self.id, "Prompt listener was already unsubscribed");
        }
    }
}

/// Sends `payload` and returns the content of the invoking author's next
/// message in the invoking channel.
///
/// `timeout = None` waits indefinitely.
///
/// # Example
///
/// ```rust,ignore
/// let name = prompt(&ctx, "What should I call you?", Some(Duration::from_secs(30))).await?;
/// ctx.send(format!("Hello, {name}!")).await?;
/// ```
pub async fn prompt(
    ctx: &Context,
    payload: impl Into<Payload>,
    timeout: Option<Duration>,
) -> SessionResult<String> {
    ctx.send(payload).await?;

    let (sender, receiver) = oneshot::channel();
    let reply = Arc::new(Reply {
        channel_id: ctx.channel_id(),
        author_id: ctx.author_id(),
        sender: Mutex::new(Some(sender)),
    });
    let subscription = Subscription::register(ctx.feed(), reply);

    let answer = match timeout {
        Some(limit) => tokio::time::timeout(limit, receiver)
            .await
            .map_err(|_| SessionError::Timeout(limit)),
        None => Ok(receiver.await),
    };
    drop(subscription);

    match answer? {
        Ok(content) => Ok(content),
        Err(_) => {
            debug!("Prompt listener dropped without an answer");
            Err(TransportError::Closed.into())
        }
    }
}
