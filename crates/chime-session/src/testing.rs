//! Shared fixtures for the crate's tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chime_core::testing::RecordingTransport;
use chime_core::{
    Context, EmojiKey, EventHub, GatewayEvent, IncomingMessage, MessageDeleted, MessageRef,
    Payload, ReactionEmoji, ReactionEvent,
};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::context::{SessionContext, StopHandle};
use crate::error::{SessionError, SessionResult};
use crate::handler::{BoxFuture, ButtonFn, CommandInput};
use crate::registry::{Registry, RegistryBuilder};
use crate::session::Session;
use crate::table::{TriggerHandle, TriggerTable};

pub(crate) const CHANNEL: u64 = 10;
pub(crate) const AUTHOR: u64 = 1;

// ============================================================================
// Probe session
// ============================================================================

/// A session that logs what its handlers did.
#[derive(Default)]
pub(crate) struct Probe {
    pub(crate) log: Vec<String>,
    pub(crate) quiet_timeout: bool,
    pub(crate) stop_slot: Option<Arc<Mutex<Option<StopHandle<Probe>>>>>,
}

impl Probe {
    pub(crate) fn log(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
    }

    /// Runs a button handler against a fresh probe and returns its log.
    pub(crate) async fn call_button(handler: &ButtonFn<Probe>) -> Vec<String> {
        let harness = Harness::new();
        let registry = Registry::<Probe>::of().unwrap();
        let (queue, _jobs) = mpsc::unbounded_channel();
        let ctx = SessionContext::new(
            harness.ctx.clone(),
            TriggerHandle::new(TriggerTable::new(&registry)),
            StopHandle::new(queue),
        );

        let mut probe = Probe::default();
        let event = ReactionEvent::new(1, CHANNEL, AUTHOR, ReactionEmoji::unicode("\u{2705}"));
        handler(&mut probe, &ctx, event).await.unwrap();
        probe.log
    }
}

fn stop<'a>(
    probe: &'a mut Probe,
    ctx: &'a SessionContext<Probe>,
    _event: ReactionEvent,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        probe.log("stop");
        ctx.stop();
        Ok(())
    })
}

fn released_star<'a>(
    probe: &'a mut Probe,
    _ctx: &'a SessionContext<Probe>,
    _event: ReactionEvent,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        probe.log("released star");
        Ok(())
    })
}

fn echo<'a>(
    probe: &'a mut Probe,
    _ctx: &'a SessionContext<Probe>,
    input: CommandInput,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        probe.log(format!("echo {}", input.arg(0).unwrap_or_default()));
        Ok(())
    })
}

fn slow<'a>(
    probe: &'a mut Probe,
    _ctx: &'a SessionContext<Probe>,
    input: CommandInput,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        let name = input.arg(0).unwrap_or_default().to_string();
        probe.log(format!("begin {name}"));
        tokio::time::sleep(Duration::from_millis(10)).await;
        probe.log(format!("end {name}"));
        Ok(())
    })
}

fn fail<'a>(
    _probe: &'a mut Probe,
    _ctx: &'a SessionContext<Probe>,
    _input: CommandInput,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move { Err(SessionError::handler("boom")) })
}

pub(crate) fn record_party<'a>(
    probe: &'a mut Probe,
    _ctx: &'a SessionContext<Probe>,
    _event: ReactionEvent,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        probe.log("party");
        Ok(())
    })
}

pub(crate) fn noop_button<'a>(
    _probe: &'a mut Probe,
    _ctx: &'a SessionContext<Probe>,
    _event: ReactionEvent,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move { Ok(()) })
}

pub(crate) fn noop_command<'a>(
    _probe: &'a mut Probe,
    _ctx: &'a SessionContext<Probe>,
    _input: CommandInput,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move { Ok(()) })
}

#[async_trait]
impl Session for Probe {
    fn declare(builder: RegistryBuilder<Self>) -> RegistryBuilder<Self> {
        builder
            .button("\u{25C0}", noop_button)
            .button("\u{23F9}", stop)
            .unbutton("\u{2B50}", released_star)
            .command("echo (.*)", echo)
            .command("slow (.*)", slow)
            .command("fail", fail)
    }

    async fn setup(&mut self, ctx: &SessionContext<Self>) -> SessionResult<()> {
        if let Some(slot) = &self.stop_slot {
            *slot.lock() = Some(ctx.stop_handle());
        }
        Ok(())
    }

    async fn initial_message(&mut self) -> SessionResult<Payload> {
        Ok("probe".into())
    }

    async fn handle_timeout(
        &mut self,
        _ctx: &SessionContext<Self>,
        timeout: Duration,
    ) -> SessionResult<()> {
        if self.quiet_timeout {
            self.log("timed out");
            Ok(())
        } else {
            Err(SessionError::Timeout(timeout))
        }
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A recording transport and an event hub wired into a context.
pub(crate) struct Harness {
    pub(crate) transport: Arc<RecordingTransport>,
    pub(crate) hub: Arc<EventHub>,
    pub(crate) ctx: Context,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let transport = Arc::new(RecordingTransport::new());
        let hub = Arc::new(EventHub::new());
        let ctx = Context::new(transport.clone(), hub.clone(), CHANNEL, AUTHOR);
        Self {
            transport,
            hub,
            ctx,
        }
    }

    /// Waits until a session has sent its message and subscribed.
    pub(crate) async fn started(&self) -> MessageRef {
        loop {
            if self.hub.len() >= 4 {
                if let Some(message) = self.transport.last_message() {
                    return message;
                }
            }
            tokio::task::yield_now().await;
        }
    }

    pub(crate) fn say(&self, author: u64, content: &str) {
        self.say_in(CHANNEL, author, content);
    }

    pub(crate) fn say_in(&self, channel: u64, author: u64, content: &str) {
        self.hub
            .dispatch(&IncomingMessage::new(500, channel, author, content).into());
    }

    pub(crate) fn react(&self, message: MessageRef, user: u64, emoji: &str) {
        let event = ReactionEvent::new(message.message_id, message.channel_id, user, reaction(emoji));
        self.hub.dispatch(&GatewayEvent::ReactionAdd(event));
    }

    pub(crate) fn unreact(&self, message: MessageRef, user: u64, emoji: &str) {
        let event = ReactionEvent::new(message.message_id, message.channel_id, user, reaction(emoji));
        self.hub.dispatch(&GatewayEvent::ReactionRemove(event));
    }

    pub(crate) fn delete(&self, message: MessageRef) {
        self.hub
            .dispatch(&MessageDeleted::new(message.message_id, message.channel_id).into());
    }
}

fn reaction(emoji: &str) -> ReactionEmoji {
    match EmojiKey::parse(emoji) {
        EmojiKey::Custom(id) => ReactionEmoji::custom(id, "custom"),
        EmojiKey::Unicode(text) => ReactionEmoji::unicode(text),
    }
}
