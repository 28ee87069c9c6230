//! Session lifecycle and the sequential job loop.
//!
//! [`Interaction::start`] drives one run of a session:
//!
//! 1. `setup`, then the initial message is sent. A failure here is returned
//!    as-is and nothing else happens.
//! 2. The event router is subscribed for all four event kinds and the button
//!    reactions are attached in the background.
//! 3. Jobs are drained one at a time. Each wait for the next job is bounded
//!    by the configured timeout.
//! 4. Teardown runs on every exit path: the router is unsubscribed, the
//!    reaction task is cancelled and the message is deleted or has its
//!    reactions cleared. Teardown failures are logged, never returned. If
//!    the `start` future is dropped mid-run, the message release is spawned
//!    onto the current runtime and the interaction still ends `Finished`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chime_core::{
    BoxedFeed, BoxedTransport, Context, EmojiKey, EventKind, Listener, ListenerId, MessageRef,
    Transport,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, trace, warn};

use crate::context::{SessionContext, StopHandle};
use crate::error::{SessionError, SessionResult, TriggerResult};
use crate::registry::Registry;
use crate::router::{Job, Router};
use crate::session::Session;
use crate::table::{TriggerHandle, TriggerTable};
use crate::users::{AllowedUsers, SessionOptions};

/// Where a session is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started yet.
    Idle,
    /// Message sent, listening for events.
    Running,
    /// Torn down. The session cannot be started again.
    Finished,
}

/// Owns a session value and runs it.
///
/// # Example
///
/// ```rust,ignore
/// let mut interaction = Interaction::new(Counter { count: 0 })?
///     .with_options(SessionOptions::new().timeout(Duration::from_secs(60)));
///
/// interaction.start(&ctx).await?;
/// println!("final count: {}", interaction.session().count);
/// ```
pub struct Interaction<S: Session> {
    session: S,
    options: SessionOptions,
    triggers: TriggerHandle<S>,
    phase: Phase,
}

impl<S: Session> Interaction<S> {
    /// Wraps `session` with default options.
    ///
    /// Fails if the type's declared triggers are invalid.
    pub fn new(session: S) -> TriggerResult<Self> {
        let registry = Registry::<S>::of()?;
        Ok(Self {
            session,
            options: SessionOptions::default(),
            triggers: TriggerHandle::new(TriggerTable::new(&registry)),
            phase: Phase::Idle,
        })
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SessionOptions {
        &mut self.options
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Unwraps the session value.
    pub fn into_inner(self) -> S {
        self.session
    }

    /// This instance's trigger table.
    pub fn triggers(&self) -> &TriggerHandle<S> {
        &self.triggers
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Starts the session and returns once it has been torn down.
    pub async fn start(&mut self, ctx: &Context) -> SessionResult<()> {
        if self.phase != Phase::Idle {
            return Err(SessionError::AlreadyStarted);
        }

        let (queue, mut jobs) = mpsc::unbounded_channel();
        let session_ctx = SessionContext::new(
            ctx.clone(),
            self.triggers.clone(),
            StopHandle::new(queue.clone()),
        );

        self.session.setup(&session_ctx).await?;
        let message = self.session.send_initial_message(&session_ctx).await?;
        session_ctx.bind(message);

        let span = info_span!(
            "session",
            channel = %message.channel_id,
            message = %message.message_id,
        );
        let Self {
            session,
            options,
            triggers,
            phase,
        } = self;
        let _phase = PhaseGuard::running(phase);

        drive(session, options, triggers, &session_ctx, message, queue, &mut jobs)
            .instrument(span)
            .await
    }

    /// Starts the session and hands the session value back afterwards.
    pub async fn run(mut self, ctx: &Context) -> SessionResult<S> {
        self.start(ctx).await?;
        Ok(self.session)
    }
}

impl<S: Session> fmt::Debug for Interaction<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interaction")
            .field("session", &std::any::type_name::<S>())
            .field("options", &self.options)
            .field("phase", &self.phase)
            .finish()
    }
}

// =============================================================================
// Loop
// =============================================================================

async fn drive<S: Session>(
    session: &mut S,
    options: &SessionOptions,
    triggers: &TriggerHandle<S>,
    ctx: &SessionContext<S>,
    message: MessageRef,
    queue: UnboundedSender<Job<S>>,
    jobs: &mut UnboundedReceiver<Job<S>>,
) -> SessionResult<()> {
    let allowed_users = options
        .allowed_users
        .clone()
        .unwrap_or_else(|| AllowedUsers::user(ctx.author_id()));
    let router = Router::new(message, allowed_users, triggers.clone(), queue);

    let mut subscriptions = Subscriptions::register(ctx.invocation().feed(), Arc::new(router));
    let release = MessageRelease::new(ctx.transport(), message, options.delete_after);
    let buttons = triggers.read().buttons();
    let affordances = Affordances::attach(ctx.transport(), message, buttons);
    info!(timeout = ?options.timeout, "Session started");

    let outcome = drain(session, ctx, jobs, options.timeout).await;

    subscriptions.release();
    affordances.cancel().await;
    release.run().await;

    match &outcome {
        Ok(()) => info!("Session finished"),
        Err(error) => info!(%error, "Session ended with error"),
    }
    outcome
}

async fn drain<S: Session>(
    session: &mut S,
    ctx: &SessionContext<S>,
    jobs: &mut UnboundedReceiver<Job<S>>,
    timeout: Option<Duration>,
) -> SessionResult<()> {
    loop {
        let next = match timeout {
            Some(limit) => match time::timeout(limit, jobs.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    debug!(?limit, "No event within timeout");
                    return session.handle_timeout(ctx, limit).await;
                }
            },
            None => jobs.recv().await,
        };

        let result = match next {
            Some(Job::Button { handler, event }) => {
                trace!(emoji = %event.emoji.key(), "Running button job");
                handler(session, ctx, event).await
            }
            Some(Job::Command { handler, input }) => {
                trace!(content = %input.message.content, "Running command job");
                handler(session, ctx, input).await
            }
            Some(Job::Stop) | None => {
                debug!("Stop reached");
                return Ok(());
            }
        };

        if let Err(error) = result {
            warn!(%error, "Handler failed, stopping session");
            return Err(error);
        }
    }
}

// =============================================================================
// Teardown
// =============================================================================

/// The router's feed registrations. Released exactly once, at the latest
/// when dropped.
struct Subscriptions {
    feed: BoxedFeed,
    ids: Vec<ListenerId>,
}

impl Subscriptions {
    fn register(feed: &BoxedFeed, listener: Arc<dyn Listener>) -> Self {
        let ids = EventKind::ALL
            .iter()
            .map(|kind| feed.subscribe(*kind, Arc::clone(&listener)))
            .collect();
        Self {
            feed: Arc::clone(feed),
            ids,
        }
    }

    fn release(&mut self) {
        for id in self.ids.drain(..) {
            if !self.feed.unsubscribe(id) {
                debug!(%id, "Listener was already unsubscribed");
            }
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.release();
    }
}

/// Background task adding the button reactions to the session message.
struct Affordances {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Affordances {
    fn attach(transport: &BoxedTransport, message: MessageRef, emoji: Vec<EmojiKey>) -> Self {
        let token = CancellationToken::new();
        if emoji.is_empty() {
            return Self { token, task: None };
        }

        let transport = Arc::clone(transport);
        let cancelled = token.clone();
        let task = tokio::spawn(async move {
            for key in emoji {
                match cancelled
                    .run_until_cancelled(transport.add_reaction(message, &key))
                    .await
                {
                    Some(Ok(())) => trace!(emoji = %key, "Reaction added"),
                    Some(Err(error)) => warn!(emoji = %key, %error, "Failed to add reaction"),
                    None => {
                        trace!("Reaction attach cancelled");
                        return;
                    }
                }
            }
        });
        Self {
            token,
            task: Some(task),
        }
    }

    /// Cancels the task and waits for it, so no reaction lands afterwards.
    async fn cancel(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                debug!(%error, "Reaction task did not complete");
            }
        }
    }
}

impl Drop for Affordances {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Marks the interaction running; it is finished once this is dropped,
/// whether the run completed or its future was dropped.
struct PhaseGuard<'a>(&'a mut Phase);

impl<'a> PhaseGuard<'a> {
    fn running(phase: &'a mut Phase) -> Self {
        *phase = Phase::Running;
        Self(phase)
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *self.0 = Phase::Finished;
    }
}

/// Deletes or clears the session message. If dropped before [`run`], the
/// release is spawned onto the current runtime instead.
///
/// [`run`]: MessageRelease::run
struct MessageRelease {
    transport: BoxedTransport,
    message: MessageRef,
    delete_after: bool,
    pending: bool,
}

impl MessageRelease {
    fn new(transport: &BoxedTransport, message: MessageRef, delete_after: bool) -> Self {
        Self {
            transport: Arc::clone(transport),
            message,
            delete_after,
            pending: true,
        }
    }

    async fn run(mut self) {
        self.pending = false;
        release_message(&self.transport, self.message, self.delete_after).await;
    }
}

impl Drop for MessageRelease {
    fn drop(&mut self) {
        if !self.pending {
            return;
        }
        let transport = Arc::clone(&self.transport);
        let (message, delete_after) = (self.message, self.delete_after);

        match Handle::try_current() {
            Ok(handle) => {
                debug!(%message, "Session dropped, releasing message in the background");
                handle.spawn(async move {
                    release_message(&transport, message, delete_after).await;
                });
            }
            Err(_) => warn!(%message, "Session dropped outside a runtime, message not released"),
        }
    }
}

async fn release_message(transport: &BoxedTransport, message: MessageRef, delete_after: bool) {
    let result = if delete_after {
        transport.delete(message).await
    } else {
        transport.clear_reactions(message).await
    };

    if let Err(error) = result {
        warn!(%error, delete_after, "Failed to release session message");
    }
}
