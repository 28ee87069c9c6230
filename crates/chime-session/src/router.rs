//! Routes raw events to queued jobs.
//!
//! The router is the listener a running session subscribes to its feed. It
//! runs on the dispatcher's task, so it only filters, matches and enqueues;
//! handlers run later, one at a time, on the session's own task.

use chime_core::{IncomingMessage, Listener, MessageDeleted, MessageRef, ReactionEvent};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};

use crate::handler::{ButtonFn, CommandFn, CommandInput};
use crate::table::TriggerHandle;
use crate::users::AllowedUsers;

/// A unit of work for the session loop.
pub(crate) enum Job<S> {
    /// Run a reaction handler.
    Button {
        handler: ButtonFn<S>,
        event: ReactionEvent,
    },
    /// Run a command handler.
    Command {
        handler: CommandFn<S>,
        input: CommandInput,
    },
    /// End the loop.
    Stop,
}

pub(crate) struct Router<S> {
    message: MessageRef,
    allowed_users: AllowedUsers,
    triggers: TriggerHandle<S>,
    queue: UnboundedSender<Job<S>>,
}

impl<S> Router<S> {
    pub(crate) fn new(
        message: MessageRef,
        allowed_users: AllowedUsers,
        triggers: TriggerHandle<S>,
        queue: UnboundedSender<Job<S>>,
    ) -> Self {
        Self {
            message,
            allowed_users,
            triggers,
            queue,
        }
    }

    fn enqueue(&self, job: Job<S>) {
        if self.queue.send(job).is_err() {
            trace!(message = %self.message, "Session loop gone, dropping job");
        }
    }

    fn on_reaction(&self, event: &ReactionEvent, pressed: bool) {
        if event.message_id != self.message.message_id {
            return;
        }
        if !self.allowed_users.contains(event.user_id) {
            trace!(user = %event.user_id, "Reaction from user not allowed");
            return;
        }

        let key = event.emoji.key();
        let Some(handler) = self.triggers.read().match_button(&key, pressed) else {
            trace!(emoji = %key, pressed, "No button for reaction");
            return;
        };

        debug!(emoji = %key, pressed, user = %event.user_id, "Button triggered");
        self.enqueue(Job::Button {
            handler,
            event: event.clone(),
        });
    }
}

impl<S> Listener for Router<S> {
    fn on_message(&self, event: &IncomingMessage) {
        if event.channel_id != self.message.channel_id {
            return;
        }
        if !self.allowed_users.contains(event.author_id) {
            trace!(user = %event.author_id, "Message from user not allowed");
            return;
        }

        let Some((handler, groups)) = self.triggers.read().match_command(&event.content) else {
            return;
        };

        debug!(user = %event.author_id, "Command triggered");
        self.enqueue(Job::Command {
            handler,
            input: CommandInput {
                message: event.clone(),
                groups,
            },
        });
    }

    fn on_reaction_add(&self, event: &ReactionEvent) {
        self.on_reaction(event, true);
    }

    fn on_reaction_remove(&self, event: &ReactionEvent) {
        self.on_reaction(event, false);
    }

    fn on_message_delete(&self, event: &MessageDeleted) {
        if event.message_id == self.message.message_id {
            debug!(message = %self.message, "Session message deleted");
            self.enqueue(Job::Stop);
        }
    }
}
