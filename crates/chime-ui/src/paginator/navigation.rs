//! Previous / stop / next buttons for any paged session.
//!
//! [`navigation`] is a declaration layer: a session type implementing
//! [`Paginate`] applies it in [`Session::declare`] and may override any of
//! the three buttons afterwards.
//!
//! ```rust,ignore
//! impl Session for Gallery {
//!     fn declare(builder: RegistryBuilder<Self>) -> RegistryBuilder<Self> {
//!         builder.layer(navigation).button(STOP_EMOJI, close_gallery)
//!     }
//!     // ...
//! }
//! ```

use async_trait::async_trait;
use chime_core::{EmojiKey, ReactionEvent};
use chime_session::{BoxFuture, RegistryBuilder, Session, SessionContext, SessionResult};

pub const PREVIOUS_EMOJI: &str = "\u{25C0}";
pub const STOP_EMOJI: &str = "\u{23F9}";
pub const NEXT_EMOJI: &str = "\u{25B6}";

/// A session that shows one page at a time.
#[async_trait]
pub trait Paginate: Session {
    /// Zero-based index of the page on screen.
    fn page_index(&self) -> usize;

    /// Shows page `index`. Returns `false`, without touching the message,
    /// when there is no such page.
    async fn show_page(&mut self, ctx: &SessionContext<Self>, index: usize) -> SessionResult<bool>;
}

/// The emojis used for the three navigation buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEmojis {
    pub previous: String,
    pub stop: String,
    pub next: String,
}

impl NavigationEmojis {
    pub fn new(
        previous: impl Into<String>,
        stop: impl Into<String>,
        next: impl Into<String>,
    ) -> Self {
        Self {
            previous: previous.into(),
            stop: stop.into(),
            next: next.into(),
        }
    }
}

impl NavigationEmojis {
    /// Canonical keys in button order.
    pub fn keys(&self) -> [EmojiKey; 3] {
        [
            EmojiKey::parse(&self.previous),
            EmojiKey::parse(&self.stop),
            EmojiKey::parse(&self.next),
        ]
    }
}

impl Default for NavigationEmojis {
    fn default() -> Self {
        Self::new(PREVIOUS_EMOJI, STOP_EMOJI, NEXT_EMOJI)
    }
}

/// Declares the default navigation buttons.
pub fn navigation<S: Paginate>(builder: RegistryBuilder<S>) -> RegistryBuilder<S> {
    builder
        .button(PREVIOUS_EMOJI, previous_page::<S>)
        .button(STOP_EMOJI, stop_paging::<S>)
        .button(NEXT_EMOJI, next_page::<S>)
}

pub(crate) fn previous_page<'a, S: Paginate>(
    session: &'a mut S,
    ctx: &'a SessionContext<S>,
    _event: ReactionEvent,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        if let Some(index) = session.page_index().checked_sub(1) {
            session.show_page(ctx, index).await?;
        }
        Ok(())
    })
}

pub(crate) fn stop_paging<'a, S: Paginate>(
    _session: &'a mut S,
    ctx: &'a SessionContext<S>,
    _event: ReactionEvent,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        ctx.stop();
        Ok(())
    })
}

pub(crate) fn next_page<'a, S: Paginate>(
    session: &'a mut S,
    ctx: &'a SessionContext<S>,
    _event: ReactionEvent,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        let index = session.page_index().saturating_add(1);
        session.show_page(ctx, index).await?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    use chime_core::Payload;
    use chime_session::{Interaction, SessionOptions};

    /// Counts from zero to `last`, logging every page shown.
    struct Dial {
        index: usize,
        last: usize,
        shown: Vec<usize>,
        closed: bool,
    }

    fn close<'a>(
        dial: &'a mut Dial,
        ctx: &'a SessionContext<Dial>,
        _event: ReactionEvent,
    ) -> BoxFuture<'a, SessionResult<()>> {
        Box::pin(async move {
            dial.closed = true;
            ctx.stop();
            Ok(())
        })
    }

    #[async_trait]
    impl Session for Dial {
        fn declare(builder: RegistryBuilder<Self>) -> RegistryBuilder<Self> {
            builder.layer(navigation).button(STOP_EMOJI, close)
        }

        async fn initial_message(&mut self) -> SessionResult<Payload> {
            Ok("0".into())
        }
    }

    #[async_trait]
    impl Paginate for Dial {
        fn page_index(&self) -> usize {
            self.index
        }

        async fn show_page(&mut self, ctx: &SessionContext<Self>, index: usize) -> SessionResult<bool> {
            if index > self.last {
                return Ok(false);
            }
            self.index = index;
            self.shown.push(index);
            ctx.edit(index.to_string()).await?;
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_layer_can_be_overridden() {
        let harness = Harness::new();
        let dial = Dial {
            index: 0,
            last: 1,
            shown: Vec::new(),
            closed: false,
        };
        let mut interaction = Interaction::new(dial)
            .unwrap()
            .with_options(SessionOptions::new());

        let driver = async {
            let message = harness.started().await;
            harness.react(message, 1, PREVIOUS_EMOJI);
            harness.react(message, 1, NEXT_EMOJI);
            harness.react(message, 1, NEXT_EMOJI);
            harness.react(message, 1, PREVIOUS_EMOJI);
            harness.react(message, 1, STOP_EMOJI);
        };
        let (result, ()) = tokio::join!(interaction.start(&harness.ctx), driver);

        assert!(result.is_ok());
        let dial = interaction.session();
        assert_eq!(dial.shown, vec![1, 0]);
        assert!(dial.closed);
        assert_eq!(
            interaction.triggers().read().buttons(),
            vec![
                EmojiKey::parse(PREVIOUS_EMOJI),
                EmojiKey::parse(STOP_EMOJI),
                EmojiKey::parse(NEXT_EMOJI),
            ]
        );
    }
}
