//! The paginator session.

use std::fmt;

use async_trait::async_trait;
use chime_core::{Context, Embed, Payload};
use chime_session::{
    Interaction, RegistryBuilder, Session, SessionContext, SessionOptions, SessionResult,
    TriggerTable,
};
use futures::stream::Stream;
use tracing::debug;

use super::navigation::{
    NavigationEmojis, Paginate, navigation, next_page, previous_page, stop_paging,
};
use super::source::{Chunked, IterSource, PageSource, StreamSource, chunked};

/// Turns a page and its zero-based index into a message.
pub type PageFormatter<Page> = Box<dyn Fn(&Page, usize) -> Payload + Send + Sync>;

/// Pages that the default formatter can render, one entry per line.
pub trait PageContent {
    fn lines(&self) -> Vec<String>;
}

impl<T: fmt::Display> PageContent for Vec<T> {
    fn lines(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

impl PageContent for String {
    fn lines(&self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl PageContent for &'static str {
    fn lines(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

/// An embed listing the page's entries, with a one-based page footer.
pub fn format_page<Page: PageContent>(page: &Page, index: usize) -> Payload {
    Embed::new()
        .description(page.lines().join("\n"))
        .footer(format!("Page {}", index + 1))
        .into()
}

/// Shows the pages of a [`PageSource`] one at a time behind
/// previous / stop / next buttons.
///
/// Moving past either end does nothing. When the source has a single page
/// only the stop button is offered.
///
/// # Example
///
/// ```rust,ignore
/// let members = guild.members().map(|m| m.name);
/// Paginator::chunked(members, 10)
///     .run(&ctx, SessionOptions::new().timeout(Duration::from_secs(120)))
///     .await?;
/// ```
pub struct Paginator<P: PageSource> {
    source: P,
    formatter: PageFormatter<P::Page>,
    index: usize,
    emojis: NavigationEmojis,
}

impl<P: PageSource> Paginator<P>
where
    P::Page: PageContent,
{
    /// A paginator using the default [`format_page`].
    pub fn new(source: P) -> Self {
        Self::with_formatter(source, format_page::<P::Page>)
    }
}

impl<P: PageSource> Paginator<P> {
    /// A paginator rendering pages with `formatter`.
    pub fn with_formatter(
        source: P,
        formatter: impl Fn(&P::Page, usize) -> Payload + Send + Sync + 'static,
    ) -> Self {
        Self {
            source,
            formatter: Box::new(formatter),
            index: 0,
            emojis: NavigationEmojis::default(),
        }
    }

    /// Uses other emojis for the navigation buttons.
    pub fn with_emojis(mut self, emojis: NavigationEmojis) -> Self {
        self.emojis = emojis;
        self
    }

    /// Zero-based index of the page on screen.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    /// Runs the paginator until it is stopped, times out or its message is
    /// deleted.
    pub async fn run(self, ctx: &Context, options: SessionOptions) -> SessionResult<Self> {
        Interaction::new(self)?.with_options(options).run(ctx).await
    }

    fn install_navigation(&self, table: &mut TriggerTable<Self>, single_page: bool) {
        let defaults = NavigationEmojis::default();
        if self.emojis != defaults {
            for emoji in [&defaults.previous, &defaults.stop, &defaults.next] {
                table.remove_button(emoji);
            }
            table.add_button(&self.emojis.previous, previous_page::<Self>, false);
            table.add_button(&self.emojis.stop, stop_paging::<Self>, false);
            table.add_button(&self.emojis.next, next_page::<Self>, false);
        }

        if single_page {
            debug!("Single page, hiding previous and next");
            table.remove_button(&self.emojis.previous);
            table.remove_button(&self.emojis.next);
        }
    }
}

impl<I> Paginator<IterSource<Chunked<I>>>
where
    I: Iterator + Send + 'static,
    I::Item: fmt::Display + Clone + Send,
{
    /// Pages of `per_page` entries drawn lazily from `items`.
    pub fn chunked(items: impl IntoIterator<IntoIter = I>, per_page: usize) -> Self {
        Self::new(IterSource::new(chunked(items, per_page)))
    }
}

impl<T> Paginator<StreamSource<Vec<T>>>
where
    T: fmt::Display + Clone + Send + 'static,
{
    /// Pages of `per_page` entries drawn lazily from an async stream.
    pub fn chunked_stream(items: impl Stream<Item = T> + Send + 'static, per_page: usize) -> Self {
        Self::new(StreamSource::new(super::source::chunked_stream(items, per_page)))
    }
}

impl<P: PageSource> fmt::Debug for Paginator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("index", &self.index)
            .field("emojis", &self.emojis)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<P: PageSource> Session for Paginator<P> {
    fn declare(builder: RegistryBuilder<Self>) -> RegistryBuilder<Self> {
        builder.layer(navigation)
    }

    async fn setup(&mut self, ctx: &SessionContext<Self>) -> SessionResult<()> {
        let single_page = self.source.get_page(1).await.is_err();
        self.install_navigation(&mut ctx.triggers().write(), single_page);
        Ok(())
    }

    async fn initial_message(&mut self) -> SessionResult<Payload> {
        let page = self.source.get_page(0).await?;
        self.index = 0;
        Ok((self.formatter)(&page, 0))
    }
}

#[async_trait]
impl<P: PageSource> Paginate for Paginator<P> {
    fn page_index(&self) -> usize {
        self.index
    }

    async fn show_page(&mut self, ctx: &SessionContext<Self>, index: usize) -> SessionResult<bool> {
        let page = match self.source.get_page(index).await {
            Ok(page) => page,
            Err(invalid) => {
                debug!(%invalid, current = self.index, "Staying on current page");
                return Ok(false);
            }
        };

        self.index = index;
        ctx.edit((self.formatter)(&page, index)).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginator::navigation::{NEXT_EMOJI, PREVIOUS_EMOJI, STOP_EMOJI};
    use crate::paginator::source::VecSource;
    use crate::testing::Harness;

    use std::sync::Arc;

    use chime_core::EmojiKey;
    use chime_core::testing::Operation;
    use chime_session::{InvalidPage, Phase, SessionError};
    use parking_lot::Mutex;

    /// Records which pages were requested.
    struct Recorded {
        pages: Vec<String>,
        requests: Arc<Mutex<Vec<usize>>>,
    }

    #[async_trait]
    impl PageSource for Recorded {
        type Page = String;

        async fn get_page(&mut self, index: usize) -> Result<String, InvalidPage> {
            self.requests.lock().push(index);
            self.pages.get(index).cloned().ok_or(InvalidPage { index })
        }
    }

    fn footer(payload: &Payload) -> Option<String> {
        payload.embed.as_ref().and_then(|embed| embed.footer.clone())
    }

    fn description(payload: &Payload) -> Option<String> {
        payload.embed.as_ref().and_then(|embed| embed.description.clone())
    }

    #[tokio::test]
    async fn test_navigation_never_leaves_the_source() {
        let harness = Harness::new();
        let paginator = Paginator::new(VecSource::new(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ]));

        let driver = async {
            let message = harness.started().await;
            harness.react(message, 1, PREVIOUS_EMOJI);
            harness.react(message, 1, NEXT_EMOJI);
            harness.react(message, 1, NEXT_EMOJI);
            harness.react(message, 1, NEXT_EMOJI);
            harness.react(message, 1, PREVIOUS_EMOJI);
            harness.react(message, 1, STOP_EMOJI);
        };
        let (result, ()) = tokio::join!(paginator.run(&harness.ctx, SessionOptions::new()), driver);

        let paginator = result.unwrap();
        assert_eq!(paginator.index(), 1);

        let sent = harness.transport.sent();
        assert_eq!(description(&sent[0]).as_deref(), Some("a"));
        assert_eq!(footer(&sent[0]).as_deref(), Some("Page 1"));

        let edits: Vec<_> = harness.transport.edits().iter().filter_map(footer).collect();
        assert_eq!(edits, vec!["Page 2", "Page 3", "Page 2"]);
        assert_eq!(harness.transport.count(Operation::ClearReactions), 1);
    }

    #[tokio::test]
    async fn test_probes_second_page_before_first() {
        let harness = Harness::new();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let source = Recorded {
            pages: vec!["only".to_string(), "second".to_string()],
            requests: Arc::clone(&requests),
        };

        let driver = async {
            let message = harness.started().await;
            harness.delete(message);
        };
        let (result, ()) = tokio::join!(
            Paginator::new(source).run(&harness.ctx, SessionOptions::new()),
            driver
        );

        assert!(result.is_ok());
        assert_eq!(*requests.lock(), vec![1, 0]);
    }

    #[tokio::test]
    async fn test_single_page_offers_only_stop() {
        let harness = Harness::new();
        let paginator = Paginator::new(VecSource::new(vec![vec![1, 2, 3]]));
        let mut interaction = Interaction::new(paginator).unwrap();

        let driver = async {
            let message = harness.started().await;
            harness.react(message, 1, NEXT_EMOJI);
            harness.react(message, 1, STOP_EMOJI);
        };
        let (result, ()) = tokio::join!(interaction.start(&harness.ctx), driver);

        assert!(result.is_ok());
        assert_eq!(
            interaction.triggers().read().buttons(),
            vec![EmojiKey::parse(STOP_EMOJI)]
        );
        assert_eq!(harness.transport.count(Operation::Edit), 0);
        assert_eq!(
            description(&harness.transport.sent()[0]).as_deref(),
            Some("1\n2\n3")
        );
        assert!(
            harness
                .transport
                .reactions()
                .iter()
                .all(|key| *key == EmojiKey::parse(STOP_EMOJI))
        );
    }

    #[tokio::test]
    async fn test_empty_source_fails_before_sending() {
        let harness = Harness::new();
        let mut interaction = Interaction::new(Paginator::new(VecSource::new(Vec::<String>::new())))
            .unwrap();

        let result = interaction.start(&harness.ctx).await;

        assert!(matches!(
            result,
            Err(SessionError::InvalidPage(InvalidPage { index: 0 }))
        ));
        assert_eq!(harness.transport.count(Operation::Send), 0);
        assert!(harness.hub.is_empty());
        assert_eq!(interaction.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_custom_emojis_replace_defaults() {
        let harness = Harness::new();
        let paginator = Paginator::chunked(1..=5, 2)
            .with_emojis(NavigationEmojis::new("<:left:1>", "<:halt:2>", "<:right:3>"));
        let mut interaction = Interaction::new(paginator).unwrap();

        let driver = async {
            let message = harness.started().await;
            harness.react(message, 1, NEXT_EMOJI);
            harness.react(message, 1, "3");
            harness.react(message, 1, "<:halt:2>");
        };
        let (result, ()) = tokio::join!(interaction.start(&harness.ctx), driver);

        assert!(result.is_ok());
        assert_eq!(
            interaction.triggers().read().buttons(),
            NavigationEmojis::new("1", "2", "3").keys().to_vec()
        );

        let edits = harness.transport.edits();
        assert_eq!(edits.len(), 1);
        assert_eq!(description(&edits[0]).as_deref(), Some("3\n4"));
        assert_eq!(interaction.session().index(), 1);
    }

    #[tokio::test]
    async fn test_custom_formatter_gets_new_index() {
        let harness = Harness::new();
        let paginator = Paginator::with_formatter(VecSource::new(["x", "y"]), |page, index| {
            Payload::from(format!("{index}:{page}"))
        });

        let driver = async {
            let message = harness.started().await;
            harness.react(message, 1, NEXT_EMOJI);
            harness.react(message, 1, STOP_EMOJI);
        };
        let (result, ()) = tokio::join!(paginator.run(&harness.ctx, SessionOptions::new()), driver);

        assert!(result.is_ok());
        assert_eq!(harness.transport.sent()[0].content.as_deref(), Some("0:x"));
        assert_eq!(harness.transport.edits()[0].content.as_deref(), Some("1:y"));
    }

    #[tokio::test]
    async fn test_chunked_stream_pages() {
        let harness = Harness::new();
        let paginator = Paginator::chunked_stream(futures::stream::iter(["a", "b", "c"]), 2);

        let driver = async {
            let message = harness.started().await;
            harness.react(message, 1, NEXT_EMOJI);
            harness.react(message, 1, STOP_EMOJI);
        };
        let (result, ()) = tokio::join!(paginator.run(&harness.ctx, SessionOptions::new()), driver);

        assert_eq!(result.unwrap().source().cached(), 2);
        assert_eq!(description(&harness.transport.edits()[0]).as_deref(), Some("c"));
    }
}
