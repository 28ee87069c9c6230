//! The selection session.

use std::fmt;

use async_trait::async_trait;
use chime_core::{Context, EmojiKey, Payload, ReactionEvent};
use chime_session::{
    BoxFuture, CommandInput, Interaction, Session, SessionContext, SessionError, SessionOptions,
    SessionResult, TriggerTable,
};
use regex::Regex;
use tracing::{debug, trace};

use super::choice::Choice;
use crate::error::{SelectError, SelectResult};

const NUMBER_PATTERN: &str = "([0-9]+)";
const TEXT_PATTERN: &str = "(.*)";

/// How the choice list is rendered and which inputs are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Style {
    /// One choice per line; numbers pick by position.
    List,
    /// Yes/no on one line; numbers are not accepted.
    Confirmation,
}

/// A session asking one user to pick one of several choices.
///
/// Choices are picked by reaction when every choice has a button and the
/// channel allows reactions. Otherwise they are picked by text: a number
/// selects by position and free text is matched against each choice's
/// pattern.
pub struct Selector<T> {
    prompt: Payload,
    choices: Vec<Choice<T>>,
    keys: Vec<Option<EmojiKey>>,
    patterns: Vec<Option<Regex>>,
    reactions: Option<bool>,
    use_reactions: bool,
    style: Style,
    result: Option<T>,
}

impl<T: Clone + Send + 'static> Selector<T> {
    /// Validates the choices and builds a selector.
    ///
    /// `reactions` forces reaction mode (`Some(true)`), text mode
    /// (`Some(false)`), or leaves it to the channel (`None`).
    pub fn new<C>(
        prompt: impl Into<Payload>,
        choices: impl IntoIterator<Item = C>,
        reactions: Option<bool>,
    ) -> SelectResult<Self>
    where
        C: Into<Choice<T>>,
    {
        Self::build(
            prompt.into(),
            choices.into_iter().map(Into::into).collect(),
            reactions,
            Style::List,
        )
    }

    pub(crate) fn build(
        prompt: Payload,
        choices: Vec<Choice<T>>,
        reactions: Option<bool>,
        style: Style,
    ) -> SelectResult<Self> {
        if choices.is_empty() {
            return Err(SelectError::Empty);
        }

        let with_button = choices.iter().filter(|c| c.button.is_some()).count();
        if with_button != 0 && with_button != choices.len() {
            return Err(SelectError::MixedButtons);
        }

        let keys = choices
            .iter()
            .map(|choice| choice.button.as_deref().map(EmojiKey::parse))
            .collect();
        let patterns = choices
            .iter()
            .map(compile_pattern)
            .collect::<SelectResult<_>>()?;

        Ok(Self {
            prompt,
            choices,
            keys,
            patterns,
            reactions,
            use_reactions: false,
            style,
            result: None,
        })
    }

    pub fn choices(&self) -> &[Choice<T>] {
        &self.choices
    }

    /// Whether the running selection uses reactions. Decided during setup.
    pub fn uses_reactions(&self) -> bool {
        self.use_reactions
    }

    /// The picked value, if any.
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Runs the selection and returns the picked value.
    ///
    /// `None` means the session ended without a pick, for example because
    /// the prompt message was deleted.
    pub async fn select(self, ctx: &Context, options: SessionOptions) -> SelectResult<Option<T>> {
        let selector = Interaction::new(self)
            .map_err(SessionError::from)?
            .with_options(options)
            .run(ctx)
            .await?;
        Ok(selector.result)
    }

    /// Renders the choice list.
    pub fn format_choices(&self) -> String {
        match (self.style, self.use_reactions) {
            (Style::List, true) => self
                .choices
                .iter()
                .map(|choice| choice.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            (Style::List, false) => self
                .choices
                .iter()
                .enumerate()
                .map(|(i, choice)| format!("{} = {}", i + 1, choice.label))
                .collect::<Vec<_>>()
                .join("\n"),
            (Style::Confirmation, true) => self
                .choices
                .iter()
                .map(|choice| choice.to_string())
                .collect::<Vec<_>>()
                .join(" | "),
            (Style::Confirmation, false) => "(yes/no)".to_string(),
        }
    }

    /// The prompt with the choice list appended to its embed description,
    /// or to its content when there is no embed.
    pub fn format_prompt(&self) -> Payload {
        let choices = self.format_choices();
        let mut payload = self.prompt.clone();
        match payload.embed.as_mut() {
            Some(embed) => embed.description = Some(append(embed.description.as_deref(), &choices)),
            None => payload.content = Some(append(payload.content.as_deref(), &choices)),
        }
        payload
    }

    fn install(&self, table: &mut TriggerTable<Self>) -> SessionResult<()> {
        if self.use_reactions {
            for key in self.keys.iter().flatten() {
                table.add_button(key.clone(), on_button_press::<T>, false);
            }
            return Ok(());
        }

        if self.style == Style::List {
            table.add_command(NUMBER_PATTERN, on_number_input::<T>)?;
        }
        table.add_command(TEXT_PATTERN, on_text_input::<T>)?;
        Ok(())
    }

    fn pick(&mut self, ctx: &SessionContext<Self>, index: usize) {
        if let Some(choice) = self.choices.get(index) {
            debug!(index, label = %choice.label, "Choice picked");
            self.result = Some(choice.value.clone());
            ctx.stop();
        }
    }
}

fn compile_pattern<T>(choice: &Choice<T>) -> SelectResult<Option<Regex>> {
    let Some(pattern) = &choice.pattern else {
        return Ok(None);
    };
    Regex::new(&format!("^(?:{pattern})"))
        .map(Some)
        .map_err(|source| SelectError::InvalidPattern {
            label: choice.label.clone(),
            pattern: pattern.clone(),
            source,
        })
}

fn append(prefix: Option<&str>, choices: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}\n{choices}"),
        _ => choices.to_string(),
    }
}

impl<T> fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("choices", &self.choices.len())
            .field("reactions", &self.reactions)
            .field("use_reactions", &self.use_reactions)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn on_button_press<'a, T: Clone + Send + 'static>(
    selector: &'a mut Selector<T>,
    ctx: &'a SessionContext<Selector<T>>,
    event: ReactionEvent,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        let key = event.emoji.key();
        match selector.keys.iter().position(|k| k.as_ref() == Some(&key)) {
            Some(index) => selector.pick(ctx, index),
            None => trace!(emoji = %key, "Reaction matches no choice"),
        }
        Ok(())
    })
}

fn on_number_input<'a, T: Clone + Send + 'static>(
    selector: &'a mut Selector<T>,
    ctx: &'a SessionContext<Selector<T>>,
    input: CommandInput,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        let number = input.arg(0).unwrap_or_default();
        let count = selector.choices.len();
        match number.parse::<usize>() {
            Ok(position) if (1..=count).contains(&position) => {
                selector.pick(ctx, position - 1);
            }
            _ => {
                ctx.send(format!(
                    "{number} is out of range. Please enter a number between 1 and {count}"
                ))
                .await?;
            }
        }
        Ok(())
    })
}

fn on_text_input<'a, T: Clone + Send + 'static>(
    selector: &'a mut Selector<T>,
    ctx: &'a SessionContext<Selector<T>>,
    input: CommandInput,
) -> BoxFuture<'a, SessionResult<()>> {
    Box::pin(async move {
        let text = input.arg(0).unwrap_or_default();
        let matches: Vec<usize> = selector
            .patterns
            .iter()
            .enumerate()
            .filter(|(_, pattern)| pattern.as_ref().is_some_and(|re| re.is_match(text)))
            .map(|(index, _)| index)
            .collect();

        match matches.as_slice() {
            [] => trace!("Input matches no choice"),
            [index] => selector.pick(ctx, *index),
            many => {
                ctx.send(format!(
                    "{text} is ambiguous (results in {} matches). Please refine your input.",
                    many.len()
                ))
                .await?;
            }
        }
        Ok(())
    })
}

#[async_trait]
impl<T: Clone + Send + 'static> Session for Selector<T> {
    async fn setup(&mut self, ctx: &SessionContext<Self>) -> SessionResult<()> {
        let has_buttons = self.keys.iter().any(Option::is_some);
        let capable = self
            .reactions
            .unwrap_or_else(|| ctx.transport().can_add_reactions(ctx.channel_id()));
        self.use_reactions = capable && has_buttons;
        debug!(use_reactions = self.use_reactions, choices = self.choices.len(), "Selector set up");

        self.install(&mut ctx.triggers().write())
    }

    async fn initial_message(&mut self) -> SessionResult<Payload> {
        Ok(self.format_prompt())
    }
}

/// Asks the invoking user to pick one of `choices`.
///
/// Plain values are accepted as choices and labelled with their string
/// form; wrap them in [`Choice`] to add buttons or patterns. When passing
/// [`Choice`] values the result type usually needs an annotation.
///
/// # Example
///
/// ```rust,ignore
/// let colour: Option<&str> = select(
///     &ctx,
///     "Pick a colour",
///     [
///         Choice::new("red").button("\u{1F534}"),
///         Choice::new("blue").button("\u{1F535}"),
///     ],
///     None,
///     SessionOptions::new().timeout(Duration::from_secs(60)),
/// )
/// .await?;
/// ```
pub async fn select<T, C>(
    ctx: &Context,
    prompt: impl Into<Payload>,
    choices: impl IntoIterator<Item = C>,
    reactions: Option<bool>,
    options: SessionOptions,
) -> SelectResult<Option<T>>
where
    T: Clone + Send + 'static,
    C: Into<Choice<T>>,
{
    Selector::new(prompt, choices, reactions)?
        .select(ctx, options)
        .await
}
