//! Yes/no confirmations.

use chime_core::{Context, Payload, UserId};
use chime_session::{AllowedUsers, SessionOptions};

use super::choice::Choice;
use super::selector::{Selector, Style};
use crate::error::SelectResult;

/// Default emojis for yes and no.
pub const DEFAULT_CONFIRM_EMOJIS: [&str; 2] = ["\u{2705}", "\u{274C}"];

/// A selector over `true` (yes) and `false` (no).
pub type Confirmation = Selector<bool>;

impl Selector<bool> {
    /// Builds a yes/no selector.
    ///
    /// Answers are given by reaction when the channel allows it, otherwise
    /// by typing `y`/`yes` or `n`/`no`. Numbers are not accepted.
    pub fn confirmation(
        prompt: impl Into<Payload>,
        emojis: Option<[&str; 2]>,
    ) -> SelectResult<Self> {
        let [yes, no] = emojis.unwrap_or(DEFAULT_CONFIRM_EMOJIS);
        let choices = vec![
            Choice::labelled(true, "Yes").button(yes).pattern("y(?:es)?"),
            Choice::labelled(false, "No").button(no).pattern("no?"),
        ];
        Self::build(prompt.into(), choices, None, Style::Confirmation)
    }
}

/// Asks `user` (the invoking author by default) to confirm.
///
/// Any `allowed_users` in `options` is replaced by that single user.
///
/// # Example
///
/// ```rust,ignore
/// if confirm(&ctx, "Delete everything?", None, None, SessionOptions::new()).await? == Some(true) {
///     purge().await?;
/// }
/// ```
pub async fn confirm(
    ctx: &Context,
    prompt: impl Into<Payload>,
    emojis: Option<[&str; 2]>,
    user: Option<UserId>,
    options: SessionOptions,
) -> SelectResult<Option<bool>> {
    let user = user.unwrap_or_else(|| ctx.author_id());
    let options = options.allowed_users(AllowedUsers::user(user));
    Confirmation::confirmation(prompt, emojis)?
        .select(ctx, options)
        .await
}
