//! Per-instance trigger tables.
//!
//! A [`TriggerTable`] starts out sharing the class tables of its session
//! type. The first mutation of a table kind copies that kind's table
//! (`Arc::make_mut`), so changes stay local to the instance and the class
//! registry is never written to.

use std::fmt;
use std::sync::Arc;

use chime_core::EmojiKey;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

use crate::error::TriggerResult;
use crate::handler::{ButtonFn, ButtonHandler, CommandFn, CommandHandler};
use crate::registry::{ButtonMap, Command, CommandMap, Registry};

/// The three table kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Reaction added.
    Buttons,
    /// Reaction removed.
    Unbuttons,
    /// Text commands.
    Commands,
}

/// The trigger tables of one session instance.
pub struct TriggerTable<S> {
    class: Registry<S>,
    buttons: Arc<ButtonMap<S>>,
    unbuttons: Arc<ButtonMap<S>>,
    commands: Arc<CommandMap<S>>,
}

impl<S> TriggerTable<S> {
    /// Creates a table sharing every kind with `registry`.
    pub fn new(registry: &Registry<S>) -> Self {
        Self {
            class: registry.clone(),
            buttons: Arc::clone(&registry.buttons),
            unbuttons: Arc::clone(&registry.unbuttons),
            commands: Arc::clone(&registry.commands),
        }
    }

    /// Returns `true` while `kind` is still the class table itself.
    pub fn is_shared_with_class(&self, kind: TableKind) -> bool {
        match kind {
            TableKind::Buttons => Arc::ptr_eq(&self.buttons, &self.class.buttons),
            TableKind::Unbuttons => Arc::ptr_eq(&self.unbuttons, &self.class.unbuttons),
            TableKind::Commands => Arc::ptr_eq(&self.commands, &self.class.commands),
        }
    }

    /// Adds or replaces a button local to this instance.
    ///
    /// With `unpress` the handler fires when the reaction is removed instead
    /// of added.
    pub fn add_button(
        &mut self,
        emoji: impl Into<EmojiKey>,
        handler: impl ButtonHandler<S>,
        unpress: bool,
    ) {
        self.insert_button(emoji.into(), Arc::new(handler), unpress);
    }

    /// Like [`add_button`](Self::add_button) with an already erased handler.
    pub fn insert_button(&mut self, emoji: EmojiKey, handler: ButtonFn<S>, unpress: bool) {
        trace!(%emoji, unpress, "Adding instance button");
        let table = if unpress {
            &mut self.unbuttons
        } else {
            &mut self.buttons
        };
        Arc::make_mut(table).insert(emoji, handler);
    }

    /// Removes a button from both the press and release tables.
    ///
    /// Removing an unknown emoji does nothing.
    pub fn remove_button(&mut self, emoji: impl Into<EmojiKey>) {
        let emoji = emoji.into();
        trace!(%emoji, "Removing instance button");
        Arc::make_mut(&mut self.buttons).shift_remove(&emoji);
        Arc::make_mut(&mut self.unbuttons).shift_remove(&emoji);
    }

    /// Adds or replaces a command local to this instance.
    pub fn add_command(
        &mut self,
        pattern: impl Into<String>,
        handler: impl CommandHandler<S>,
    ) -> TriggerResult<()> {
        self.insert_command(pattern.into(), Arc::new(handler))
    }

    /// Like [`add_command`](Self::add_command) with an already erased handler.
    pub fn insert_command(&mut self, pattern: String, handler: CommandFn<S>) -> TriggerResult<()> {
        let command = Command::compile(pattern, handler)?;
        trace!(pattern = %command.pattern, "Adding instance command");
        Arc::make_mut(&mut self.commands).insert(command.pattern.clone(), command);
        Ok(())
    }

    /// Removes a command. Removing an unknown pattern does nothing.
    pub fn remove_command(&mut self, pattern: &str) {
        trace!(pattern, "Removing instance command");
        Arc::make_mut(&mut self.commands).shift_remove(pattern);
    }

    /// Returns `true` if a press handler is registered for `emoji`.
    pub fn has_button(&self, emoji: impl Into<EmojiKey>) -> bool {
        self.buttons.contains_key(&emoji.into())
    }

    /// Returns `true` if a release handler is registered for `emoji`.
    pub fn has_unbutton(&self, emoji: impl Into<EmojiKey>) -> bool {
        self.unbuttons.contains_key(&emoji.into())
    }

    /// Returns `true` if `pattern` is registered.
    pub fn has_command(&self, pattern: &str) -> bool {
        self.commands.contains_key(&pattern.to_string())
    }

    /// Button emoji in table order.
    pub fn buttons(&self) -> Vec<EmojiKey> {
        self.buttons.keys().cloned().collect()
    }

    /// Command patterns in table order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    /// Looks up the handler for a reaction.
    pub(crate) fn match_button(&self, emoji: &EmojiKey, pressed: bool) -> Option<ButtonFn<S>> {
        let table = if pressed {
            &self.buttons
        } else {
            &self.unbuttons
        };
        table.get(emoji).map(Arc::clone)
    }

    /// Finds the first command whose pattern matches the whole of `content`.
    pub(crate) fn match_command(&self, content: &str) -> Option<(CommandFn<S>, Vec<Option<String>>)> {
        self.commands.iter().find_map(|(_, command)| {
            let captures = command.regex.captures(content)?;
            let groups = captures
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect();
            trace!(pattern = %command.pattern, "Command matched");
            Some((Arc::clone(&command.handler), groups))
        })
    }
}

impl<S> fmt::Debug for TriggerTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerTable")
            .field("buttons", &self.buttons())
            .field("commands", &self.commands())
            .finish_non_exhaustive()
    }
}

/// A shared handle to an instance [`TriggerTable`].
///
/// The session, its context and its event router all hold clones of the
/// same handle. Guards must not be held across an `.await`.
pub struct TriggerHandle<S> {
    inner: Arc<RwLock<TriggerTable<S>>>,
}

impl<S> TriggerHandle<S> {
    pub(crate) fn new(table: TriggerTable<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Locks the table for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, TriggerTable<S>> {
        self.inner.read()
    }

    /// Locks the table for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, TriggerTable<S>> {
        self.inner.write()
    }
}

impl<S> Clone for TriggerHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for TriggerHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.read().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use crate::testing::{Probe, noop_button, noop_command};

    #[test]
    fn test_instances_start_shared() {
        let registry = Registry::<Probe>::of().unwrap();
        let table = TriggerTable::new(&registry);
        assert!(table.is_shared_with_class(TableKind::Buttons));
        assert!(table.is_shared_with_class(TableKind::Unbuttons));
        assert!(table.is_shared_with_class(TableKind::Commands));
    }

    #[test]
    fn test_mutation_copies_only_that_kind() {
        let registry = Registry::<Probe>::of().unwrap();
        let mut table = TriggerTable::new(&registry);

        table.add_button("\u{1F44D}", noop_button, false);
        assert!(!table.is_shared_with_class(TableKind::Buttons));
        assert!(table.is_shared_with_class(TableKind::Commands));
        assert!(table.has_button("\u{1F44D}"));
    }

    #[test]
    fn test_mutation_is_isolated_between_instances() {
        let registry = Registry::<Probe>::of().unwrap();
        let mut first = TriggerTable::new(&registry);
        let second = TriggerTable::new(&registry);

        first.remove_button("\u{23F9}");
        first.add_command("extra", noop_command).unwrap();

        assert!(!first.has_button("\u{23F9}"));
        assert!(second.has_button("\u{23F9}"));
        assert!(registry.buttons().contains(&EmojiKey::parse("\u{23F9}")));
        assert!(!second.has_command("extra"));
        assert!(!registry.commands().contains(&"extra".to_string()));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let registry = Registry::<Probe>::of().unwrap();
        let mut table = TriggerTable::new(&registry);
        let before = table.buttons();

        table.remove_button("\u{1F600}");
        table.remove_command("nothing");
        assert_eq!(table.buttons(), before);
    }

    #[test]
    fn test_remove_button_clears_both_namespaces() {
        let registry = Registry::<Probe>::of().unwrap();
        let mut table = TriggerTable::new(&registry);
        table.add_button("\u{2705}", noop_button, false);
        table.add_button("\u{2705}", noop_button, true);
        assert!(table.has_unbutton("\u{2705}"));

        table.remove_button("\u{2705}");
        assert!(!table.has_button("\u{2705}"));
        assert!(!table.has_unbutton("\u{2705}"));
    }

    #[test]
    fn test_removal_keeps_remaining_order() {
        let registry = Registry::<Probe>::of().unwrap();
        let mut table = TriggerTable::new(&registry);
        table.add_button("\u{31}\u{FE0F}\u{20E3}", noop_button, false);
        table.add_button("\u{32}\u{FE0F}\u{20E3}", noop_button, false);
        table.add_button("\u{33}\u{FE0F}\u{20E3}", noop_button, false);
        let mut expected = table.buttons();

        table.remove_button("\u{32}\u{FE0F}\u{20E3}");
        expected.retain(|key| *key != EmojiKey::parse("\u{32}\u{FE0F}\u{20E3}"));
        assert_eq!(table.buttons(), expected);

        table.add_command("a", noop_command).unwrap();
        table.add_command("b", noop_command).unwrap();
        table.add_command("c", noop_command).unwrap();
        table.remove_command("b");
        let commands = table.commands();
        assert_eq!(&commands[commands.len() - 2..], ["a", "c"]);
    }

    #[test]
    fn test_custom_emoji_mutation_uses_canonical_key() {
        let registry = Registry::<Probe>::of().unwrap();
        let mut table = TriggerTable::new(&registry);
        table.add_button("<:blob:42>", noop_button, false);

        assert!(table.has_button(42u64));
        table.remove_button(42u64);
        assert!(!table.has_button("<a:blob:42>"));
    }

    #[test]
    fn test_first_full_match_wins() {
        let registry = Registry::<Probe>::of().unwrap();
        let mut table = TriggerTable::new(&registry);
        table.add_command("([0-9]+)", noop_command).unwrap();
        table.add_command("(.*)", noop_command).unwrap();

        let (_, groups) = table.match_command("42").unwrap();
        assert_eq!(groups, vec![Some("42".to_string())]);

        // substring matches do not count
        let (_, groups) = table.match_command("a42").unwrap();
        assert_eq!(groups, vec![Some("a42".to_string())]);
    }

    #[test]
    fn test_partial_match_is_not_a_match() {
        let registry = RegistryBuilder::<Probe>::new()
            .command("stop", noop_command)
            .build()
            .unwrap();
        let table = TriggerTable::new(&registry);

        assert!(table.match_command("stop").is_some());
        assert!(table.match_command("stop now").is_none());
        assert!(table.match_command("please stop").is_none());
    }
}
