//! Class-level trigger registry.
//!
//! Every [`Session`] type declares its triggers once, through
//! [`Session::declare`]. The result is merged into three ordered tables
//! (buttons, unbuttons and commands), cached per type and shared by every
//! instance of that type.
//!
//! Ancestors are modelled as explicit layers: a builder first inherits the
//! registries or builder layers it extends, oldest first, then adds its own
//! entries. Later entries overwrite earlier ones with the same key.
//!
//! ```rust,ignore
//! impl Session for Pager {
//!     fn declare(builder: RegistryBuilder<Self>) -> RegistryBuilder<Self> {
//!         builder
//!             .layer(navigation)           // ancestor triggers
//!             .button("\u{1F522}", jump)   // own triggers
//!             .command("page ([0-9]+)", goto)
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use chime_core::EmojiKey;
use indexmap::IndexMap;
use parking_lot::RwLock;
use regex::Regex;
use tracing::debug;

use crate::error::{TriggerError, TriggerResult};
use crate::handler::{ButtonFn, ButtonHandler, CommandFn, CommandHandler};
use crate::session::Session;

// =============================================================================
// Commands
// =============================================================================

/// A compiled command trigger.
pub(crate) struct Command<S> {
    pub(crate) pattern: String,
    pub(crate) regex: Regex,
    pub(crate) handler: CommandFn<S>,
}

impl<S> Command<S> {
    /// Compiles `pattern` so that it only matches the whole input.
    pub(crate) fn compile(pattern: String, handler: CommandFn<S>) -> TriggerResult<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            TriggerError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            }
        })?;
        Ok(Self {
            pattern,
            regex,
            handler,
        })
    }
}

impl<S> Clone for Command<S> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            regex: self.regex.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

pub(crate) type ButtonMap<S> = IndexMap<EmojiKey, ButtonFn<S>>;
pub(crate) type CommandMap<S> = IndexMap<String, Command<S>>;

// =============================================================================
// Registry
// =============================================================================

/// The merged, immutable trigger tables of one session type.
pub struct Registry<S> {
    pub(crate) buttons: Arc<ButtonMap<S>>,
    pub(crate) unbuttons: Arc<ButtonMap<S>>,
    pub(crate) commands: Arc<CommandMap<S>>,
}

impl<S> Clone for Registry<S> {
    fn clone(&self) -> Self {
        Self {
            buttons: Arc::clone(&self.buttons),
            unbuttons: Arc::clone(&self.unbuttons),
            commands: Arc::clone(&self.commands),
        }
    }
}

static REGISTRIES: LazyLock<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

impl<S: Session> Registry<S> {
    /// Returns the registry of `S`, building it on first use.
    ///
    /// Declaration errors are not cached; every call reports them again.
    pub fn of() -> TriggerResult<Self> {
        let type_id = TypeId::of::<S>();
        if let Some(cached) = Self::cached(type_id) {
            return Ok(cached);
        }

        let built = S::declare(RegistryBuilder::new()).build()?;
        debug!(
            session = std::any::type_name::<S>(),
            buttons = built.buttons.len(),
            unbuttons = built.unbuttons.len(),
            commands = built.commands.len(),
            "Trigger registry built"
        );

        let mut registries = REGISTRIES.write();
        let entry = registries
            .entry(type_id)
            .or_insert_with(|| Arc::new(built.clone()));
        Ok(entry.downcast_ref::<Self>().cloned().unwrap_or(built))
    }

    fn cached(type_id: TypeId) -> Option<Self> {
        REGISTRIES
            .read()
            .get(&type_id)
            .and_then(|entry| entry.downcast_ref::<Self>().cloned())
    }
}

impl<S> Registry<S> {
    /// Button emoji in table order.
    pub fn buttons(&self) -> Vec<EmojiKey> {
        self.buttons.keys().cloned().collect()
    }

    /// Unbutton emoji in table order.
    pub fn unbuttons(&self) -> Vec<EmojiKey> {
        self.unbuttons.keys().cloned().collect()
    }

    /// Command patterns in table order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("buttons", &self.buttons())
            .field("unbuttons", &self.unbuttons())
            .field("commands", &self.commands())
            .finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects trigger declarations for one session type.
///
/// Handlers are stored in insertion order; a repeated key overwrites the
/// previous handler but keeps its position.
pub struct RegistryBuilder<S> {
    buttons: ButtonMap<S>,
    unbuttons: ButtonMap<S>,
    commands: IndexMap<String, CommandFn<S>>,
}

impl<S> Default for RegistryBuilder<S> {
    fn default() -> Self {
        Self {
            buttons: IndexMap::new(),
            unbuttons: IndexMap::new(),
            commands: IndexMap::new(),
        }
    }
}

impl<S> RegistryBuilder<S> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every entry of an ancestor registry into this builder.
    pub fn inherit(mut self, ancestor: &Registry<S>) -> Self {
        for (key, handler) in ancestor.buttons.iter() {
            self.buttons.insert(key.clone(), Arc::clone(handler));
        }
        for (key, handler) in ancestor.unbuttons.iter() {
            self.unbuttons.insert(key.clone(), Arc::clone(handler));
        }
        for (pattern, command) in ancestor.commands.iter() {
            self.commands
                .insert(pattern.clone(), Arc::clone(&command.handler));
        }
        self
    }

    /// Applies a reusable declaration layer.
    pub fn layer(self, layer: impl FnOnce(Self) -> Self) -> Self {
        layer(self)
    }

    /// Declares a handler fired when `emoji` is added as a reaction.
    pub fn button(mut self, emoji: impl Into<EmojiKey>, handler: impl ButtonHandler<S>) -> Self {
        self.buttons.insert(emoji.into(), Arc::new(handler));
        self
    }

    /// Declares a handler fired when `emoji` is removed as a reaction.
    pub fn unbutton(mut self, emoji: impl Into<EmojiKey>, handler: impl ButtonHandler<S>) -> Self {
        self.unbuttons.insert(emoji.into(), Arc::new(handler));
        self
    }

    /// Declares a handler fired by messages fully matching `pattern`.
    pub fn command(mut self, pattern: impl Into<String>, handler: impl CommandHandler<S>) -> Self {
        self.commands.insert(pattern.into(), Arc::new(handler));
        self
    }

    /// Freezes the declarations, compiling every command pattern.
    pub fn build(self) -> TriggerResult<Registry<S>> {
        let mut commands = IndexMap::new();
        for (pattern, handler) in self.commands.iter() {
            let command = Command::compile(pattern.clone(), Arc::clone(handler))?;
            commands.insert(pattern.clone(), command);
        }
        Ok(Registry {
            buttons: Arc::new(self.buttons),
            unbuttons: Arc::new(self.unbuttons),
            commands: Arc::new(commands),
        })
    }
}
