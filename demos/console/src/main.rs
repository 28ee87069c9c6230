//! Console Demo
//!
//! Runs one chime interaction against the terminal. Bot messages are printed
//! to stdout; every line typed on stdin becomes a platform event:
//!
//! | Input | Event |
//! |-------|-------|
//! | `text` | a message from the invoking user |
//! | `+emoji` | the user presses a reaction on the last bot message |
//! | `-emoji` | the user releases it |
//! | `!delete` | the last bot message is deleted |
//!
//! Reaction shortcuts: `+<`, `+>` and `+.` for the paginator buttons,
//! `+y` and `+n` for the confirmation buttons, `+1`..`+9` for keycaps.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package chime-console -- select
//! cargo run --package chime-console -- pages --per-page 3
//! cargo run --package chime-console -- confirm --text-only
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chime::core::{
    ChannelId, Context, EmojiKey, EventHub, GatewayEvent, IncomingMessage, MessageDeleted,
    MessageRef, Payload, ReactionEmoji, ReactionEvent, Transport, TransportResult, UserId,
};
use chime::prelude::*;
use chime::runtime::config::{ChimeConfig, LogOutput};
use chime::runtime::logging;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const CHANNEL: u64 = 1;
const AUTHOR: u64 = 42;

#[derive(Parser, Debug)]
#[command(name = "chime-console", about = "Drive chime sessions from a terminal")]
struct Args {
    /// Configuration file; defaults to chime.toml lookup.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seconds to wait for input before the session times out.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Pretend the channel does not allow reactions.
    #[arg(long, global = true)]
    text_only: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Pick one of several fruits.
    Select,
    /// Answer a yes/no question.
    Confirm,
    /// Page through a numbered list.
    Pages {
        #[arg(long, default_value_t = 5)]
        per_page: usize,
        #[arg(long, default_value_t = 23)]
        items: usize,
    },
}

// ============================================================================
// Console Transport
// ============================================================================

/// A transport that prints instead of talking to a platform.
struct ConsoleTransport {
    next_id: AtomicU64,
    last: Mutex<Option<MessageRef>>,
    reactions: bool,
}

impl ConsoleTransport {
    fn new(reactions: bool) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            last: Mutex::new(None),
            reactions,
        }
    }

    fn last_message(&self) -> Option<MessageRef> {
        *self.last.lock()
    }

    fn render(payload: &Payload) -> String {
        let mut out = Vec::new();
        if let Some(content) = &payload.content {
            out.push(content.clone());
        }
        if let Some(embed) = &payload.embed {
            if let Some(title) = &embed.title {
                out.push(format!("== {title} =="));
            }
            if let Some(description) = &embed.description {
                out.push(description.clone());
            }
            if let Some(footer) = &embed.footer {
                out.push(format!("-- {footer}"));
            }
        }
        out.join("\n")
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send(&self, channel: ChannelId, payload: &Payload) -> TransportResult<MessageRef> {
        let message = MessageRef::new(channel, self.next_id.fetch_add(1, Ordering::Relaxed));
        *self.last.lock() = Some(message);
        println!("[bot #{}]\n{}", message.message_id, Self::render(payload));
        Ok(message)
    }

    async fn edit(&self, message: MessageRef, payload: &Payload) -> TransportResult<()> {
        println!("[bot #{} edited]\n{}", message.message_id, Self::render(payload));
        Ok(())
    }

    async fn delete(&self, message: MessageRef) -> TransportResult<()> {
        println!("[bot #{} deleted]", message.message_id);
        Ok(())
    }

    async fn add_reaction(&self, message: MessageRef, emoji: &EmojiKey) -> TransportResult<()> {
        println!("[bot #{} +{emoji}]", message.message_id);
        Ok(())
    }

    async fn clear_reactions(&self, message: MessageRef) -> TransportResult<()> {
        println!("[bot #{} reactions cleared]", message.message_id);
        Ok(())
    }

    fn can_add_reactions(&self, _channel: ChannelId) -> bool {
        self.reactions
    }
}

// ============================================================================
// Stdin Adapter
// ============================================================================

/// Expands reaction shortcuts to the configured emojis.
fn expand_shortcut(config: &ChimeConfig, text: &str) -> String {
    let confirm = config.confirm.emojis();
    match text {
        "<" => config.paginator.previous.clone(),
        "." => config.paginator.stop.clone(),
        ">" => config.paginator.next.clone(),
        "y" => confirm.map_or_else(|| text.to_string(), |[yes, _]| yes.to_string()),
        "n" => confirm.map_or_else(|| text.to_string(), |[_, no]| no.to_string()),
        digit if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
            format!("{digit}\u{FE0F}\u{20E3}")
        }
        other => other.to_string(),
    }
}

fn reaction_emoji(text: &str) -> ReactionEmoji {
    match EmojiKey::parse(text) {
        EmojiKey::Custom(id) => ReactionEmoji::custom(id, "custom"),
        EmojiKey::Unicode(name) => ReactionEmoji::unicode(name),
    }
}

/// Translates one input line into a platform event.
fn parse_line(
    config: &ChimeConfig,
    transport: &ConsoleTransport,
    message_id: u64,
    line: &str,
) -> Option<GatewayEvent> {
    let last = transport.last_message();

    if line == "!delete" {
        let last = last?;
        return Some(MessageDeleted::new(last.message_id, last.channel_id).into());
    }

    if let Some((sign, emoji)) = line
        .strip_prefix('+')
        .map(|e| ('+', e))
        .or_else(|| line.strip_prefix('-').map(|e| ('-', e)))
        .filter(|(_, e)| !e.trim().is_empty())
    {
        let last = last?;
        let emoji = reaction_emoji(&expand_shortcut(config, emoji.trim()));
        let event = ReactionEvent::new(last.message_id, last.channel_id, AUTHOR, emoji);
        return Some(if sign == '+' {
            GatewayEvent::ReactionAdd(event)
        } else {
            GatewayEvent::ReactionRemove(event)
        });
    }

    Some(IncomingMessage::new(message_id, CHANNEL, AUTHOR, line).into())
}

/// Reads stdin until EOF, dispatching every line to the hub.
async fn pump_stdin(config: ChimeConfig, transport: Arc<ConsoleTransport>, hub: Arc<EventHub>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut message_id = 1_000_000;

    while let Ok(Some(line)) = lines.next_line().await {
        message_id += 1;
        match parse_line(&config, &transport, message_id, line.trim()) {
            Some(event) => {
                let delivered = hub.dispatch(&event);
                debug!(kind = %event.kind(), delivered, "Dispatched console event");
            }
            None => println!("(no bot message to react on yet)"),
        }
    }
}

// ============================================================================
// Modes
// ============================================================================

async fn run_select(ctx: &Context, options: SessionOptions) -> Result<()> {
    let fruits = ["apple", "banana", "cherry", "durian"];
    let choices = fruits
        .iter()
        .enumerate()
        .map(|(i, fruit)| Choice::new(*fruit).button(format!("{}\u{FE0F}\u{20E3}", i + 1)));

    match select::<&str, _>(ctx, "Pick a fruit", choices, None, options).await? {
        Some(fruit) => ctx.send(format!("You picked {fruit}")).await?,
        None => ctx.send("Nothing picked").await?,
    };
    Ok(())
}

async fn run_confirm(ctx: &Context, config: &ChimeConfig, options: SessionOptions) -> Result<()> {
    let answer = confirm(
        ctx,
        "Delete everything?",
        config.confirm.emojis(),
        None,
        options,
    )
    .await?;

    let reply = match answer {
        Some(true) => "Deleting everything",
        Some(false) => "Keeping everything",
        None => "No answer",
    };
    ctx.send(reply).await?;
    Ok(())
}

async fn run_pages(
    ctx: &Context,
    config: &ChimeConfig,
    options: SessionOptions,
    per_page: usize,
    items: usize,
) -> Result<()> {
    let lines = (1..=items).map(|i| format!("{i}. item number {i}"));
    let paginator = Paginator::chunked(lines.collect::<Vec<_>>(), per_page)
        .with_emojis(config.paginator.to_emojis())
        .run(ctx, options)
        .await?;

    info!(page = paginator.index(), "Paginator finished");
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn load_config(path: Option<&PathBuf>) -> Result<ChimeConfig> {
    let loader = ConfigLoader::new();
    let loader = match path {
        Some(path) => loader.file(path),
        None => loader,
    };
    loader.load().context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_ref())?;
    if config.logging.output == LogOutput::Stdout {
        config.logging.output = LogOutput::Stderr;
    }
    logging::init_from_config(&config.logging);

    let mut options = config.session.to_options();
    if let Some(secs) = args.timeout {
        options = options.timeout(Duration::from_secs(secs));
    }

    let transport = Arc::new(ConsoleTransport::new(!args.text_only));
    let hub = Arc::new(EventHub::new());
    let ctx = Context::new(
        transport.clone(),
        hub.clone(),
        ChannelId(CHANNEL),
        UserId(AUTHOR),
    );
    info!(channel = CHANNEL, author = AUTHOR, mode = ?args.mode, "Starting console session");

    let reader = tokio::spawn(pump_stdin(config.clone(), transport, hub));

    let result = match args.mode {
        Mode::Select => run_select(&ctx, options).await,
        Mode::Confirm => run_confirm(&ctx, &config, options).await,
        Mode::Pages { per_page, items } => {
            run_pages(&ctx, &config, options, per_page, items).await
        }
    };

    reader.abort();
    result
}
