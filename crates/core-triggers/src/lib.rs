//! core-triggers: type-ahead trigger engine.
//!
//! Watches the text before the caret after every user edit and fires the first configured
//! trigger whose match string ends there ("type `brb`, get `be right back`").
//!
//! - [`RuleSet`] normalizes user rules once (defaults, match lengths, folded match strings).
//! - [`Engine`] handles one `text-change` notification: filter by origin and selection, read a
//!   bounded window, scan rules first-match-wins, apply the winner through [`TextBuffer`].
//! - [`Session`] is a small host pairing an engine with an in-memory `Document`.
//!
//! The engine holds no per-edit state; each notification is evaluated from scratch.
//!
//! [`TextBuffer`]: core_text::TextBuffer

mod config;
pub mod engine;
pub mod error;
pub mod fold;
pub mod normalize;
pub mod rule;
pub mod session;

pub use engine::{Engine, Fired, MatchOutcome};
pub use error::TriggerError;
pub use fold::CaseFolding;
pub use normalize::{NormalizedRule, RuleSet};
pub use rule::{Action, Prefix, TriggerOptions, TriggerRule};
pub use session::Session;
