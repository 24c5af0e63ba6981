//! User-authored trigger rules.
//!
//! A [`TriggerRule`] keeps every optional setting as `Option` exactly as the author wrote it;
//! defaults are resolved once by the normalizer (`normalize.rs`), never per edit.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_IGNORE_CASE: bool = true;
pub const DEFAULT_REMOVE_MATCHING_TEXT: bool = true;
pub const DEFAULT_MAX_PREFIX_LOOKBACK: usize = 1;

type ActionFn = dyn Fn() -> anyhow::Result<Option<String>> + Send + Sync;
type PredicateFn = dyn Fn(&str) -> anyhow::Result<bool> + Send + Sync;

/// Zero-argument callback run when a rule fires. Returning `Some(non-empty)` inserts that text
/// at the cursor; `None` or an empty string fires without inserting.
#[derive(Clone)]
pub struct Action(Arc<ActionFn>);

impl Action {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Callback that cannot fail.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self::new(move || Ok(f()))
    }

    /// Always insert the same text.
    pub fn replace(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move || Ok(Some(text.clone())))
    }

    /// Fire without inserting anything.
    pub fn noop() -> Self {
        Self::new(|| Ok(None))
    }

    pub fn fire(&self) -> anyhow::Result<Option<String>> {
        (self.0)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Predicate applied to the lookback window immediately before a matched trigger.
#[derive(Clone)]
pub enum Prefix {
    /// Succeeds when the regex matches anywhere in the window.
    Pattern(Regex),
    /// Arbitrary check; an `Err` aborts the notification.
    Predicate(Arc<PredicateFn>),
}

impl Prefix {
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Prefix::Pattern)
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Prefix::Predicate(Arc::new(f))
    }

    pub fn test(&self, window: &str) -> anyhow::Result<bool> {
        match self {
            Prefix::Pattern(re) => Ok(re.is_match(window)),
            Prefix::Predicate(f) => f(window),
        }
    }
}

impl From<Regex> for Prefix {
    fn from(re: Regex) -> Self {
        Prefix::Pattern(re)
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Prefix::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A pattern-to-action binding evaluated against the text before the cursor.
#[derive(Debug, Clone)]
pub struct TriggerRule {
    pub match_string: String,
    pub action: Action,
    pub ignore_case: Option<bool>,
    pub remove_matching_text: Option<bool>,
    pub prefix: Option<Prefix>,
    pub max_prefix_lookback: Option<usize>,
    /// Position of the entry in its source when that differs from the position in
    /// [`TriggerOptions::items`] (file entries skipped before this one).
    pub(crate) declared_at: Option<usize>,
}

impl TriggerRule {
    pub fn new(match_string: impl Into<String>, action: Action) -> Self {
        Self {
            match_string: match_string.into(),
            action,
            ignore_case: None,
            remove_matching_text: None,
            prefix: None,
            max_prefix_lookback: None,
            declared_at: None,
        }
    }

    /// Shorthand for the common "type X, get Y" rule.
    pub fn replace(match_string: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::new(match_string, Action::replace(replacement))
    }

    pub fn ignore_case(mut self, ignore: bool) -> Self {
        self.ignore_case = Some(ignore);
        self
    }

    pub fn remove_matching_text(mut self, remove: bool) -> Self {
        self.remove_matching_text = Some(remove);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<Prefix>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn max_prefix_lookback(mut self, chars: usize) -> Self {
        self.max_prefix_lookback = Some(chars);
        self
    }
}

/// Construction-time configuration: optional locale tag plus rules in declaration order.
#[derive(Debug, Clone, Default)]
pub struct TriggerOptions {
    pub locale: Option<String>,
    pub items: Vec<TriggerRule>,
}

impl TriggerOptions {
    pub fn new(items: Vec<TriggerRule>) -> Self {
        Self {
            locale: None,
            items,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}
