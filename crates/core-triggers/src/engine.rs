//! Match engine: decides, per edit notification, whether exactly one rule fires.
//!
//! Evaluation is split in two phases:
//! - [`Engine::evaluate`] only reads from the buffer. It fetches one candidate window of at most
//!   `longest_match_len` chars ending at the cursor, scans the rules in declaration order and
//!   stops at the first rule whose chain (length, equality, prefix) succeeds.
//! - `Engine::fire` applies that rule: delete the matched range, run the action, insert what it
//!   returned. Every mutation is tagged [`EditOrigin::Api`] so it never re-enters the handler.
//!
//! Offsets:
//! ```text
//!   0     window_start  start     end
//!   [preamble]|[prefix]|[match]|
//! ```
//! `start = end - match_len`, `window_start = max(0, start - max_prefix_lookback)`.

use crate::error::TriggerError;
use crate::normalize::{NormalizedRule, RuleSet};
use crate::rule::TriggerOptions;
use core_events::{EditOrigin, TextChange};
use core_text::TextBuffer;
use std::ops::Range;
use tracing::{debug, trace};

/// Result of scanning the rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    NoMatch,
    /// Rule declared at `rule` matched the chars `range` (ending at the cursor).
    Matched { rule: usize, range: Range<usize> },
}

/// Effects of a rule that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    /// Declaration index of the rule.
    pub rule: usize,
    /// Range deleted from the buffer, when the rule removes matching text.
    pub removed: Option<Range<usize>>,
    /// Offset and text inserted from the action's return value.
    pub inserted: Option<(usize, String)>,
    /// Cursor offset after all effects.
    pub cursor: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    rules: RuleSet,
}

impl Engine {
    pub fn new(options: TriggerOptions) -> Self {
        Self {
            rules: RuleSet::normalize(options),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// `text-change` handler. No-op unless the change came from the user and the buffer shows a
    /// caret (or no selection at all).
    pub fn on_text_change<B>(
        &self,
        buffer: &mut B,
        change: &TextChange,
    ) -> Result<Option<Fired>, TriggerError>
    where
        B: TextBuffer + ?Sized,
    {
        if !change.origin.is_user() {
            return Ok(None);
        }
        self.check(buffer)
    }

    /// Evaluate at the buffer's cursor and fire the first matching rule.
    pub fn check<B>(&self, buffer: &mut B) -> Result<Option<Fired>, TriggerError>
    where
        B: TextBuffer + ?Sized,
    {
        if self.rules.is_empty() {
            return Ok(None);
        }
        let end = match buffer.selection() {
            Some(sel) if !sel.is_caret() => {
                trace!(target: "triggers.engine", len = sel.length, "selection_not_empty_skip");
                return Ok(None);
            }
            Some(sel) => sel.index,
            // Unfocused: evaluate just before the end of the document.
            None => buffer.len_chars().saturating_sub(1),
        };
        match self.scan(buffer, end)? {
            None => Ok(None),
            Some((rule, range)) => self.fire(buffer, rule, range).map(Some),
        }
    }

    /// Read-only phase: find the first rule matching the text that ends at `end`.
    pub fn evaluate<B>(&self, buffer: &B, end: usize) -> Result<MatchOutcome, TriggerError>
    where
        B: TextBuffer + ?Sized,
    {
        Ok(match self.scan(buffer, end)? {
            None => MatchOutcome::NoMatch,
            Some((rule, range)) => MatchOutcome::Matched {
                rule: rule.index,
                range,
            },
        })
    }

    fn scan<B>(
        &self,
        buffer: &B,
        end: usize,
    ) -> Result<Option<(&NormalizedRule, Range<usize>)>, TriggerError>
    where
        B: TextBuffer + ?Sized,
    {
        let longest = self.rules.longest_match_len();
        if longest == 0 {
            return Ok(None);
        }
        let start = end.saturating_sub(longest);
        let Some(window) = buffer.text(start, end - start) else {
            trace!(target: "triggers.engine", start, end, "candidate_window_unavailable");
            return Ok(None);
        };
        let window_len = window.chars().count();
        let folding = self.rules.folding();

        for rule in self.rules.rules() {
            if window_len < rule.match_len {
                continue;
            }
            let candidate = suffix_chars(&window, window_len, rule.match_len);
            if !rule.matches(candidate, folding) {
                continue;
            }
            if !self.prefix_accepts(buffer, rule, end)? {
                continue;
            }
            trace!(target: "triggers.engine", rule = rule.index, end, match_len = rule.match_len, "rule_matched");
            return Ok(Some((rule, end - rule.match_len..end)));
        }
        Ok(None)
    }

    fn prefix_accepts<B>(
        &self,
        buffer: &B,
        rule: &NormalizedRule,
        end: usize,
    ) -> Result<bool, TriggerError>
    where
        B: TextBuffer + ?Sized,
    {
        let Some(prefix) = rule.prefix.as_ref() else {
            return Ok(true);
        };
        let match_start = end.saturating_sub(rule.match_len);
        let window_start = match_start.saturating_sub(rule.max_prefix_lookback);
        let window_len = match_start - window_start;
        let Some(prefix_text) = buffer.text(window_start, window_len) else {
            trace!(target: "triggers.engine", rule = rule.index, window_start, window_len, "prefix_window_unavailable");
            return Ok(false);
        };
        let accepted = prefix
            .test(&prefix_text)
            .map_err(|source| TriggerError::Prefix {
                rule: rule.index,
                source,
            })?;
        if !accepted {
            trace!(target: "triggers.engine", rule = rule.index, window_len, "prefix_rejected");
        }
        Ok(accepted)
    }

    /// Mutating phase: apply `rule`, whose match covers `range`.
    fn fire<B>(
        &self,
        buffer: &mut B,
        rule: &NormalizedRule,
        range: Range<usize>,
    ) -> Result<Fired, TriggerError>
    where
        B: TextBuffer + ?Sized,
    {
        let mut cursor = range.end;
        let mut removed = None;
        if rule.remove_matching_text {
            buffer.delete_text(range.start, range.len(), EditOrigin::Api);
            cursor -= range.len();
            removed = Some(range.clone());
        }

        let replacement = rule.action.fire().map_err(|source| TriggerError::Action {
            rule: rule.index,
            source,
        })?;

        let mut inserted = None;
        if let Some(text) = replacement.filter(|t| !t.is_empty()) {
            buffer.insert_text(cursor, &text, EditOrigin::Api);
            let at = cursor;
            cursor += text.chars().count();
            inserted = Some((at, text));
        }

        debug!(
            target: "triggers.engine",
            rule = rule.index,
            start = range.start,
            end = range.end,
            removed = removed.is_some(),
            inserted_len = inserted.as_ref().map(|(_, t)| t.chars().count()),
            cursor,
            "trigger_fired"
        );
        Ok(Fired {
            rule: rule.index,
            removed,
            inserted,
            cursor,
        })
    }
}

/// The last `n` chars of `s`, where `total` is `s.chars().count()` and `n <= total`.
fn suffix_chars(s: &str, total: usize, n: usize) -> &str {
    let skip = total - n;
    match s.char_indices().nth(skip) {
        Some((byte, _)) => &s[byte..],
        None => "",
    }
}
