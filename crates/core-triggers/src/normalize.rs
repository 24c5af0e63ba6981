//! Rule set normalization.
//!
//! Runs once at engine construction: resolves every optional field to its default, precomputes
//! the match length (in chars) and the folded match string, and caches the longest match length
//! so the engine knows how much text to read per edit. The result is immutable.
//!
//! Rules are neither deduplicated nor cross-validated; a later rule with the same match string
//! as an earlier one is simply unreachable (first match wins). The only rule dropped is one with
//! an empty match string, which would otherwise match at every keystroke.

use crate::fold::CaseFolding;
use crate::rule::{
    Action, DEFAULT_IGNORE_CASE, DEFAULT_MAX_PREFIX_LOOKBACK, DEFAULT_REMOVE_MATCHING_TEXT, Prefix,
    TriggerOptions, TriggerRule,
};
use tracing::{debug, warn};

/// A rule with every default resolved. `match_len >= 1` always holds.
#[derive(Debug, Clone)]
pub struct NormalizedRule {
    /// Declaration index, kept when earlier rules are dropped.
    pub index: usize,
    pub match_string: String,
    pub action: Action,
    pub ignore_case: bool,
    pub remove_matching_text: bool,
    pub prefix: Option<Prefix>,
    pub max_prefix_lookback: usize,
    pub match_len: usize,
    /// `match_string` folded with the rule set's locale; only set when `ignore_case`.
    folded_match: Option<String>,
}

impl NormalizedRule {
    fn from_rule(index: usize, rule: TriggerRule, folding: CaseFolding) -> Self {
        let ignore_case = rule.ignore_case.unwrap_or(DEFAULT_IGNORE_CASE);
        let match_len = rule.match_string.chars().count();
        let folded_match = ignore_case.then(|| folding.fold(&rule.match_string));
        Self {
            index,
            ignore_case,
            remove_matching_text: rule
                .remove_matching_text
                .unwrap_or(DEFAULT_REMOVE_MATCHING_TEXT),
            max_prefix_lookback: rule
                .max_prefix_lookback
                .unwrap_or(DEFAULT_MAX_PREFIX_LOOKBACK),
            prefix: rule.prefix,
            action: rule.action,
            match_len,
            folded_match,
            match_string: rule.match_string,
        }
    }

    /// Compare a candidate (exactly `match_len` chars) against this rule's match string.
    pub fn matches(&self, candidate: &str, folding: CaseFolding) -> bool {
        match &self.folded_match {
            Some(folded) => folding.fold(candidate) == *folded,
            None => candidate == self.match_string,
        }
    }
}

/// Normalized rules in declaration order plus values derived from the whole set.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<NormalizedRule>,
    folding: CaseFolding,
    longest_match_len: usize,
}

impl RuleSet {
    pub fn normalize(options: TriggerOptions) -> Self {
        let folding = CaseFolding::for_locale(options.locale.as_deref());
        let mut rules = Vec::with_capacity(options.items.len());
        for (position, rule) in options.items.into_iter().enumerate() {
            let index = rule.declared_at.unwrap_or(position);
            if rule.match_string.is_empty() {
                warn!(target: "triggers.normalize", index, "empty_match_string_dropped");
                continue;
            }
            rules.push(NormalizedRule::from_rule(index, rule, folding));
        }
        let longest_match_len = rules.iter().map(|r| r.match_len).max().unwrap_or(0);
        debug!(
            target: "triggers.normalize",
            rules = rules.len(),
            longest_match_len,
            ?folding,
            "rule_set_normalized"
        );
        Self {
            rules,
            folding,
            longest_match_len,
        }
    }

    pub fn rules(&self) -> &[NormalizedRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn folding(&self) -> CaseFolding {
        self.folding
    }

    /// Upper bound on chars the engine reads for the candidate window.
    pub fn longest_match_len(&self) -> usize {
        self.longest_match_len
    }
}
