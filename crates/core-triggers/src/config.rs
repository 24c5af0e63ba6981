//! Bridge from the TOML trigger file to [`TriggerOptions`].
//!
//! File-authored triggers carry static replacement text instead of callbacks. A trigger whose
//! `prefix` does not compile is skipped with a warning; the remaining triggers keep their order.

use crate::rule::{Action, Prefix, TriggerOptions, TriggerRule};
use core_config::{Config, TriggerEntry};
use tracing::warn;

impl TriggerOptions {
    pub fn from_config(config: &Config) -> Self {
        let items = config
            .file
            .triggers
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| rule_from_entry(index, entry))
            .collect();
        Self {
            locale: config.file.locale.clone(),
            items,
        }
    }
}

fn rule_from_entry(index: usize, entry: &TriggerEntry) -> Option<TriggerRule> {
    let action = match &entry.replace {
        Some(text) => Action::replace(text.clone()),
        None => Action::noop(),
    };
    let mut rule = TriggerRule::new(entry.match_string.clone(), action);
    rule.ignore_case = entry.ignore_case;
    rule.remove_matching_text = entry.remove_matching_text;
    rule.max_prefix_lookback = entry.max_prefix_lookback;
    rule.declared_at = Some(index);
    if let Some(source) = entry.prefix.as_deref() {
        match Prefix::pattern(source) {
            Ok(prefix) => rule.prefix = Some(prefix),
            Err(e) => {
                warn!(target: "config", index, error = %e, "trigger_prefix_invalid_skipped");
                return None;
            }
        }
    }
    Some(rule)
}
