use thiserror::Error;

/// Failure raised while handling one notification. Mutations issued before the failure stand.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("prefix predicate of trigger #{rule} failed")]
    Prefix {
        rule: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error("action of trigger #{rule} failed")]
    Action {
        rule: usize,
        #[source]
        source: anyhow::Error,
    },
}

impl TriggerError {
    /// Declaration index of the rule that failed.
    pub fn rule(&self) -> usize {
        match self {
            TriggerError::Prefix { rule, .. } | TriggerError::Action { rule, .. } => *rule,
        }
    }
}
