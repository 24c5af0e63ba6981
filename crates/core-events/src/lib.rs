//! Core change-notification types shared by buffers, hosts and the trigger engine.
//!
//! A buffer reports every mutation as a [`TextChange`]: the [`Delta`] that was applied plus the
//! [`EditOrigin`] that caused it. Hosts deliver these notifications serially to subscribers. The
//! origin tag is the only re-entrancy guard in the system: anything a subscriber writes back into
//! the buffer is tagged [`EditOrigin::Api`], and subscribers ignore non-user changes, so a
//! subscriber's own edits never feed back into it.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
// Relaxed atomic counters, inspected by tests and logged by the binary at shutdown.
// -------------------------------------------------------------------------------------------------
pub static USER_CHANGES: AtomicU64 = AtomicU64::new(0);
pub static API_CHANGES: AtomicU64 = AtomicU64::new(0);

/// Who caused an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOrigin {
    /// Typed (or pasted) by the end user.
    User,
    /// Issued programmatically, e.g. by a trigger firing.
    Api,
}

impl EditOrigin {
    pub fn is_user(self) -> bool {
        matches!(self, EditOrigin::User)
    }
}

impl fmt::Display for EditOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOrigin::User => f.write_str("user"),
            EditOrigin::Api => f.write_str("api"),
        }
    }
}

/// Caret or highlighted range, in character offsets. A zero `length` is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub index: usize,
    pub length: usize,
}

impl Selection {
    pub fn caret(index: usize) -> Self {
        Self { index, length: 0 }
    }
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }
    /// True when the selection is a caret rather than a highlighted range.
    pub fn is_caret(&self) -> bool {
        self.length == 0
    }
    pub fn end(&self) -> usize {
        self.index + self.length
    }
}

/// A single applied mutation, in character offsets of the document *before* the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    Insert { index: usize, text: String },
    Delete { index: usize, len: usize },
}

/// Notification delivered to `text-change` subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub delta: Delta,
    pub origin: EditOrigin,
}

impl TextChange {
    pub fn new(delta: Delta, origin: EditOrigin) -> Self {
        Self { delta, origin }
    }
    pub fn insert(index: usize, text: impl Into<String>, origin: EditOrigin) -> Self {
        Self::new(
            Delta::Insert {
                index,
                text: text.into(),
            },
            origin,
        )
    }
    pub fn delete(index: usize, len: usize, origin: EditOrigin) -> Self {
        Self::new(Delta::Delete { index, len }, origin)
    }
}

/// FIFO of pending notifications. Buffers push as they mutate; the host drains and dispatches
/// one change at a time so subscribers never observe concurrent notifications.
#[derive(Debug, Default)]
pub struct ChangeQueue {
    pending: VecDeque<TextChange>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: TextChange) {
        let counter = match change.origin {
            EditOrigin::User => &USER_CHANGES,
            EditOrigin::Api => &API_CHANGES,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.pending.push_back(change);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending change, oldest first.
    pub fn drain(&mut self) -> Vec<TextChange> {
        self.pending.drain(..).collect()
    }
}
