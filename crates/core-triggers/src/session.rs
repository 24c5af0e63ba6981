//! Minimal host: a [`Document`] whose `text-change` notifications are delivered to an [`Engine`].
//!
//! One keystroke may queue several user changes (typing over a selection is a delete followed
//! by an insert); the host reports them as a single notification carried by the last user
//! change, the way an editor emits one change per input event. Engine mutations queue as
//! `Api` changes and are delivered afterwards; the engine ignores them.

use crate::engine::{Engine, Fired};
use crate::error::TriggerError;
use core_text::Document;
use core_text::segment::keystrokes;
use tracing::trace;

pub struct Session<'e> {
    engine: &'e Engine,
    document: Document,
}

impl<'e> Session<'e> {
    pub fn new(engine: &'e Engine, document: Document) -> Self {
        Self { engine, document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Type `text` one grapheme cluster per keystroke, returning every trigger that fired.
    pub fn type_str(&mut self, text: &str) -> Result<Vec<Fired>, TriggerError> {
        let mut fired = Vec::new();
        for key in keystrokes(text) {
            self.document.type_text(&key);
            fired.extend(self.dispatch()?);
        }
        Ok(fired)
    }

    /// User backspace keystroke. Triggers are evaluated after deletions too.
    pub fn backspace(&mut self) -> Result<Option<Fired>, TriggerError> {
        self.document.backspace();
        self.dispatch()
    }

    /// Deliver queued notifications for one keystroke.
    pub fn dispatch(&mut self) -> Result<Option<Fired>, TriggerError> {
        let changes = self.document.drain_changes();
        let Some(change) = changes.into_iter().rev().find(|c| c.origin.is_user()) else {
            return Ok(None);
        };
        let fired = self.engine.on_text_change(&mut self.document, &change)?;
        let echoes = self.document.drain_changes();
        for echo in &echoes {
            // Tagged Api, so this never fires; delivered for parity with a real host.
            self.engine.on_text_change(&mut self.document, echo)?;
        }
        trace!(target: "triggers.session", echoes = echoes.len(), fired = fired.is_some(), "keystroke_dispatched");
        Ok(fired)
    }
}
