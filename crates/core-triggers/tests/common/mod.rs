#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_events::{EditOrigin, Selection};
use core_text::{Document, TextBuffer};
use core_triggers::Action;
use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Buffer double that records every read and mutation request before forwarding to a `Document`.
pub struct RecordingBuffer {
    pub inner: Document,
    pub reads: RefCell<Vec<(usize, usize)>>,
    pub deletes: Vec<(usize, usize, EditOrigin)>,
    pub inserts: Vec<(usize, String, EditOrigin)>,
}

impl RecordingBuffer {
    pub fn new(content: &str) -> Self {
        Self {
            inner: Document::new(content),
            reads: RefCell::new(Vec::new()),
            deletes: Vec::new(),
            inserts: Vec::new(),
        }
    }

    pub fn at(content: &str, caret: usize) -> Self {
        let mut b = Self::new(content);
        b.inner.focus(caret);
        b
    }

    pub fn at_end(content: &str) -> Self {
        let mut b = Self::new(content);
        b.inner.focus_end();
        b
    }

    pub fn contents(&self) -> String {
        self.inner.contents()
    }

    pub fn mutated(&self) -> bool {
        !self.deletes.is_empty() || !self.inserts.is_empty()
    }
}

impl TextBuffer for RecordingBuffer {
    fn selection(&self) -> Option<Selection> {
        self.inner.selection()
    }
    fn len_chars(&self) -> usize {
        self.inner.len_chars()
    }
    fn text(&self, start: usize, len: usize) -> Option<String> {
        self.reads.borrow_mut().push((start, len));
        self.inner.text(start, len)
    }
    fn delete_text(&mut self, start: usize, len: usize, origin: EditOrigin) {
        self.deletes.push((start, len, origin));
        self.inner.delete_text(start, len, origin);
    }
    fn insert_text(&mut self, index: usize, text: &str, origin: EditOrigin) {
        self.inserts.push((index, text.to_owned(), origin));
        self.inner.insert_text(index, text, origin);
    }
}

/// Action that inserts `text` and counts how often it ran.
pub fn counting_action(text: &str, counter: &Arc<AtomicUsize>) -> Action {
    let counter = counter.clone();
    let text = text.to_owned();
    Action::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Some(text.clone()))
    })
}
