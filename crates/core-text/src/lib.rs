//! Rope-based text buffer abstraction.
//!
//! [`TextBuffer`] is the narrow capability surface consumers (the trigger engine) are handed:
//! read a slice, read the caret, delete a range, insert at an offset. It never exposes the
//! underlying document representation. [`Document`] is the in-memory implementation backed by a
//! `ropey::Rope`; it tracks a selection and queues a [`TextChange`] for every mutation.
//!
//! All offsets are character (Unicode scalar value) indices, matching `ropey`'s char API.

use core_events::{ChangeQueue, Delta, EditOrigin, Selection, TextChange};
use ropey::Rope;
use tracing::{trace, warn};

pub mod segment;

/// Capability interface over an editable document.
pub trait TextBuffer {
    /// Current caret/selection, or `None` when the surface is unfocused.
    fn selection(&self) -> Option<Selection>;
    /// Total document length in characters.
    fn len_chars(&self) -> usize;
    /// Read `len` characters starting at `start`. `None` when the range runs past the end.
    fn text(&self, start: usize, len: usize) -> Option<String>;
    fn delete_text(&mut self, start: usize, len: usize, origin: EditOrigin);
    fn insert_text(&mut self, index: usize, text: &str, origin: EditOrigin);
}

impl<T: TextBuffer + ?Sized> TextBuffer for &mut T {
    fn selection(&self) -> Option<Selection> {
        (**self).selection()
    }
    fn len_chars(&self) -> usize {
        (**self).len_chars()
    }
    fn text(&self, start: usize, len: usize) -> Option<String> {
        (**self).text(start, len)
    }
    fn delete_text(&mut self, start: usize, len: usize, origin: EditOrigin) {
        (**self).delete_text(start, len, origin)
    }
    fn insert_text(&mut self, index: usize, text: &str, origin: EditOrigin) {
        (**self).insert_text(index, text, origin)
    }
}

/// A text document backed by a `ropey::Rope`.
#[derive(Debug)]
pub struct Document {
    rope: Rope,
    selection: Option<Selection>,
    changes: ChangeQueue,
}

impl Document {
    /// Construct an unfocused document from an in-memory string slice.
    pub fn new(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            selection: None,
            changes: ChangeQueue::new(),
        }
    }

    /// Whole document as an owned `String`.
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Place a caret at `index` (clamped to the document end).
    pub fn focus(&mut self, index: usize) {
        self.selection = Some(Selection::caret(index.min(self.rope.len_chars())));
    }

    /// Place a caret after the last character.
    pub fn focus_end(&mut self) {
        self.focus(self.rope.len_chars());
    }

    /// Highlight `[index, index + length)`, clamped to the document.
    pub fn select(&mut self, index: usize, length: usize) {
        let total = self.rope.len_chars();
        let index = index.min(total);
        let length = length.min(total - index);
        self.selection = Some(Selection::new(index, length));
    }

    pub fn blur(&mut self) {
        self.selection = None;
    }

    /// Notifications queued since the last drain, oldest first.
    pub fn drain_changes(&mut self) -> Vec<TextChange> {
        self.changes.drain()
    }

    pub fn pending_changes(&self) -> usize {
        self.changes.len()
    }

    /// Insert user-typed text at the caret, replacing a highlighted range first. An unfocused
    /// document receives the text at its end.
    pub fn type_text(&mut self, text: &str) {
        let sel = match self.selection {
            Some(sel) => sel,
            None => {
                self.focus_end();
                Selection::caret(self.rope.len_chars())
            }
        };
        if !sel.is_caret() {
            self.delete_text(sel.index, sel.length, EditOrigin::User);
        }
        self.insert_text(sel.index, text, EditOrigin::User);
    }

    /// Remove the character before the caret, or the highlighted range.
    pub fn backspace(&mut self) {
        match self.selection {
            Some(sel) if !sel.is_caret() => self.delete_text(sel.index, sel.length, EditOrigin::User),
            Some(sel) if sel.index > 0 => self.delete_text(sel.index - 1, 1, EditOrigin::User),
            _ => {}
        }
    }

    fn shift_selection_after_insert(&mut self, index: usize, inserted: usize) {
        if let Some(sel) = self.selection.as_mut() {
            if index <= sel.index {
                sel.index += inserted;
            } else if index < sel.end() {
                sel.length += inserted;
            }
        }
    }

    fn shift_selection_after_delete(&mut self, start: usize, len: usize) {
        let end = start + len;
        let map = |p: usize| {
            if p <= start {
                p
            } else if p >= end {
                p - len
            } else {
                start
            }
        };
        if let Some(sel) = self.selection.as_mut() {
            let new_start = map(sel.index);
            let new_end = map(sel.end());
            sel.index = new_start;
            sel.length = new_end - new_start;
        }
    }
}

impl TextBuffer for Document {
    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn text(&self, start: usize, len: usize) -> Option<String> {
        let end = start.checked_add(len)?;
        if end > self.rope.len_chars() {
            trace!(target: "text.document", start, len, total = self.rope.len_chars(), "slice_out_of_range");
            return None;
        }
        Some(self.rope.slice(start..end).to_string())
    }

    fn delete_text(&mut self, start: usize, len: usize, origin: EditOrigin) {
        if len == 0 {
            return;
        }
        let total = self.rope.len_chars();
        let Some(end) = start.checked_add(len).filter(|end| *end <= total) else {
            warn!(target: "text.document", start, len, total, %origin, "delete_out_of_range_ignored");
            return;
        };
        self.rope.remove(start..end);
        self.shift_selection_after_delete(start, len);
        trace!(target: "text.document", start, len, %origin, "delete_text");
        self.changes
            .push(TextChange::new(Delta::Delete { index: start, len }, origin));
    }

    fn insert_text(&mut self, index: usize, text: &str, origin: EditOrigin) {
        if text.is_empty() {
            return;
        }
        let total = self.rope.len_chars();
        if index > total {
            warn!(target: "text.document", index, total, %origin, "insert_out_of_range_ignored");
            return;
        }
        self.rope.insert(index, text);
        let inserted = text.chars().count();
        self.shift_selection_after_insert(index, inserted);
        trace!(target: "text.document", index, inserted, %origin, "insert_text");
        self.changes.push(TextChange::insert(index, text, origin));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_document_and_read_slices() {
        let d = Document::new("hello\nworld");
        assert_eq!(d.len_chars(), 11);
        assert_eq!(d.text(0, 5).as_deref(), Some("hello"));
        assert_eq!(d.text(6, 5).as_deref(), Some("world"));
        assert_eq!(d.text(6, 0).as_deref(), Some(""));
        assert_eq!(d.text(8, 10), None);
        assert_eq!(d.text(usize::MAX, 2), None);
    }

    #[test]
    fn offsets_are_chars_not_bytes() {
        let d = Document::new("a😀é:)");
        assert_eq!(d.len_chars(), 5);
        assert_eq!(d.text(1, 2).as_deref(), Some("😀é"));
    }

    #[test]
    fn insert_before_caret_moves_caret() {
        let mut d = Document::new("abc");
        d.focus(2);
        d.insert_text(0, "xy", EditOrigin::Api);
        assert_eq!(d.contents(), "xyabc");
        assert_eq!(d.selection(), Some(Selection::caret(4)));
        d.insert_text(5, "!", EditOrigin::Api);
        assert_eq!(d.selection(), Some(Selection::caret(4)));
    }

    #[test]
    fn delete_before_caret_moves_caret_back() {
        let mut d = Document::new("ok brb");
        d.focus(6);
        d.delete_text(3, 3, EditOrigin::Api);
        assert_eq!(d.contents(), "ok ");
        assert_eq!(d.selection(), Some(Selection::caret(3)));
    }

    #[test]
    fn delete_spanning_caret_clamps_to_range_start() {
        let mut d = Document::new("abcdef");
        d.focus(3);
        d.delete_text(1, 4, EditOrigin::Api);
        assert_eq!(d.contents(), "af");
        assert_eq!(d.selection(), Some(Selection::caret(1)));
    }

    #[test]
    fn out_of_range_mutations_are_ignored() {
        let mut d = Document::new("abc");
        d.delete_text(2, 5, EditOrigin::Api);
        d.insert_text(9, "x", EditOrigin::Api);
        assert_eq!(d.contents(), "abc");
        assert_eq!(d.pending_changes(), 0);
    }

    #[test]
    fn type_text_queues_user_changes() {
        let mut d = Document::new("");
        d.focus(0);
        d.type_text("h");
        d.type_text("i");
        assert_eq!(d.contents(), "hi");
        assert_eq!(d.selection(), Some(Selection::caret(2)));
        let changes = d.drain_changes();
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.origin == EditOrigin::User));
        assert_eq!(
            changes[1].delta,
            Delta::Insert {
                index: 1,
                text: "i".into()
            }
        );
    }

    #[test]
    fn type_text_replaces_selection() {
        let mut d = Document::new("hello world");
        d.select(6, 5);
        d.type_text("there");
        assert_eq!(d.contents(), "hello there");
        assert_eq!(d.selection(), Some(Selection::caret(11)));
        assert_eq!(d.drain_changes().len(), 2);
    }

    #[test]
    fn type_text_unfocused_appends() {
        let mut d = Document::new("ab");
        d.type_text("c");
        assert_eq!(d.contents(), "abc");
        assert_eq!(d.selection(), Some(Selection::caret(3)));
    }

    #[test]
    fn backspace_removes_previous_char() {
        let mut d = Document::new("ab😀");
        d.focus_end();
        d.backspace();
        assert_eq!(d.contents(), "ab");
        d.focus(0);
        d.backspace();
        assert_eq!(d.contents(), "ab");
    }

    #[test]
    fn select_clamps_to_document() {
        let mut d = Document::new("abc");
        d.select(2, 10);
        assert_eq!(d.selection(), Some(Selection::new(2, 1)));
        d.blur();
        assert_eq!(d.selection(), None);
    }

    #[test]
    fn mut_ref_forwards_to_buffer() {
        fn append<B: TextBuffer>(mut b: B) {
            let end = b.len_chars();
            b.insert_text(end, "!", EditOrigin::Api);
        }
        let mut d = Document::new("hi");
        append(&mut d);
        assert_eq!(d.contents(), "hi!");
    }
}
