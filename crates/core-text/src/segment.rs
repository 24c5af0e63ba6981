//! Centralized normalization + segmentation adapter for typed input.
//!
//! Contract:
//! - Input: &str raw input (may be received from IME, paste, stdin, etc.)
//! - Output: NFC-normalized grapheme clusters, in order, one per simulated keystroke.
//! - Guarantees: concatenating the clusters yields the NFC form of the input.
//! - Safety: does not log content.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Normalize to NFC and split into grapheme clusters.
pub fn keystrokes(input: &str) -> Vec<String> {
    let normalized: String = input.nfc().collect();
    normalized.graphemes(true).map(str::to_owned).collect()
}
