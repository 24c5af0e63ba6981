//! Locale-aware case-insensitive comparison.
//!
//! Two strings are equal at "base" strength when they agree after compatibility decomposition,
//! removal of combining marks and full lowercasing: `ABC == abc`, `é == E`, `Ａ == a`.
//! Final sigma `ς` folds to `σ`.
//! Turkic locales (`tr`, `az`) fold the dotted/dotless i pair before decomposition so
//! `I` pairs with `ı` and `İ` with `i`.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseFolding {
    #[default]
    Default,
    Turkic,
}

impl CaseFolding {
    /// Pick a folding from a BCP-47-ish tag (`tr`, `tr-TR`, `az_Latn`). Unknown or absent tags
    /// use the default folding.
    pub fn for_locale(locale: Option<&str>) -> Self {
        let primary = locale
            .and_then(|tag| tag.split(['-', '_']).next())
            .map(str::to_ascii_lowercase);
        match primary.as_deref() {
            Some("tr" | "az") => CaseFolding::Turkic,
            _ => CaseFolding::Default,
        }
    }

    pub fn fold(self, s: &str) -> String {
        let turkic = self == CaseFolding::Turkic;
        s.chars()
            .map(|c| match c {
                'I' if turkic => 'ı',
                'İ' if turkic => 'i',
                c => c,
            })
            .nfkd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .map(|c| if c == 'ς' { 'σ' } else { c })
            .collect()
    }

    pub fn eq_ignore_case(self, a: &str, b: &str) -> bool {
        self.fold(a) == self.fold(b)
    }
}
