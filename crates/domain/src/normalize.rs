// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Canonical text form for user-entered strings.
//!
//! Every free-text field is stored uppercased with combining diacritics
//! removed, so `"Colonía Centro"` and `"COLONIA CENTRO"` compare equal.

use std::ops::RangeInclusive;
use unicode_normalization::UnicodeNormalization;

/// The Combining Diacritical Marks block.
const COMBINING_MARKS: RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Returns the canonical form of `input`.
///
/// The text is uppercased, decomposed (NFD), and stripped of combining
/// diacritical marks. Applying it twice yields the same result as once.
/// Whitespace is preserved.
#[must_use]
pub fn normalize_text(input: &str) -> String {
    input
        .to_uppercase()
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .collect()
}

/// Normalizes and trims `input`.
#[must_use]
pub fn normalize_trimmed(input: &str) -> String {
    normalize_text(input.trim())
}
