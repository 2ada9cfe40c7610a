// src/morse.rs
// Text to Morse symbol translation

use crate::error::{MorseError, Result};
use std::fmt;

/// Dot/dash patterns for 'a'..='z', indexed by `letter - 'a'`.
const LETTER_TABLE: [&str; 26] = [
    ".-", "-...", "-.-.", "-..", ".", "..-.", "--.", "....", "..", ".---", "-.-", ".-..", "--",
    "-.", "---", ".--.", "--.-", ".-.", "...", "-", "..-", "...-", ".--", "-..-", "-.--", "--..",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorseSymbol {
    Dot,
    Dash,
    /// Silence after every processed character.
    LetterGap,
    /// Silence standing in for a space in the phrase.
    WordGap,
}

impl MorseSymbol {
    /// Glyph used in the printed Morse string.
    pub fn as_char(self) -> char {
        match self {
            MorseSymbol::Dot => '.',
            MorseSymbol::Dash => '-',
            MorseSymbol::LetterGap => ' ',
            MorseSymbol::WordGap => '/',
        }
    }
}

impl TryFrom<char> for MorseSymbol {
    type Error = char;

    fn try_from(c: char) -> std::result::Result<Self, char> {
        match c {
            '.' => Ok(MorseSymbol::Dot),
            '-' => Ok(MorseSymbol::Dash),
            ' ' => Ok(MorseSymbol::LetterGap),
            '/' => Ok(MorseSymbol::WordGap),
            other => Err(other),
        }
    }
}

impl fmt::Display for MorseSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Dot/dash pattern for an ASCII letter, case-insensitive.
pub fn letter_pattern(c: char) -> Option<&'static str> {
    let c = c.to_ascii_lowercase();
    if c.is_ascii_lowercase() {
        Some(LETTER_TABLE[(c as u8 - b'a') as usize])
    } else {
        None
    }
}

fn push_character(symbols: &mut Vec<MorseSymbol>, c: char) {
    if let Some(pattern) = letter_pattern(c) {
        symbols.extend(pattern.chars().filter_map(|g| MorseSymbol::try_from(g).ok()));
    } else if c == ' ' {
        symbols.push(MorseSymbol::WordGap);
    }
    // Every character is followed by a letter gap, including ones with no
    // pattern, so "a1" still gets two gaps.
    symbols.push(MorseSymbol::LetterGap);
}

/// Translates `phrase` into a flat symbol sequence.
///
/// Letters map through the fixed table, a space becomes a `WordGap`, and
/// anything else contributes nothing. Each character is then followed by a
/// `LetterGap`.
pub fn translate(phrase: &str) -> Vec<MorseSymbol> {
    let mut symbols = Vec::new();
    for c in phrase.chars() {
        push_character(&mut symbols, c);
    }
    log::debug!(
        "Translated {} characters into {} symbols",
        phrase.chars().count(),
        symbols.len()
    );
    symbols
}

/// Like [`translate`], but fails on the first character that is neither an
/// ASCII letter nor a space.
pub fn translate_strict(phrase: &str) -> Result<Vec<MorseSymbol>> {
    if let Some((position, ch)) = phrase
        .chars()
        .enumerate()
        .find(|&(_, c)| c != ' ' && letter_pattern(c).is_none())
    {
        return Err(MorseError::UnsupportedCharacter { ch, position });
    }
    Ok(translate(phrase))
}

/// Renders symbols as the printable `.`, `-`, `/`, ` ` string.
pub fn render(symbols: &[MorseSymbol]) -> String {
    symbols.iter().map(|s| s.as_char()).collect()
}
