// src/timing.rs
// Frame lengths of each Morse symbol and the output size they add up to

use crate::morse::MorseSymbol;
use crate::wave::BYTES_PER_FRAME;

// Silence after each dot or dash is one tenth of a dash.
const PAD: usize = 10;
// A letter gap is a dash length divided by this ratio.
const LETTER_PAD: f64 = 1.5;

/// Per-symbol frame counts derived from the two reference tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolTiming {
    pub dot_frames: usize,
    pub dash_frames: usize,
}

impl SymbolTiming {
    pub fn new(dot_frames: usize, dash_frames: usize) -> Self {
        Self {
            dot_frames,
            dash_frames,
        }
    }

    pub fn from_byte_lengths(dot_bytes: usize, dash_bytes: usize) -> Self {
        Self::new(dot_bytes / BYTES_PER_FRAME, dash_bytes / BYTES_PER_FRAME)
    }

    pub fn pad_frames(&self) -> usize {
        self.dash_frames / PAD
    }

    pub fn word_gap_frames(&self) -> usize {
        self.dash_frames
    }

    pub fn letter_gap_frames(&self) -> usize {
        (self.dash_frames as f64 / LETTER_PAD) as usize
    }

    /// Frames a symbol occupies in the output, tone and trailing silence together.
    pub fn symbol_frames(&self, symbol: MorseSymbol) -> usize {
        match symbol {
            MorseSymbol::Dot => self.dot_frames + self.pad_frames(),
            MorseSymbol::Dash => self.dash_frames + self.pad_frames(),
            MorseSymbol::WordGap => self.word_gap_frames(),
            MorseSymbol::LetterGap => self.letter_gap_frames(),
        }
    }

    pub fn total_frames(&self, symbols: &[MorseSymbol]) -> u64 {
        symbols
            .iter()
            .map(|&s| self.symbol_frames(s) as u64)
            .sum()
    }
}

/// Bytes of sample data needed to render `symbols` with tones of the given data sizes.
///
/// Computed in whole frames, so the result is always a multiple of
/// [`BYTES_PER_FRAME`] and matches what the synthesizer writes.
pub fn compute_data_size(symbols: &[MorseSymbol], dot_bytes: usize, dash_bytes: usize) -> u64 {
    let timing = SymbolTiming::from_byte_lengths(dot_bytes, dash_bytes);
    let bytes = timing.total_frames(symbols) * BYTES_PER_FRAME as u64;
    log::debug!(
        "{} symbols need {} data bytes (dot {} frames, dash {} frames)",
        symbols.len(),
        bytes,
        timing.dot_frames,
        timing.dash_frames
    );
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morse::{translate, MorseSymbol::*};

    #[test]
    fn test_symbol_contributions() {
        // 100-frame dot, 300-frame dash
        let timing = SymbolTiming::from_byte_lengths(400, 1200);
        assert_eq!(timing.symbol_frames(Dot), 100 + 30);
        assert_eq!(timing.symbol_frames(Dash), 300 + 30);
        assert_eq!(timing.symbol_frames(WordGap), 300);
        assert_eq!(timing.symbol_frames(LetterGap), 200);
    }

    #[test]
    fn test_truncation_toward_zero() {
        let timing = SymbolTiming::new(5, 29);
        assert_eq!(timing.pad_frames(), 2);
        // 29 / 1.5 = 19.33
        assert_eq!(timing.letter_gap_frames(), 19);
    }

    #[test]
    fn test_sos_size() {
        let symbols = translate("SOS");
        // six dots, three dashes, three letter gaps
        let expected_frames = 6 * (100 + 30) + 3 * (300 + 30) + 3 * 200;
        assert_eq!(compute_data_size(&symbols, 400, 1200), expected_frames * 4);
    }

    #[test]
    fn test_empty_sequence_needs_nothing() {
        assert_eq!(compute_data_size(&[], 400, 1200), 0);
    }

    #[test]
    fn test_size_is_whole_frames() {
        for dash_bytes in [4, 40, 44, 1204, 4000, 4004] {
            let size = compute_data_size(&translate("hello world"), 12, dash_bytes);
            assert_eq!(size % BYTES_PER_FRAME as u64, 0);
        }
    }

    #[test]
    fn test_monotonic_in_phrase_length() {
        let phrase = "Pack my box with five dozen liquor jugs 42!";
        let mut previous = 0;
        for end in 0..=phrase.len() {
            let size = compute_data_size(&translate(&phrase[..end]), 2000, 6000);
            assert!(size >= previous, "size shrank at prefix {end}");
            previous = size;
        }
    }
}
