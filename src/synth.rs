// src/synth.rs
// Assembles the output stream from copies of the reference tones

use crate::error::{MorseError, Result};
use crate::morse::MorseSymbol;
use crate::timing::{compute_data_size, SymbolTiming};
use crate::wave::{Frame, PulseAudio};

// Write cursor over a pre-sized frame buffer; writes past the end fail.
struct FrameWriter {
    frames: Vec<Frame>,
    cursor: usize,
}

impl FrameWriter {
    fn new(capacity: usize) -> Self {
        Self {
            frames: vec![Frame::SILENCE; capacity],
            cursor: 0,
        }
    }

    fn reserve(&mut self, len: usize) -> Result<std::ops::Range<usize>> {
        let end = self.cursor + len;
        if end > self.frames.len() {
            return Err(MorseError::SizeMismatch {
                expected: self.frames.len(),
                actual: end,
            });
        }
        let range = self.cursor..end;
        self.cursor = end;
        Ok(range)
    }

    fn copy(&mut self, source: &[Frame]) -> Result<()> {
        let range = self.reserve(source.len())?;
        self.frames[range].copy_from_slice(source);
        Ok(())
    }

    fn silence(&mut self, len: usize) -> Result<()> {
        let range = self.reserve(len)?;
        self.frames[range].fill(Frame::SILENCE);
        Ok(())
    }

    fn finish(self) -> Result<Vec<Frame>> {
        if self.cursor != self.frames.len() {
            return Err(MorseError::SizeMismatch {
                expected: self.frames.len(),
                actual: self.cursor,
            });
        }
        Ok(self.frames)
    }
}

/// Builds the Morse audio for `symbols` out of the `dot` and `dash` tones.
///
/// The header is taken from `dash` with its sizes rewritten for the new
/// payload. Both inputs are only read.
pub fn synthesize(
    symbols: &[MorseSymbol],
    dot: &PulseAudio,
    dash: &PulseAudio,
) -> Result<PulseAudio> {
    let data_size = compute_data_size(symbols, dot.data_len(), dash.data_len());
    let header = dash.header().with_data_size(data_size)?;
    let frame_count = header.frame_count();

    let timing = SymbolTiming::new(dot.sample_count(), dash.sample_count());
    let mut writer = FrameWriter::new(frame_count);

    for &symbol in symbols {
        match symbol {
            MorseSymbol::Dot => {
                writer.copy(dot.frames())?;
                writer.silence(timing.pad_frames())?;
            }
            MorseSymbol::Dash => {
                writer.copy(dash.frames())?;
                writer.silence(timing.pad_frames())?;
            }
            MorseSymbol::WordGap => writer.silence(timing.word_gap_frames())?,
            MorseSymbol::LetterGap => writer.silence(timing.letter_gap_frames())?,
        }
    }

    let frames = writer.finish()?;
    log::info!(
        "Synthesized {} symbols into {} frames ({:.2}s at {} Hz)",
        symbols.len(),
        frames.len(),
        frames.len() as f64 / header.sample_rate().max(1) as f64,
        header.sample_rate()
    );
    PulseAudio::from_parts(header, frames)
}
