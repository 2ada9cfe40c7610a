// src/pipeline.rs
// Phrase -> symbols -> sized buffer -> synthesized WAV

use crate::error::{MorseError, Result};
use crate::morse::{render, translate, translate_strict, MorseSymbol};
use crate::synth::synthesize;
use crate::wave::PulseAudio;
use std::io::{BufRead, Read};
use std::path::PathBuf;

/// Longest phrase accepted, in bytes.
pub const DEFAULT_MAX_PHRASE_LEN: usize = 8192;

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub dot_path: PathBuf,
    pub dash_path: PathBuf,
    pub output_path: PathBuf,
    pub max_phrase_len: usize,
    /// Reject characters that have no Morse pattern instead of skipping them.
    pub strict: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            dot_path: PathBuf::from("dot.wav"),
            dash_path: PathBuf::from("dash.wav"),
            output_path: PathBuf::from("morse.wav"),
            max_phrase_len: DEFAULT_MAX_PHRASE_LEN,
            strict: false,
        }
    }
}

#[derive(Debug)]
pub struct Encoded {
    pub symbols: Vec<MorseSymbol>,
    /// Printable form of `symbols`.
    pub morse: String,
    pub audio: PulseAudio,
}

/// Reads one line from `reader`, without its line terminator.
///
/// At most `max_len` bytes plus a `\r\n` terminator are consumed; anything
/// longer fails with `InputTooLong`.
pub fn read_phrase<R: BufRead>(reader: &mut R, max_len: usize) -> Result<String> {
    let mut line = Vec::new();
    reader
        .by_ref()
        .take((max_len as u64).saturating_add(2))
        .read_until(b'\n', &mut line)
        .map_err(|e| MorseError::io("<stdin>", e))?;

    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    if line.len() > max_len {
        return Err(MorseError::InputTooLong {
            len: line.len(),
            max: max_len,
        });
    }

    String::from_utf8(line).map_err(|e| {
        MorseError::io(
            "<stdin>",
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })
}

fn check_length(phrase: &str, max: usize) -> Result<()> {
    if phrase.len() > max {
        return Err(MorseError::InputTooLong {
            len: phrase.len(),
            max,
        });
    }
    Ok(())
}

fn warn_on_format_mismatch(dot: &PulseAudio, dash: &PulseAudio) {
    let dot_fmt = &dot.header().format_chunk;
    let dash_fmt = &dash.header().format_chunk;
    if dot_fmt.sample_rate != dash_fmt.sample_rate {
        log::warn!(
            "Dot tone is {} Hz but dash tone is {} Hz; output uses the dash rate",
            dot_fmt.sample_rate,
            dash_fmt.sample_rate
        );
    }
    if dot_fmt.channels != dash_fmt.channels || dot_fmt.bits_per_sample != dash_fmt.bits_per_sample
    {
        log::warn!("Dot and dash tones have different channel layouts");
    }
}

/// Encodes `phrase` using in-memory reference tones.
pub fn encode_phrase(
    phrase: &str,
    dot: &PulseAudio,
    dash: &PulseAudio,
    options: &EncodeOptions,
) -> Result<Encoded> {
    check_length(phrase, options.max_phrase_len)?;
    warn_on_format_mismatch(dot, dash);

    let symbols = if options.strict {
        translate_strict(phrase)?
    } else {
        translate(phrase)
    };
    let morse = render(&symbols);
    log::info!("Phrase {:?} is {} Morse symbols", phrase, symbols.len());

    let audio = synthesize(&symbols, dot, dash)?;
    Ok(Encoded {
        symbols,
        morse,
        audio,
    })
}

/// Reads both reference tones, then asks `phrase` for the text to encode and
/// writes the result to `options.output_path`.
///
/// The tones are read first so a missing file fails before any prompt.
pub fn encode_files<F>(options: &EncodeOptions, phrase: F) -> Result<Encoded>
where
    F: FnOnce() -> Result<String>,
{
    let encoded = {
        let dash = PulseAudio::read_file(&options.dash_path)?;
        let dot = PulseAudio::read_file(&options.dot_path)?;
        let phrase = phrase()?;
        encode_phrase(&phrase, &dot, &dash, options)?
    };
    encoded.audio.write_file(&options.output_path)?;
    Ok(encoded)
}
