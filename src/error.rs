// src/error.rs
// Error types shared by the codec, translator and synthesizer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MorseError {
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed WAV container: {0}")]
    Format(String),

    #[error("phrase is {len} bytes long, the maximum is {max}")]
    InputTooLong { len: usize, max: usize },

    #[error("unsupported character {ch:?} at position {position}")]
    UnsupportedCharacter { ch: char, position: usize },

    #[error("synthesis wrote {actual} frames into a buffer sized for {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("output data size of {bytes} bytes does not fit in a WAV container")]
    OutputTooLarge { bytes: u64 },
}

impl MorseError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MorseError>;
