// src/lib.rs
// Library interface for ditwav

pub mod error;
pub mod generator;
pub mod morse;
pub mod pipeline;
pub mod synth;
pub mod timing;
pub mod wave;

pub use error::{MorseError, Result};
pub use generator::ToneGenerator;
pub use morse::{render, translate, translate_strict, MorseSymbol};
pub use pipeline::{encode_files, encode_phrase, read_phrase, EncodeOptions, Encoded};
pub use synth::synthesize;
pub use timing::compute_data_size;
pub use wave::{Frame, PulseAudio, WaveHeader};
