// src/generator.rs
// Reference dot/dash tone generator

use crate::wave::{Frame, PulseAudio, WaveHeader, BYTES_PER_FRAME};
use anyhow::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::f32::consts::PI;
use std::path::Path;

pub struct ToneGenerator {
    sample_rate: u32,
    frequency: f32,
    dot_duration: f32,
    dash_duration: f32,
}

impl ToneGenerator {
    pub fn new(sample_rate: u32, frequency: f32, wpm: f32) -> Self {
        let dot_duration = 1.2 / wpm; // seconds per dot
        let dash_duration = 3.0 * dot_duration;

        Self {
            sample_rate,
            frequency,
            dot_duration,
            dash_duration,
        }
    }

    /// Writes the dot and dash tones the encoder reads as its inputs.
    pub fn write_reference_tones<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        dot_path: P,
        dash_path: Q,
    ) -> Result<()> {
        self.write_tone_file(dot_path, self.dot_duration)?;
        self.write_tone_file(dash_path, self.dash_duration)?;
        Ok(())
    }

    pub fn dot_audio(&self) -> crate::Result<PulseAudio> {
        self.tone_audio(self.dot_duration)
    }

    pub fn dash_audio(&self) -> crate::Result<PulseAudio> {
        self.tone_audio(self.dash_duration)
    }

    fn write_tone_file<P: AsRef<Path>>(&self, path: P, duration: f32) -> Result<()> {
        let spec = WavSpec {
            channels: 2,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let path = path.as_ref();
        let mut writer = WavWriter::create(path, spec)?;
        for sample in self.tone_samples(duration) {
            // Same signal on both channels
            writer.write_sample(sample)?;
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        log::info!("Wrote {:.3}s reference tone to {:?}", duration, path);
        Ok(())
    }

    fn tone_audio(&self, duration: f32) -> crate::Result<PulseAudio> {
        let frames: Vec<Frame> = self
            .tone_samples(duration)
            .map(|s| Frame::new(s, s))
            .collect();
        let data_size = (frames.len() * BYTES_PER_FRAME) as u64;
        let header = WaveHeader::stereo_pcm16(self.sample_rate, 0).with_data_size(data_size)?;
        PulseAudio::from_parts(header, frames)
    }

    fn tone_samples(&self, duration: f32) -> impl Iterator<Item = i16> + '_ {
        let samples = (duration * self.sample_rate as f32) as usize;
        (0..samples).map(move |i| {
            let t = i as f32 / self.sample_rate as f32;
            let sample = (2.0 * PI * self.frequency * t).sin();
            let amplitude = 0.5; // 50% amplitude to avoid clipping
            (sample * amplitude * i16::MAX as f32) as i16
        })
    }
}
