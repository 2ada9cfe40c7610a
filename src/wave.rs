// src/wave.rs
// Canonical 44-byte RIFF/WAVE container holding interleaved 16-bit stereo PCM

use crate::error::{MorseError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::Path;

/// Size of the fixed header that precedes the sample data.
pub const HEADER_LEN: usize = 44;
// One stereo frame: two little-endian i16 values
pub const BYTES_PER_FRAME: usize = 4;

const RIFF_ID: [u8; 4] = *b"RIFF";
const WAVE_ID: [u8; 4] = *b"WAVE";
const FMT_ID: [u8; 4] = *b"fmt ";
const DATA_ID: [u8; 4] = *b"data";
const PCM_FORMAT_CHUNK_LEN: u32 = 16;
const PCM_COMPRESSION: u16 = 1;
const CHANNELS: u16 = 2;
const BITS_PER_SAMPLE: u16 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChunk {
    pub id: [u8; 4],
    pub size: u32,
    pub compression: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChunk {
    pub id: [u8; 4],
    /// Declared payload length in bytes.
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveHeader {
    pub id: [u8; 4],
    /// RIFF chunk size: everything after the first eight bytes.
    pub size: u32,
    pub format: [u8; 4],
    pub format_chunk: FormatChunk,
    pub data_chunk: DataChunk,
}

impl WaveHeader {
    /// Builds the header of a 16-bit stereo PCM container with `data_size` payload bytes.
    pub fn stereo_pcm16(sample_rate: u32, data_size: u32) -> Self {
        let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
        Self {
            id: RIFF_ID,
            size: (HEADER_LEN as u32 - 8) + data_size,
            format: WAVE_ID,
            format_chunk: FormatChunk {
                id: FMT_ID,
                size: PCM_FORMAT_CHUNK_LEN,
                compression: PCM_COMPRESSION,
                channels: CHANNELS,
                sample_rate,
                byte_rate: sample_rate * block_align as u32,
                block_align,
                bits_per_sample: BITS_PER_SAMPLE,
            },
            data_chunk: DataChunk {
                id: DATA_ID,
                size: data_size,
            },
        }
    }

    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut id = [0u8; 4];
        reader.read_exact(&mut id)?;
        let size = reader.read_u32::<LittleEndian>()?;
        let mut format = [0u8; 4];
        reader.read_exact(&mut format)?;

        let mut fmt_id = [0u8; 4];
        reader.read_exact(&mut fmt_id)?;
        let format_chunk = FormatChunk {
            id: fmt_id,
            size: reader.read_u32::<LittleEndian>()?,
            compression: reader.read_u16::<LittleEndian>()?,
            channels: reader.read_u16::<LittleEndian>()?,
            sample_rate: reader.read_u32::<LittleEndian>()?,
            byte_rate: reader.read_u32::<LittleEndian>()?,
            block_align: reader.read_u16::<LittleEndian>()?,
            bits_per_sample: reader.read_u16::<LittleEndian>()?,
        };

        let mut data_id = [0u8; 4];
        reader.read_exact(&mut data_id)?;
        let data_chunk = DataChunk {
            id: data_id,
            size: reader.read_u32::<LittleEndian>()?,
        };

        Ok(Self {
            id,
            size,
            format,
            format_chunk,
            data_chunk,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.id)?;
        writer.write_u32::<LittleEndian>(self.size)?;
        writer.write_all(&self.format)?;

        let fmt = &self.format_chunk;
        writer.write_all(&fmt.id)?;
        writer.write_u32::<LittleEndian>(fmt.size)?;
        writer.write_u16::<LittleEndian>(fmt.compression)?;
        writer.write_u16::<LittleEndian>(fmt.channels)?;
        writer.write_u32::<LittleEndian>(fmt.sample_rate)?;
        writer.write_u32::<LittleEndian>(fmt.byte_rate)?;
        writer.write_u16::<LittleEndian>(fmt.block_align)?;
        writer.write_u16::<LittleEndian>(fmt.bits_per_sample)?;

        writer.write_all(&self.data_chunk.id)?;
        writer.write_u32::<LittleEndian>(self.data_chunk.size)?;
        Ok(())
    }

    /// Rejects anything other than a canonical 16-bit stereo PCM header.
    pub fn validate(&self) -> Result<()> {
        check_id("RIFF container", &self.id, &RIFF_ID)?;
        check_id("format tag", &self.format, &WAVE_ID)?;
        check_id("format sub-chunk", &self.format_chunk.id, &FMT_ID)?;
        check_id("data sub-chunk", &self.data_chunk.id, &DATA_ID)?;

        let fmt = &self.format_chunk;
        if fmt.size != PCM_FORMAT_CHUNK_LEN {
            return Err(MorseError::Format(format!(
                "format sub-chunk is {} bytes, expected {PCM_FORMAT_CHUNK_LEN}",
                fmt.size
            )));
        }
        if fmt.compression != PCM_COMPRESSION {
            return Err(MorseError::Format(format!(
                "compression code {} is not uncompressed PCM",
                fmt.compression
            )));
        }
        if fmt.channels != CHANNELS {
            return Err(MorseError::Format(format!(
                "{} channels, only stereo is supported",
                fmt.channels
            )));
        }
        if fmt.bits_per_sample != BITS_PER_SAMPLE {
            return Err(MorseError::Format(format!(
                "{} bits per sample, only 16-bit is supported",
                fmt.bits_per_sample
            )));
        }
        if self.data_chunk.size as usize % BYTES_PER_FRAME != 0 {
            return Err(MorseError::Format(format!(
                "data size {} is not a whole number of stereo frames",
                self.data_chunk.size
            )));
        }
        let min_riff_size = u64::from(self.data_chunk.size) + (HEADER_LEN as u64 - 8);
        if u64::from(self.size) < min_riff_size {
            return Err(MorseError::Format(format!(
                "RIFF size {} is smaller than the {min_riff_size} bytes its chunks occupy",
                self.size
            )));
        }
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.data_chunk.size as usize / BYTES_PER_FRAME
    }

    /// Copy of this header describing a payload of `data_size` bytes.
    ///
    /// The RIFF size moves by the same delta as the data size, so any extra
    /// bytes the source header accounted for are preserved.
    pub fn with_data_size(&self, data_size: u64) -> Result<Self> {
        let overhead = u64::from(self.size)
            .checked_sub(u64::from(self.data_chunk.size))
            .ok_or_else(|| {
                MorseError::Format(format!(
                    "RIFF size {} is smaller than data size {}",
                    self.size, self.data_chunk.size
                ))
            })?;
        let total = overhead + data_size;
        let (Ok(data_size), Ok(total)) = (u32::try_from(data_size), u32::try_from(total)) else {
            return Err(MorseError::OutputTooLarge { bytes: data_size });
        };

        let mut header = *self;
        header.data_chunk.size = data_size;
        header.size = total;
        Ok(header)
    }

    pub fn sample_rate(&self) -> u32 {
        self.format_chunk.sample_rate
    }
}

fn check_id(what: &str, found: &[u8; 4], expected: &[u8; 4]) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(MorseError::Format(format!(
            "{what} id is {:?}, expected {:?}",
            String::from_utf8_lossy(found),
            String::from_utf8_lossy(expected)
        )))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    pub const SILENCE: Frame = Frame { left: 0, right: 0 };

    pub fn new(left: i16, right: i16) -> Self {
        Self { left, right }
    }
}

/// A decoded container: its header plus one `Frame` per stereo sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulseAudio {
    header: WaveHeader,
    frames: Vec<Frame>,
}

impl PulseAudio {
    /// Pairs a header with its frames. The header must declare exactly `frames.len()` frames.
    pub fn from_parts(header: WaveHeader, frames: Vec<Frame>) -> Result<Self> {
        if header.frame_count() != frames.len() {
            return Err(MorseError::SizeMismatch {
                expected: header.frame_count(),
                actual: frames.len(),
            });
        }
        Ok(Self { header, frames })
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let header = WaveHeader::read_from(&mut cursor).map_err(|_| {
            MorseError::Format(format!(
                "header needs {HEADER_LEN} bytes, input has {}",
                bytes.len()
            ))
        })?;
        header.validate()?;

        let frame_count = header.frame_count();
        let available = (bytes.len() - HEADER_LEN) / BYTES_PER_FRAME;
        if available < frame_count {
            return Err(MorseError::Format(format!(
                "header declares {frame_count} frames but only {available} are present"
            )));
        }
        let trailing = trailing_len(bytes.len(), &header);
        if trailing > 0 {
            log::warn!(
                "Ignoring {trailing} bytes after the data sub-chunk, they will not be re-encoded"
            );
        }

        let mut frames = Vec::with_capacity(frame_count);
        for _ in 0..frame_count {
            let left = cursor.read_i16::<LittleEndian>().map_err(truncated)?;
            let right = cursor.read_i16::<LittleEndian>().map_err(truncated)?;
            frames.push(Frame { left, right });
        }

        Ok(Self { header, frames })
    }

    /// Serializes the header verbatim followed by every frame, left sample first.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.frames.len() * BYTES_PER_FRAME);
        self.write_to(&mut bytes).expect("writing to a Vec cannot fail");
        bytes
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.header.write_to(writer)?;
        for frame in &self.frames {
            writer.write_i16::<LittleEndian>(frame.left)?;
            writer.write_i16::<LittleEndian>(frame.right)?;
        }
        Ok(())
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| MorseError::io(path, e))?;
        let audio = Self::decode(&bytes)?;
        log::info!(
            "Read {:?}: {} frames at {} Hz",
            path,
            audio.sample_count(),
            audio.header.sample_rate()
        );
        Ok(audio)
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| MorseError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| MorseError::io(path, e))?;
        log::info!(
            "Wrote {:?}: {} frames ({} data bytes)",
            path,
            self.sample_count(),
            self.header.data_chunk.size
        );
        Ok(())
    }

    pub fn header(&self) -> &WaveHeader {
        &self.header
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn sample_count(&self) -> usize {
        self.frames.len()
    }

    pub fn data_len(&self) -> usize {
        self.frames.len() * BYTES_PER_FRAME
    }

    pub fn left_channel(&self) -> impl Iterator<Item = i16> + '_ {
        self.frames.iter().map(|f| f.left)
    }

    pub fn right_channel(&self) -> impl Iterator<Item = i16> + '_ {
        self.frames.iter().map(|f| f.right)
    }
}

// Bytes past the declared sample data, e.g. a trailing LIST chunk.
fn trailing_len(input_len: usize, header: &WaveHeader) -> usize {
    input_len.saturating_sub(HEADER_LEN + header.frame_count() * BYTES_PER_FRAME)
}

fn truncated(_: io::Error) -> MorseError {
    MorseError::Format("sample data ends early".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_audio() -> PulseAudio {
        let frames = vec![
            Frame::new(0, 0),
            Frame::new(1000, -1000),
            Frame::new(i16::MAX, i16::MIN),
            Frame::new(-1, 1),
        ];
        let header = WaveHeader::stereo_pcm16(44100, (frames.len() * BYTES_PER_FRAME) as u32);
        PulseAudio::from_parts(header, frames).unwrap()
    }

    #[test]
    fn test_header_layout() {
        let bytes = sample_audio().encode();
        assert_eq!(bytes.len(), HEADER_LEN + 16);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 36 + 16);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u16::from_le_bytes([bytes[22], bytes[23]]), 2);
        assert_eq!(u32::from_le_bytes(bytes[24..28].try_into().unwrap()), 44100);
        assert_eq!(u32::from_le_bytes(bytes[28..32].try_into().unwrap()), 176400);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 16);
    }

    #[test]
    fn test_frames_are_interleaved_left_first() {
        let bytes = sample_audio().encode();
        // Second frame: 1000 then -1000
        assert_eq!(&bytes[48..50], &1000i16.to_le_bytes());
        assert_eq!(&bytes[50..52], &(-1000i16).to_le_bytes());
    }

    #[test]
    fn test_decode_encode_is_byte_exact() {
        let original = sample_audio().encode();
        let decoded = PulseAudio::decode(&original).unwrap();
        assert_eq!(decoded.sample_count(), 4);
        assert_eq!(decoded.left_channel().count(), decoded.right_channel().count());
        assert_eq!(decoded.encode(), original);
    }

    #[test]
    fn test_decode_preserves_nonstandard_riff_size() {
        let mut bytes = sample_audio().encode();
        // A RIFF size that also covers trailing chunks must survive untouched.
        bytes[4..8].copy_from_slice(&100u32.to_le_bytes());
        let decoded = PulseAudio::decode(&bytes).unwrap();
        assert_eq!(decoded.header().size, 100);
        assert_eq!(decoded.encode(), bytes);
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        for (offset, what) in [(0, "RIFF"), (8, "format tag"), (12, "format sub-chunk"), (36, "data")] {
            let mut bytes = sample_audio().encode();
            bytes[offset..offset + 4].copy_from_slice(b"JUNK");
            match PulseAudio::decode(&bytes) {
                Err(MorseError::Format(msg)) => assert!(msg.contains(what), "{msg}"),
                other => panic!("expected format error for {what}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_mono_and_8_bit() {
        let mut mono = sample_audio().encode();
        mono[22..24].copy_from_slice(&1u16.to_le_bytes());
        assert!(matches!(PulseAudio::decode(&mono), Err(MorseError::Format(_))));

        let mut eight_bit = sample_audio().encode();
        eight_bit[34..36].copy_from_slice(&8u16.to_le_bytes());
        assert!(matches!(PulseAudio::decode(&eight_bit), Err(MorseError::Format(_))));
    }

    #[test]
    fn test_rejects_truncated_input() {
        let bytes = sample_audio().encode();
        assert!(matches!(PulseAudio::decode(&bytes[..20]), Err(MorseError::Format(_))));
        assert!(matches!(
            PulseAudio::decode(&bytes[..bytes.len() - 1]),
            Err(MorseError::Format(_))
        ));
    }

    #[test]
    fn test_rejects_partial_frame_size() {
        let mut bytes = sample_audio().encode();
        bytes[40..44].copy_from_slice(&15u32.to_le_bytes());
        assert!(matches!(PulseAudio::decode(&bytes), Err(MorseError::Format(_))));
    }

    #[test]
    fn test_with_data_size_moves_riff_size_by_same_delta() {
        let mut header = WaveHeader::stereo_pcm16(8000, 400);
        header.size += 10;
        let resized = header.with_data_size(1200).unwrap();
        assert_eq!(resized.data_chunk.size, 1200);
        assert_eq!(resized.size, header.size + 800);
        assert_eq!(resized.format_chunk, header.format_chunk);
    }

    #[test]
    fn test_rejects_riff_size_smaller_than_chunks() {
        let mut bytes = sample_audio().encode();
        bytes[4..8].copy_from_slice(&10u32.to_le_bytes());
        match PulseAudio::decode(&bytes) {
            Err(MorseError::Format(msg)) => assert!(msg.contains("RIFF size"), "{msg}"),
            other => panic!("expected format error, got {other:?}"),
        }

        let mut header = WaveHeader::stereo_pcm16(8000, 400);
        header.size = 10;
        assert!(header.validate().is_err());
        assert!(matches!(header.with_data_size(1200), Err(MorseError::Format(_))));
    }

    #[test]
    fn test_trailing_chunk_is_ignored() {
        let mut bytes = sample_audio().encode();
        let canonical_len = bytes.len();
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(b"INFO");
        let riff_size = (bytes.len() - 8) as u32;
        bytes[4..8].copy_from_slice(&riff_size.to_le_bytes());

        let decoded = PulseAudio::decode(&bytes).unwrap();
        assert_eq!(trailing_len(bytes.len(), decoded.header()), 12);
        assert_eq!(decoded.frames(), sample_audio().frames());
        assert_eq!(decoded.encode().len(), canonical_len);
        assert_eq!(trailing_len(canonical_len, decoded.header()), 0);
    }

    #[test]
    fn test_with_data_size_overflow() {
        let header = WaveHeader::stereo_pcm16(8000, 0);
        assert!(matches!(
            header.with_data_size(u64::from(u32::MAX)),
            Err(MorseError::OutputTooLarge { .. })
        ));
    }

    #[test]
    fn test_from_parts_checks_frame_count() {
        let header = WaveHeader::stereo_pcm16(8000, 8);
        assert!(PulseAudio::from_parts(header, vec![Frame::SILENCE]).is_err());
        assert!(PulseAudio::from_parts(header, vec![Frame::SILENCE; 2]).is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PulseAudio::read_file("definitely/not/here.wav");
        assert!(matches!(result, Err(MorseError::Io { .. })));
    }
}
