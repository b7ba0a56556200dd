use std::path::Path;

use crate::error::{Result, SubcueError};

/// Normalized PCM audio handed to a recognizer: signed 16-bit samples,
/// interleaved when there is more than one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Load a WAV file, requiring 16-bit integer samples in the given layout.
    pub fn from_wav<P: AsRef<Path>>(path: P, sample_rate: u32, channels: u16) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = hound::WavReader::open(path)
            .map_err(|e| SubcueError::Audio(format!("Failed to open {}: {}", path.display(), e)))?;

        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(SubcueError::UnsupportedFormat(format!(
                "{}: expected 16-bit PCM, got {} bits {:?}",
                path.display(),
                spec.bits_per_sample,
                spec.sample_format
            )));
        }
        if spec.sample_rate != sample_rate || spec.channels != channels {
            return Err(SubcueError::Audio(format!(
                "{}: expected {} Hz / {} channel(s), got {} Hz / {} channel(s)",
                path.display(),
                sample_rate,
                channels,
                spec.sample_rate,
                spec.channels
            )));
        }

        let samples = reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| SubcueError::Audio(format!("Failed to read WAV samples: {}", e)))?;

        Ok(Self::new(samples, spec.sample_rate, spec.channels))
    }

    /// Write the buffer out as a 16-bit PCM WAV file.
    pub fn write_wav<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let audio_error = |e: hound::Error| SubcueError::Audio(format!("Failed to write {}: {}", path.display(), e));
        let mut writer = hound::WavWriter::create(path, spec).map_err(audio_error)?;
        for sample in &self.samples {
            writer.write_sample(*sample).map_err(audio_error)?;
        }
        writer.finalize().map_err(audio_error)?;
        Ok(())
    }

    /// Length of the audio in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples: Vec<i16> = (0..16_000).map(|i| ((i % 200) as i16 - 100) * 50).collect();
        let buffer = AudioBuffer::new(samples, 16_000, 1);

        buffer.write_wav(&path).unwrap();
        let loaded = AudioBuffer::from_wav(&path, 16_000, 1).unwrap();
        assert_eq!(loaded, buffer);
        assert_eq!(loaded.duration(), 1.0);
    }

    #[test]
    fn test_wrong_layout_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        AudioBuffer::new(vec![0; 3200], 44_100, 2).write_wav(&path).unwrap();

        let err = AudioBuffer::from_wav(&path, 16_000, 1).unwrap_err();
        assert!(matches!(err, SubcueError::Audio(ref msg) if msg.contains("44100 Hz")));
    }

    #[test]
    fn test_missing_file() {
        let err = AudioBuffer::from_wav("/nonexistent/audio.wav", 16_000, 1).unwrap_err();
        assert!(matches!(err, SubcueError::Audio(_)));
    }
}
