use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::alignment::Alignment;
use crate::error::{Result, SubcueError};

/// Default config file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "subcue.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub segmenter: SegmenterConfig,
    pub recognizer: RecognizerConfig,
    pub media: MediaConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Width above which a line break is inserted into a cue
    pub max_line_chars: usize,
    /// Hard cap on a single cue's display time (seconds)
    pub max_cue_seconds: f64,
    /// Words granted one extra reading chunk
    pub reading_words_per_chunk: usize,
    /// Seconds per reading chunk
    pub reading_seconds_per_chunk: f64,
    /// Chunks granted up front regardless of word count
    pub buffer_chunks: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_line_chars: 35,
            max_cue_seconds: 6.0,
            reading_words_per_chunk: 3,
            reading_seconds_per_chunk: 3.0,
            buffer_chunks: 1,
        }
    }
}

impl SegmenterConfig {
    /// Seconds a cue may stay on screen after accepting `word_count` words.
    /// Chunk count uses integer (floor) division. A zero chunk size, which
    /// `validate` rejects, earns no chunks beyond the buffer.
    pub fn reading_allowance(&self, word_count: usize) -> f64 {
        let earned = (word_count + 1)
            .checked_div(self.reading_words_per_chunk)
            .unwrap_or(0);
        let chunks = earned + self.buffer_chunks;
        self.reading_seconds_per_chunk * chunks as f64
    }

    /// Whether a cue spanning `elapsed` seconds must be closed.
    pub fn exceeds_limits(&self, elapsed: f64, word_count: usize) -> bool {
        elapsed > self.max_cue_seconds || elapsed > self.reading_allowance(word_count)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_line_chars == 0 {
            return Err(SubcueError::Config("segmenter.max_line_chars must be positive".to_string()));
        }
        if self.reading_words_per_chunk == 0 {
            return Err(SubcueError::Config(
                "segmenter.reading_words_per_chunk must be positive".to_string(),
            ));
        }
        let positive = |seconds: f64| !seconds.is_nan() && seconds > 0.0;
        if !positive(self.max_cue_seconds) || !positive(self.reading_seconds_per_chunk) {
            return Err(SubcueError::Config(
                "segmenter durations must be positive numbers of seconds".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Path to the whisper.cpp CLI binary
    pub binary_path: String,
    /// Model name from the catalogue (e.g. "base") or a path to a ggml model file
    pub model: String,
    /// Spoken language hint ("auto" to let whisper detect it)
    pub language: String,
    /// Worker threads passed to whisper; whisper's own default when unset
    pub threads: Option<u32>,
    /// Extra arguments appended verbatim to the whisper command line
    pub extra_args: Vec<String>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            binary_path: "whisper-cli".to_string(),
            model: "base".to_string(),
            language: "auto".to_string(),
            threads: None,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Sample rate of the extracted audio
    pub sample_rate: u32,
    /// Channel count of the extracted audio
    pub channels: u16,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            sample_rate: 16_000,
            channels: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Screen position applied when the command line does not pick one
    pub alignment: Alignment,
    /// Extension given to subtitle files derived from the input path
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            alignment: Alignment::default(),
            extension: "srt".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubcueError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)?;
        config.segmenter.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, else `subcue.toml` in the current directory, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SubcueError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SubcueError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
