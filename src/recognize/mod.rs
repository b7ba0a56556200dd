// Speech recognition boundary
//
// The engine itself is external. This module defines what the pipeline
// needs from it (audio in, ordered character tokens out) and provides:
// - audio: the normalized PCM buffer handed to the engine
// - whisper_cpp: adapter around the whisper.cpp command line tool
//
// To plug in another engine, implement SpeechRecognizer and make its
// tokens follow the same contract: one character or the space marker per
// token, start times in seconds, non-decreasing.

pub mod audio;
pub mod whisper_cpp;

use async_trait::async_trait;
use std::path::PathBuf;

pub use audio::AudioBuffer;
pub use whisper_cpp::WhisperCppRecognizer;

use crate::config::RecognizerConfig;
use crate::error::Result;
use crate::types::Token;

/// Main trait for speech recognition
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize speech in the buffer as an ordered character token stream
    async fn recognize(&self, audio: &AudioBuffer) -> Result<Vec<Token>>;

    /// Check that the engine can be run
    fn check_availability(&self) -> Result<()>;
}

/// Factory for creating recognizer instances
pub struct RecognizerFactory;

impl RecognizerFactory {
    /// Create the default recognizer (whisper.cpp) for a resolved model file
    pub fn create_default(config: RecognizerConfig, model_path: PathBuf) -> Box<dyn SpeechRecognizer> {
        Box::new(WhisperCppRecognizer::new(config, model_path))
    }
}
