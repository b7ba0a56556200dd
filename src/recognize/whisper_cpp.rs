use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use super::{AudioBuffer, SpeechRecognizer};
use crate::config::RecognizerConfig;
use crate::error::{Result, SubcueError};
use crate::types::{SPACE, Token};

/// Whisper.cpp full JSON output (`-ojf`), reduced to the fields we read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOutput {
    #[serde(default)]
    pub transcription: Vec<WhisperCppSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppSegment {
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<WhisperCppToken>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppToken {
    pub text: String,
    pub offsets: WhisperCppOffsets,
}

/// Millisecond offsets from the start of the audio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOffsets {
    pub from: i64,
    pub to: i64,
}

impl WhisperCppOutput {
    /// Explode whisper's sub-word tokens into one token per character.
    ///
    /// Characters are spread evenly over the token's `[from, to)` span and
    /// any whitespace becomes the space marker. Special tokens (`[_BEG_]`,
    /// `[_TT_..]`) are dropped and times never run backwards.
    pub fn into_char_tokens(self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut last = 0.0_f64;

        for token in self.transcription.into_iter().flat_map(|s| s.tokens) {
            if token.text.starts_with("[_") {
                continue;
            }

            let chars: Vec<char> = token.text.chars().collect();
            let from = token.offsets.from.max(0) as f64;
            let span = (token.offsets.to.max(0) as f64 - from).max(0.0);

            for (i, c) in chars.iter().enumerate() {
                let ms = from + span * i as f64 / chars.len() as f64;
                let time = (ms / 1000.0).max(last);
                last = time;

                if c.is_whitespace() {
                    tokens.push(Token::new(SPACE, time));
                } else {
                    tokens.push(Token::new(c.to_string(), time));
                }
            }
        }

        tokens
    }
}

/// Recognizer backed by the whisper.cpp command line tool
pub struct WhisperCppRecognizer {
    config: RecognizerConfig,
    model_path: PathBuf,
}

impl WhisperCppRecognizer {
    pub fn new(config: RecognizerConfig, model_path: PathBuf) -> Self {
        Self { config, model_path }
    }

    fn build_command(&self, audio_path: &Path, output_prefix: &Path) -> Command {
        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg("-m").arg(&self.model_path)
            .arg("-f").arg(audio_path)
            .arg("-ojf")
            .arg("-of").arg(output_prefix)
            .arg("-l").arg(&self.config.language);

        if let Some(threads) = self.config.threads {
            cmd.arg("-t").arg(threads.to_string());
        }
        cmd.args(&self.config.extra_args);
        cmd
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperCppRecognizer {
    async fn recognize(&self, audio: &AudioBuffer) -> Result<Vec<Token>> {
        info!("Recognizing {:.1}s of audio with {}", audio.duration(), self.model_path.display());

        let temp_dir = tempfile::tempdir()
            .map_err(|e| SubcueError::Recognizer(format!("Failed to create temp directory: {}", e)))?;
        let audio_path = temp_dir.path().join("audio.wav");
        let output_prefix = temp_dir.path().join("transcript");
        audio.write_wav(&audio_path)?;

        let mut cmd = self.build_command(&audio_path, &output_prefix);
        debug!("Executing whisper command: {:?}", cmd);

        let output = cmd.output().await
            .map_err(|e| SubcueError::Recognizer(format!("Failed to execute {}: {}", self.config.binary_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubcueError::Recognizer(format!("Whisper failed: {}", stderr)));
        }

        let json_file = output_prefix.with_extension("json");
        let json_content = tokio::fs::read_to_string(&json_file).await
            .map_err(|e| SubcueError::Recognizer(format!("Failed to read output: {}", e)))?;

        let whisper_output: WhisperCppOutput = serde_json::from_str(&json_content)
            .map_err(|e| SubcueError::Recognizer(format!("Failed to parse Whisper.cpp JSON: {}", e)))?;

        let tokens = whisper_output.into_char_tokens();
        info!("Recognized {} character tokens", tokens.len());
        Ok(tokens)
    }

    fn check_availability(&self) -> Result<()> {
        if !self.model_path.exists() {
            return Err(SubcueError::FileNotFound(self.model_path.display().to_string()));
        }

        std::process::Command::new(&self.config.binary_path)
            .arg("--help")
            .output()
            .map_err(|e| SubcueError::Recognizer(format!("{} not found: {}", self.config.binary_path, e)))?;

        info!("Recognizer is available");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "systeminfo": "AVX = 1",
        "result": { "language": "en" },
        "transcription": [
            {
                "timestamps": { "from": "00:00:00,000", "to": "00:00:01,200" },
                "offsets": { "from": 0, "to": 1200 },
                "text": " Hi there",
                "tokens": [
                    { "text": "[_BEG_]", "offsets": { "from": 0, "to": 0 }, "id": 50364, "p": 0.9 },
                    { "text": " Hi", "offsets": { "from": 0, "to": 300 }, "id": 17, "p": 0.8 },
                    { "text": " there", "offsets": { "from": 300, "to": 900 }, "id": 18, "p": 0.7 },
                    { "text": "[_TT_60]", "offsets": { "from": 1200, "to": 1200 }, "id": 50424, "p": 0.1 }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_char_tokens_from_full_json() {
        let output: WhisperCppOutput = serde_json::from_str(SAMPLE).unwrap();
        let tokens = output.into_char_tokens();

        let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, " Hi there");
        assert_eq!(tokens[0], Token::new(" ", 0.0));
        assert_eq!(tokens[1], Token::new("H", 0.1));
        assert_eq!(tokens[2], Token::new("i", 0.2));
        assert_eq!(tokens[3], Token::new(" ", 0.3));
        assert_eq!(tokens[4], Token::new("t", 0.4));
    }

    #[test]
    fn test_times_never_run_backwards() {
        let output = WhisperCppOutput {
            transcription: vec![WhisperCppSegment {
                text: "ab".to_string(),
                tokens: vec![
                    WhisperCppToken { text: "a".to_string(), offsets: WhisperCppOffsets { from: 500, to: 600 } },
                    WhisperCppToken { text: "b".to_string(), offsets: WhisperCppOffsets { from: 400, to: 450 } },
                ],
            }],
        };

        let tokens = output.into_char_tokens();
        assert_eq!(tokens, vec![Token::new("a", 0.5), Token::new("b", 0.5)]);
    }

    #[test]
    fn test_empty_transcription() {
        let output: WhisperCppOutput = serde_json::from_str("{}").unwrap();
        assert!(output.into_char_tokens().is_empty());
    }

    #[test]
    fn test_command_line() {
        let config = RecognizerConfig {
            threads: Some(4),
            extra_args: vec!["--no-gpu".to_string()],
            ..RecognizerConfig::default()
        };
        let recognizer = WhisperCppRecognizer::new(config, PathBuf::from("models/ggml-base.bin"));
        let cmd = recognizer.build_command(Path::new("a.wav"), Path::new("out"));

        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["-m", "models/ggml-base.bin", "-f", "a.wav", "-ojf", "-of", "out", "-l", "auto", "-t", "4", "--no-gpu"]
        );
    }
}
