use async_trait::async_trait;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use super::{MediaCommandBuilder, MediaProcessorTrait};
use crate::config::MediaConfig;
use crate::error::{Result, SubcueError};

/// Concrete implementation of media processor (FFmpeg-based)
pub struct MediaProcessorImpl {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl MediaProcessorImpl {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaProcessorTrait for MediaProcessorImpl {
    async fn extract_audio(&self, media_path: &Path, audio_path: &Path) -> Result<()> {
        info!("Extracting audio from {} to {}", media_path.display(), audio_path.display());

        if !media_path.exists() {
            return Err(SubcueError::FileNotFound(media_path.display().to_string()));
        }

        let command = self.command_builder.extract_audio(
            media_path,
            audio_path,
            self.config.sample_rate,
            self.config.channels,
        );
        command.execute().await?;

        info!("Audio extraction completed");
        Ok(())
    }

    fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("-version")
            .output()
            .map_err(|e| SubcueError::Media(format!("Media processor not found: {}", e)))?;

        if output.status.success() {
            info!("Media processor is available");
            Ok(())
        } else {
            Err(SubcueError::Media("Media processor version check failed".to_string()))
        }
    }

    async fn get_version_info(&self) -> Result<String> {
        debug!("Getting media processor version information");

        let stdout = self.command_builder.version_check().execute().await?;
        // The first line carries the version
        Ok(stdout.lines().next().unwrap_or("Unknown version").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_input_file() {
        let processor = MediaProcessorImpl::new(MediaConfig::default());
        let err = processor
            .extract_audio(Path::new("/nonexistent/movie.mp4"), Path::new("/tmp/out.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubcueError::FileNotFound(_)));
    }

    #[test]
    fn test_unavailable_binary() {
        let config = MediaConfig {
            binary_path: "/nonexistent/ffmpeg-binary".to_string(),
            ..MediaConfig::default()
        };
        let processor = MediaProcessorImpl::new(config);
        assert!(matches!(processor.check_availability(), Err(SubcueError::Media(_))));
    }
}
