use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::alignment::Alignment;
use crate::config::Config;
use crate::error::{Result, SubcueError};
use crate::media::{MediaProcessorFactory, MediaProcessorTrait};
use crate::recognize::{AudioBuffer, RecognizerFactory, SpeechRecognizer};
use crate::segment::SegmentExt;
use crate::setup::ModelManager;
use crate::subtitle::generate_srt;
use crate::types::Token;

/// File extensions picked up when processing a directory
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "mkv", "wmv", "flv", "webm", "mp3", "wav", "m4a", "flac", "ogg",
];

/// Outcome of producing one subtitle file
#[derive(Debug, Clone)]
pub struct SubtitleReport {
    pub output_path: PathBuf,
    pub cues: usize,
    pub elapsed: Duration,
}

/// Outcome of a directory run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub processed: Vec<SubtitleReport>,
    pub failed: Vec<(PathBuf, String)>,
}

pub struct Workflow {
    config: Config,
    recognizer: Box<dyn SpeechRecognizer>,
    media: Box<dyn MediaProcessorTrait>,
}

impl Workflow {
    /// Build the default whisper.cpp + ffmpeg workflow, fetching the
    /// configured model if needed.
    pub async fn new(config: Config) -> Result<Self> {
        config.segmenter.validate()?;

        let models = ModelManager::new()?;
        let model_path = models.ensure_model(&config.recognizer.model).await?;

        let recognizer = RecognizerFactory::create_default(config.recognizer.clone(), model_path);
        let media = MediaProcessorFactory::create_processor(config.media.clone());

        // Check dependencies
        media.check_availability()?;
        recognizer.check_availability()?;
        if let Ok(version) = media.get_version_info().await {
            debug!("Media processor: {}", version);
        }

        Ok(Self::with_components(config, recognizer, media))
    }

    /// Build the default components without fetching the model or probing
    /// the external tools. For commands that never run recognition.
    pub fn from_config(config: Config) -> Result<Self> {
        config.segmenter.validate()?;

        let model_path = ModelManager::new()?.resolve_model_path(&config.recognizer.model);
        let recognizer = RecognizerFactory::create_default(config.recognizer.clone(), model_path);
        let media = MediaProcessorFactory::create_processor(config.media.clone());

        Ok(Self::with_components(config, recognizer, media))
    }

    pub fn with_components(
        config: Config,
        recognizer: Box<dyn SpeechRecognizer>,
        media: Box<dyn MediaProcessorTrait>,
    ) -> Self {
        Self {
            config,
            recognizer,
            media,
        }
    }

    /// Subtitle path derived from a media path by swapping its extension
    pub fn subtitle_path<P: AsRef<Path>>(&self, media_path: P) -> PathBuf {
        media_path.as_ref().with_extension(&self.config.output.extension)
    }

    /// Extract, recognize, segment and write subtitles for one media file.
    ///
    /// The extracted audio lives in a temporary directory that is removed
    /// whether or not recognition succeeds.
    pub async fn process_file<P: AsRef<Path>>(
        &self,
        input_path: P,
        alignment: Alignment,
        output_path: Option<&Path>,
    ) -> Result<SubtitleReport> {
        let input_path = input_path.as_ref();
        info!("Processing media file: {}", input_path.display());

        if !input_path.exists() {
            return Err(SubcueError::FileNotFound(input_path.display().to_string()));
        }

        let started = Instant::now();
        let output_path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.subtitle_path(input_path));

        let temp_dir = tempfile::Builder::new().prefix("subcue-").tempdir()?;
        let audio_path = temp_dir.path().join("audio.wav");
        debug!("Extracting audio to {}", audio_path.display());

        let result: Result<usize> = async {
            self.media.extract_audio(input_path, &audio_path).await?;
            self.subtitles_from_audio(&audio_path, alignment, &output_path).await
        }
        .await;

        if let Err(e) = temp_dir.close() {
            warn!("Failed to remove temporary audio: {}", e);
        }

        let cues = result?;
        let report = SubtitleReport {
            output_path,
            cues,
            elapsed: started.elapsed(),
        };
        info!(
            "Created subtitle file {} ({} cues) in {:.1?}",
            report.output_path.display(),
            report.cues,
            report.elapsed
        );
        Ok(report)
    }

    /// Process every media file under a directory. A failing file is
    /// logged and recorded; the rest of the batch still runs.
    pub async fn process_directory<P: AsRef<Path>>(
        &self,
        input_dir: P,
        alignment: Alignment,
    ) -> Result<BatchReport> {
        let input_dir = input_dir.as_ref();
        info!("Processing directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(SubcueError::Config("Input path is not a directory".to_string()));
        }

        let mut media_files: Vec<PathBuf> = WalkDir::new(input_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| is_media_file(p))
            .collect();
        media_files.sort();

        info!("Found {} media files to process", media_files.len());

        let mut report = BatchReport::default();
        for media_path in media_files {
            match self.process_file(&media_path, alignment, None).await {
                Ok(done) => report.processed.push(done),
                Err(e) => {
                    warn!("Failed to process {}: {}", media_path.display(), e);
                    report.failed.push((media_path, e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Subtitle an audio file that is already in the recognizer's format
    pub async fn transcribe_audio<P: AsRef<Path>>(
        &self,
        audio_path: P,
        alignment: Alignment,
        output_path: Option<&Path>,
    ) -> Result<SubtitleReport> {
        let audio_path = audio_path.as_ref();
        let started = Instant::now();
        let output_path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.subtitle_path(audio_path));

        let cues = self.subtitles_from_audio(audio_path, alignment, &output_path).await?;
        Ok(SubtitleReport {
            output_path,
            cues,
            elapsed: started.elapsed(),
        })
    }

    /// Segment and write a recorded token stream (JSON array of tokens)
    pub async fn render_tokens<P: AsRef<Path>>(
        &self,
        tokens_path: P,
        alignment: Alignment,
        output_path: &Path,
    ) -> Result<usize> {
        let tokens_path = tokens_path.as_ref();
        info!("Rendering tokens from {}", tokens_path.display());

        let content = fs::read_to_string(tokens_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SubcueError::FileNotFound(tokens_path.display().to_string()),
            _ => SubcueError::Io(e),
        })?;
        let tokens: Vec<Token> = serde_json::from_str(&content)?;

        self.write_subtitles(tokens, alignment, output_path).await
    }

    /// Extract audio from a media file
    pub async fn extract_audio<P: AsRef<Path>>(&self, media_path: P, audio_path: P) -> Result<()> {
        self.media.extract_audio(media_path.as_ref(), audio_path.as_ref()).await
    }

    async fn subtitles_from_audio(
        &self,
        audio_path: &Path,
        alignment: Alignment,
        output_path: &Path,
    ) -> Result<usize> {
        let audio = AudioBuffer::from_wav(
            audio_path,
            self.config.media.sample_rate,
            self.config.media.channels,
        )?;
        if audio.is_empty() {
            warn!("No audio samples in {}", audio_path.display());
        }

        info!("Transcribing...");
        let tokens = self.recognizer.recognize(&audio).await?;
        self.write_subtitles(tokens, alignment, output_path).await
    }

    async fn write_subtitles(
        &self,
        tokens: Vec<Token>,
        alignment: Alignment,
        output_path: &Path,
    ) -> Result<usize> {
        debug!("Segmenting {} tokens", tokens.len());
        let cues = tokens.into_iter().words().cues(self.config.segmenter);
        generate_srt(cues, alignment, output_path).await
    }
}

fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MEDIA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
