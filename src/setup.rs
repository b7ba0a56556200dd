use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::{Result, SubcueError};

const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Known whisper.cpp models: name and approximate size in MB
const MODEL_CATALOGUE: &[(&str, f64)] = &[
    ("tiny", 75.0),
    ("tiny.en", 75.0),
    ("base", 142.0),
    ("base.en", 142.0),
    ("small", 466.0),
    ("small.en", 466.0),
    ("medium", 1500.0),
    ("medium.en", 1500.0),
    ("large-v1", 2900.0),
    ("large-v2", 2900.0),
    ("large-v3", 2900.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub filename: String,
    pub url: String,
    pub size_mb: f64,
}

impl ModelInfo {
    fn from_catalogue(name: &str, size_mb: f64) -> Self {
        let filename = format!("ggml-{}.bin", name);
        Self {
            name: name.to_string(),
            url: format!("{}/{}", MODEL_BASE_URL, filename),
            filename,
            size_mb,
        }
    }
}

/// Locates whisper models on disk and downloads missing ones
pub struct ModelManager {
    client: Client,
    base_dir: PathBuf,
}

impl ModelManager {
    /// Manager rooted at `.subcue` in the current directory
    pub fn new() -> Result<Self> {
        Self::with_base_dir(".subcue")
    }

    pub fn with_base_dir<P: Into<PathBuf>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(base_dir.join("models"))?;

        let client = Client::builder()
            .user_agent(concat!("subcue/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_dir })
    }

    pub fn models_dir(&self) -> PathBuf {
        self.base_dir.join("models")
    }

    pub fn available_models(&self) -> Vec<ModelInfo> {
        MODEL_CATALOGUE
            .iter()
            .map(|(name, size)| ModelInfo::from_catalogue(name, *size))
            .collect()
    }

    pub fn find_model(&self, name: &str) -> Option<ModelInfo> {
        self.available_models().into_iter().find(|m| m.name == name)
    }

    /// Map a configured model to a file path. Anything that looks like a
    /// path is taken as-is; a bare name maps into the models directory.
    pub fn resolve_model_path(&self, model: &str) -> PathBuf {
        if model.contains(std::path::MAIN_SEPARATOR) || model.contains('/') || model.ends_with(".bin") {
            return PathBuf::from(model);
        }
        self.models_dir().join(format!("ggml-{}.bin", model))
    }

    pub fn is_downloaded(&self, model: &ModelInfo) -> bool {
        self.models_dir().join(&model.filename).exists()
    }

    /// Resolve the configured model, downloading it when it is a known name
    /// that is not on disk yet.
    pub async fn ensure_model(&self, model: &str) -> Result<PathBuf> {
        let path = self.resolve_model_path(model);
        if path.exists() {
            return Ok(path);
        }

        match self.find_model(model) {
            Some(info) => {
                info!("Model {} not found locally", model);
                self.download_model(&info).await
            }
            None => {
                warn!("Model '{}' is neither a known name nor an existing file", model);
                Err(SubcueError::FileNotFound(path.display().to_string()))
            }
        }
    }

    pub async fn download_model(&self, model: &ModelInfo) -> Result<PathBuf> {
        let local_path = self.models_dir().join(&model.filename);

        if local_path.exists() {
            info!("Model {} already exists at {}", model.name, local_path.display());
            return Ok(local_path);
        }

        info!("Downloading {} model ({:.1} MB)...", model.name, model.size_mb);

        let mut response = self.client.get(&model.url).send().await?;
        if !response.status().is_success() {
            return Err(SubcueError::Config(format!(
                "Failed to download model {}: HTTP {}",
                model.name,
                response.status()
            )));
        }

        let total = response
            .content_length()
            .unwrap_or((model.size_mb * 1_000_000.0) as u64);
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .map_err(|e| SubcueError::Config(format!("Invalid progress template: {}", e)))?
                .progress_chars("#>-"),
        );

        let temp_path = local_path.with_extension("tmp");
        if let Err(e) = self.stream_to_file(&mut response, &temp_path, &pb).await {
            let _ = async_fs::remove_file(&temp_path).await;
            pb.abandon();
            return Err(e);
        }

        async_fs::rename(&temp_path, &local_path).await?;

        pb.finish_with_message(format!("Downloaded {}", model.name));
        info!("Successfully downloaded {} to {}", model.name, local_path.display());

        Ok(local_path)
    }

    async fn stream_to_file(
        &self,
        response: &mut reqwest::Response,
        path: &Path,
        pb: &ProgressBar,
    ) -> Result<()> {
        let mut file = async_fs::File::create(path).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            pb.inc(chunk.len() as u64);
        }
        file.flush().await?;
        Ok(())
    }
}
