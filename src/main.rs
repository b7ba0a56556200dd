//! Subcue - Speech to Subtitle Workflow
//!
//! Entry point for the subcue command line tool, which creates subtitle
//! files from the speech in video and audio files.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tracing::{Level, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use subcue::alignment::Alignment;
use subcue::cli::{Args, Commands};
use subcue::config::Config;
use subcue::error::SubcueError;
use subcue::setup::ModelManager;
use subcue::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;
    info!("Starting subcue");
    let started = Instant::now();

    let config = Config::load(args.config.as_deref())?;
    let default_alignment = config.output.alignment;

    match args.command {
        Commands::Process { input, alignment, output } => {
            let workflow = Workflow::new(config).await?;
            let report = workflow
                .process_file(&input, alignment.unwrap_or(default_alignment), output.as_deref())
                .await?;
            println!(
                "Created subtitle file: {} ({} cues)",
                report.output_path.display(),
                report.cues
            );
        }
        Commands::Batch { input_dir, alignment } => {
            let workflow = Workflow::new(config).await?;
            let report = workflow
                .process_directory(&input_dir, alignment.unwrap_or(default_alignment))
                .await?;

            for done in &report.processed {
                println!("{:<8} {}", "created", done.output_path.display());
            }
            for (path, reason) in &report.failed {
                println!("{:<8} {} ({})", "failed", path.display(), reason);
            }
            println!(
                "{} processed, {} failed",
                report.processed.len(),
                report.failed.len()
            );
        }
        Commands::Transcribe { input, output, alignment } => {
            let workflow = Workflow::new(config).await?;
            let report = workflow
                .transcribe_audio(&input, alignment.unwrap_or(default_alignment), output.as_deref())
                .await?;
            println!(
                "Created subtitle file: {} ({} cues)",
                report.output_path.display(),
                report.cues
            );
        }
        Commands::Render { input, output, alignment } => {
            let workflow = Workflow::from_config(config)?;
            let cues = workflow
                .render_tokens(&input, alignment.unwrap_or(default_alignment), &output)
                .await?;
            println!("Created subtitle file: {} ({} cues)", output.display(), cues);
        }
        Commands::Extract { input, output } => {
            info!("Extracting audio from: {}", input.display());
            let workflow = Workflow::from_config(config)?;
            workflow.extract_audio(&input, &output).await?;
        }
        Commands::Alignments => {
            println!("{:<15} {:<10}", "Alignment", "Tag");
            println!("{}", "-".repeat(25));
            for alignment in Alignment::ALL {
                let tag = if alignment.prefix().is_empty() {
                    "(none)"
                } else {
                    alignment.prefix()
                };
                println!("{:<15} {:<10}", alignment.name(), tag);
            }
        }
        Commands::Models { download } => {
            let manager = ModelManager::new()?;

            if let Some(name) = download {
                let model = manager.find_model(&name).ok_or_else(|| {
                    SubcueError::Config(format!("Unknown model '{}'", name))
                })?;
                manager.download_model(&model).await?;
            }

            println!("\nAvailable Whisper Models:");
            println!("{:<15} {:<25} {:<10} {:<10}", "Name", "Filename", "Size (MB)", "Status");
            println!("{}", "-".repeat(65));
            for model in manager.available_models() {
                let status = if manager.is_downloaded(&model) {
                    "Downloaded"
                } else {
                    "Missing"
                };
                println!(
                    "{:<15} {:<25} {:<10.1} {:<10}",
                    model.name, model.filename, model.size_mb, status
                );
            }
        }
        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                return Err(SubcueError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    output.display()
                ))
                .into());
            }
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    info!("Finished in {}", format_duration(started.elapsed().as_secs()));
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".subcue").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "subcue.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("subcue.log").display()
    );

    Ok(())
}

/// Format duration in seconds to human readable string
fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
