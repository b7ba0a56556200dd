//! Subcue - Speech to Subtitle Workflow
//!
//! Turns the audio of a media file into a timed, line-wrapped subtitle file
//! using ffmpeg for audio extraction and whisper-cpp for recognition.
//! Recognized character tokens are joined into words, packed into cues under
//! width, duration and reading-speed limits, and written as numbered blocks.

pub mod alignment;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod recognize;
pub mod segment;
pub mod setup;
pub mod subtitle;
pub mod types;
pub mod workflow;
