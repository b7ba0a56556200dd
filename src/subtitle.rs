use std::io::Write;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::alignment::Alignment;
use crate::error::{Result, SubcueError};
use crate::types::Cue;

/// Format time in seconds as `HH:MM:SS.mmm`.
///
/// Hours are not wrapped at 24. The value is rounded to whole microseconds
/// first so binary noise (0.29 stored as 0.28999...) does not cost a
/// millisecond, then milliseconds are truncated.
pub fn format_timestamp(seconds: f64) -> String {
    let micros = (seconds.max(0.0) * 1_000_000.0).round() as u64;
    let total_milliseconds = micros / 1_000;
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

/// Write cues as numbered blocks separated by one blank line, prefixing
/// each text with `prefix`. Returns the number of blocks written.
///
/// Stops at the first error from either the cue stream or the writer;
/// whatever was written up to that point is incomplete.
pub fn write_srt<W, I>(writer: &mut W, cues: I, prefix: &str) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Result<Cue>>,
{
    let mut count = 0;

    for cue in cues {
        let cue = cue?;
        count += 1;

        let sink_error = |e: std::io::Error| SubcueError::Serialization(format!("block {}: {}", count, e));
        if count > 1 {
            writeln!(writer).map_err(sink_error)?;
        }
        writeln!(writer, "{}", count).map_err(sink_error)?;
        writeln!(
            writer,
            "{} --> {}",
            format_timestamp(cue.start_time),
            format_timestamp(cue.end_time)
        )
        .map_err(sink_error)?;
        writeln!(writer, "{}{}", prefix, cue.text).map_err(sink_error)?;
    }

    writer
        .flush()
        .map_err(|e| SubcueError::Serialization(format!("flush: {}", e)))?;
    Ok(count)
}

/// Render already segmented cues to a string
pub fn render_srt(cues: &[Cue], alignment: Alignment) -> String {
    let mut buffer = Vec::new();
    // Writing to a Vec cannot fail and the cues carry no errors
    let _ = write_srt(&mut buffer, cues.iter().cloned().map(Ok), alignment.prefix());
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Generate a subtitle file from a cue stream.
///
/// The file only appears at `output_path` once every cue was rendered and
/// written; on failure nothing is left behind.
pub async fn generate_srt<P, I>(cues: I, alignment: Alignment, output_path: P) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Result<Cue>>,
{
    let output_path = output_path.as_ref();
    info!("Generating subtitle file: {}", output_path.display());

    let mut content = Vec::new();
    let count = write_srt(&mut content, cues, alignment.prefix())?;
    debug!("Rendered {} cues ({} bytes)", count, content.len());

    let file_name = output_path
        .file_name()
        .ok_or_else(|| SubcueError::Serialization(format!("Invalid output path: {}", output_path.display())))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = output_path.with_file_name(temp_name);

    if let Err(e) = fs::write(&temp_path, &content).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(SubcueError::Serialization(format!(
            "Failed to write {}: {}",
            temp_path.display(),
            e
        )));
    }

    if let Err(e) = fs::rename(&temp_path, output_path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(SubcueError::Serialization(format!(
            "Failed to move subtitle file into place: {}",
            e
        )));
    }

    info!("Subtitle file generated successfully ({} cues)", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_timestamp(65.123), "00:01:05.123");
        assert_eq!(format_timestamp(3661.5), "01:01:01.500");
        assert_eq!(format_timestamp(0.29), "00:00:00.290");
    }

    #[test]
    fn test_format_timestamp_truncates_milliseconds() {
        assert_eq!(format_timestamp(3725.4567), "01:02:05.456");
        assert_eq!(format_timestamp(1.9999), "00:00:01.999");
    }

    #[test]
    fn test_format_timestamp_hours_not_wrapped() {
        assert_eq!(format_timestamp(100.0 * 3600.0), "100:00:00.000");
        assert_eq!(format_timestamp(25.0 * 3600.0 + 1.0), "25:00:01.000");
    }

    #[test]
    fn test_negative_time_clamped() {
        assert_eq!(format_timestamp(-1.0), "00:00:00.000");
    }

    #[test]
    fn test_two_blocks_single_separator() {
        let cues = vec![Cue::new(0.0, 0.2, "Hi"), Cue::new(0.3, 0.8, "there")];
        let output = render_srt(&cues, Alignment::BottomCenter);

        assert_eq!(
            output,
            "1\n00:00:00.000 --> 00:00:00.200\nHi\n\n2\n00:00:00.300 --> 00:00:00.800\nthere\n"
        );
        assert!(!output.starts_with('\n'));
        assert!(!output.ends_with("\n\n"));
    }

    #[test]
    fn test_alignment_prefix_and_line_break() {
        let cues = vec![Cue::new(1.0, 2.0, "first line\nsecond line")];
        let output = render_srt(&cues, Alignment::TopCenter);
        assert_eq!(
            output,
            "1\n00:00:01.000 --> 00:00:02.000\n{\\an8}first line\nsecond line\n"
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let cues = vec![Cue::new(0.5, 1.25, "again"), Cue::new(2.0, 3.0, "and again")];
        assert_eq!(
            render_srt(&cues, Alignment::MiddleLeft),
            render_srt(&cues, Alignment::MiddleLeft)
        );
    }

    #[test]
    fn test_no_cues_no_output() {
        assert_eq!(render_srt(&[], Alignment::TopLeft), "");
    }

    struct BrokenSink {
        accepted: usize,
    }

    impl Write for BrokenSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.accepted >= 40 {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
            }
            self.accepted += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let cues = (0..5).map(|i| Ok(Cue::new(i as f64, i as f64 + 0.5, "text")));
        let mut sink = BrokenSink { accepted: 0 };
        let err = write_srt(&mut sink, cues, "").unwrap_err();
        assert!(matches!(err, SubcueError::Serialization(_)));
    }

    #[test]
    fn test_cue_error_propagates() {
        let cues = vec![
            Ok(Cue::new(0.0, 1.0, "fine")),
            Err(SubcueError::MalformedToken { index: 9, time: 0.5, previous: 1.0 }),
        ];
        let mut buffer = Vec::new();
        let err = write_srt(&mut buffer, cues, "").unwrap_err();
        assert!(matches!(err, SubcueError::MalformedToken { index: 9, .. }));
    }

    #[tokio::test]
    async fn test_generate_srt_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.srt");
        let cues = vec![Ok(Cue::new(0.0, 1.0, "hello"))];

        let count = generate_srt(cues, Alignment::BottomLeft, &path).await.unwrap();
        assert_eq!(count, 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1\n00:00:00.000 --> 00:00:01.000\n{\\an1}hello\n");
        assert!(!dir.path().join("movie.srt.tmp").exists());
    }

    #[tokio::test]
    async fn test_generate_srt_leaves_nothing_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.srt");
        let cues = vec![
            Ok(Cue::new(0.0, 1.0, "hello")),
            Err(SubcueError::MalformedToken { index: 2, time: 0.1, previous: 1.0 }),
        ];

        assert!(generate_srt(cues, Alignment::default(), &path).await.is_err());
        assert!(!path.exists());
    }
}
