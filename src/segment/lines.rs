use crate::config::SegmenterConfig;
use crate::error::{Result, SubcueError};
use crate::types::{Cue, Word};

/// Cue being accumulated
#[derive(Debug)]
struct OpenCue {
    start_time: f64,
    end_time: f64,
    text: String,
    word_count: usize,
}

impl OpenCue {
    fn seed(word: Word) -> Self {
        Self {
            start_time: word.start_time,
            end_time: word.end_time,
            text: word.text,
            word_count: 0,
        }
    }

    /// Offer the next word. Returns the finished cue when `word` cannot join
    /// the open one; the open cue is then reseeded from `word`.
    fn push(&mut self, word: Word, config: &SegmenterConfig) -> Option<Cue> {
        let joined = format!("{} {}", self.text, word.text);
        let elapsed = word.end_time - self.start_time;

        // A line break only survives when the cue closes on this same word.
        let broken = (joined.chars().count() > config.max_line_chars)
            .then(|| format!("{}\n{}", self.text, word.text));

        if config.exceeds_limits(elapsed, self.word_count) {
            let text = broken.unwrap_or_else(|| std::mem::take(&mut self.text));
            let cue = Cue::new(self.start_time, self.end_time, text);
            *self = OpenCue::seed(word);
            Some(cue)
        } else {
            self.text = joined;
            self.end_time = word.end_time;
            self.word_count += 1;
            None
        }
    }

    fn close(self) -> Cue {
        Cue::new(self.start_time, self.end_time, self.text)
    }
}

/// Groups words into cues bounded by line width, display time and reading speed.
///
/// Errors from the word stream are passed through once and end the sequence;
/// the partially accumulated cue is dropped with them. An invalid config is
/// reported the same way, before any word is read.
pub struct LineSegmenter<I> {
    words: I,
    config: SegmenterConfig,
    open: Option<OpenCue>,
    rejected: Option<SubcueError>,
    finished: bool,
}

impl<I> LineSegmenter<I>
where
    I: Iterator<Item = Result<Word>>,
{
    pub fn new<T>(words: T, config: SegmenterConfig) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            words: words.into_iter(),
            config,
            open: None,
            rejected: config.validate().err(),
            finished: false,
        }
    }
}

impl<I> Iterator for LineSegmenter<I>
where
    I: Iterator<Item = Result<Word>>,
{
    type Item = Result<Cue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Some(e) = self.rejected.take() {
            self.finished = true;
            return Some(Err(e));
        }

        loop {
            match self.words.next() {
                Some(Ok(word)) => match self.open.as_mut() {
                    None => self.open = Some(OpenCue::seed(word)),
                    Some(open) => {
                        if let Some(cue) = open.push(word, &self.config) {
                            return Some(Ok(cue));
                        }
                    }
                },
                Some(Err(e)) => {
                    self.finished = true;
                    self.open = None;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    return self.open.take().map(|open| Ok(open.close()));
                }
            }
        }
    }
}
