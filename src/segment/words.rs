use crate::error::{Result, SubcueError};
use crate::types::{Token, Word};

/// Groups contiguous non-space tokens into words.
///
/// Tokens are checked as they are pulled: a negative start time, or one
/// earlier than the previous token's, ends the stream with
/// [`SubcueError::MalformedToken`].
pub struct WordSegmenter<I> {
    tokens: I,
    index: usize,
    last_start: Option<f64>,
    pending: Option<(f64, String)>,
    finished: bool,
}

impl<I> WordSegmenter<I>
where
    I: Iterator<Item = Token>,
{
    pub fn new<T>(tokens: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            tokens: tokens.into_iter(),
            index: 0,
            last_start: None,
            pending: None,
            finished: false,
        }
    }

    fn check(&mut self, token: &Token) -> Result<()> {
        let previous = self.last_start.unwrap_or(0.0);
        if token.start_time.is_nan() || token.start_time < previous {
            return Err(SubcueError::MalformedToken {
                index: self.index,
                time: token.start_time,
                previous,
            });
        }
        self.last_start = Some(token.start_time);
        self.index += 1;
        Ok(())
    }
}

impl<I> Iterator for WordSegmenter<I>
where
    I: Iterator<Item = Token>,
{
    type Item = Result<Word>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some(token) = self.tokens.next() {
            if let Err(e) = self.check(&token) {
                self.finished = true;
                self.pending = None;
                return Some(Err(e));
            }

            match self.pending.take() {
                // Leading and repeated spaces never open a word
                None if token.is_space() => {}
                None => self.pending = Some((token.start_time, token.text)),
                Some((start, text)) if token.is_space() => {
                    return Some(Ok(Word::new(start, token.start_time, text)));
                }
                Some((start, mut text)) => {
                    text.push_str(&token.text);
                    self.pending = Some((start, text));
                }
            }
        }

        self.finished = true;
        let (start, text) = self.pending.take()?;
        // Unterminated final word: best available end is the last token's start
        let end = self.last_start.unwrap_or(start);
        Some(Ok(Word::new(start, end, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(spec: &[(&str, f64)]) -> Vec<Token> {
        spec.iter().map(|(text, t)| Token::new(*text, *t)).collect()
    }

    fn words(spec: &[(&str, f64)]) -> Vec<Word> {
        WordSegmenter::new(tokens(spec))
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_terminated_words() {
        let result = words(&[
            ("H", 0.0),
            ("i", 0.1),
            (" ", 0.2),
            ("t", 0.3),
            ("h", 0.4),
            ("e", 0.5),
            ("r", 0.6),
            ("e", 0.7),
            (" ", 0.8),
        ]);
        assert_eq!(
            result,
            vec![Word::new(0.0, 0.2, "Hi"), Word::new(0.3, 0.8, "there")]
        );
    }

    #[test]
    fn test_unterminated_final_word_ends_at_last_token() {
        let result = words(&[("o", 1.0), ("k", 1.2), (" ", 1.4), ("g", 1.5), ("o", 1.9)]);
        assert_eq!(result, vec![Word::new(1.0, 1.4, "ok"), Word::new(1.5, 1.9, "go")]);
    }

    #[test]
    fn test_single_token() {
        assert_eq!(words(&[("a", 2.5)]), vec![Word::new(2.5, 2.5, "a")]);
    }

    #[test]
    fn test_empty_stream() {
        assert!(words(&[]).is_empty());
        assert!(words(&[(" ", 0.0), (" ", 0.1)]).is_empty());
    }

    #[test]
    fn test_repeated_spaces_do_not_make_empty_words() {
        let result = words(&[
            (" ", 0.0),
            ("a", 0.1),
            (" ", 0.2),
            (" ", 0.3),
            (" ", 0.4),
            ("b", 0.5),
            (" ", 0.6),
        ]);
        assert_eq!(result, vec![Word::new(0.1, 0.2, "a"), Word::new(0.5, 0.6, "b")]);
    }

    #[test]
    fn test_equal_start_times_are_accepted() {
        let result = words(&[("a", 0.5), ("b", 0.5), (" ", 0.5)]);
        assert_eq!(result, vec![Word::new(0.5, 0.5, "ab")]);
    }

    #[test]
    fn test_decreasing_time_stops_the_stream() {
        let mut segmenter =
            WordSegmenter::new(tokens(&[("a", 0.0), (" ", 0.2), ("b", 0.1), (" ", 0.3)]));

        assert_eq!(segmenter.next().unwrap().unwrap(), Word::new(0.0, 0.2, "a"));
        match segmenter.next() {
            Some(Err(SubcueError::MalformedToken { index, time, previous })) => {
                assert_eq!(index, 2);
                assert_eq!(time, 0.1);
                assert_eq!(previous, 0.2);
            }
            other => panic!("expected malformed token error, got {:?}", other),
        }
        assert!(segmenter.next().is_none());
    }

    #[test]
    fn test_negative_time_rejected() {
        let result: Result<Vec<_>> = WordSegmenter::new(tokens(&[("a", -0.5)])).collect();
        assert!(matches!(result, Err(SubcueError::MalformedToken { index: 0, .. })));
    }

    #[test]
    fn test_nan_time_rejected() {
        let result: Result<Vec<_>> =
            WordSegmenter::new(tokens(&[("a", 0.0), ("b", f64::NAN)])).collect();
        assert!(matches!(result, Err(SubcueError::MalformedToken { index: 1, .. })));

        let result: Result<Vec<_>> = WordSegmenter::new(tokens(&[("a", f64::NAN)])).collect();
        assert!(matches!(result, Err(SubcueError::MalformedToken { index: 0, .. })));
    }
}
