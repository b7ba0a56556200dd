// Segmentation pipeline
//
// Tokens -> words -> cues, each stage a pull-based iterator adapter:
// - words: joins character tokens on space markers, validating timestamps
// - lines: packs words into cues under width, duration and reading-speed limits
//
// Nothing is materialized between stages, so a whole transcript is
// processed in a single forward pass.

pub mod lines;
pub mod words;

pub use lines::LineSegmenter;
pub use words::WordSegmenter;

use crate::config::SegmenterConfig;
use crate::error::Result;
use crate::types::{Cue, Token, Word};

/// Chains the segmentation stages onto any iterator
pub trait SegmentExt: Iterator + Sized {
    /// Group a token stream into words
    fn words(self) -> WordSegmenter<Self>
    where
        Self: Iterator<Item = Token>,
    {
        WordSegmenter::new(self)
    }

    /// Group a word stream into cues. An invalid `config` is yielded as
    /// the first and only error.
    fn cues(self, config: SegmenterConfig) -> LineSegmenter<Self>
    where
        Self: Iterator<Item = Result<Word>>,
    {
        LineSegmenter::new(self, config)
    }
}

impl<I: Iterator> SegmentExt for I {}

/// Run both stages over a token stream and collect the cues.
pub fn segment_tokens<T>(tokens: T, config: SegmenterConfig) -> Result<Vec<Cue>>
where
    T: IntoIterator<Item = Token>,
{
    tokens.into_iter().words().cues(config).collect()
}
