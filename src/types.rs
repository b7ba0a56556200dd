use serde::{Deserialize, Serialize};

/// Text of the token that separates words in a recognized stream.
pub const SPACE: &str = " ";

/// Smallest unit produced by the recognizer: one character (or the space
/// marker) and the time it starts, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub start_time: f64,
}

impl Token {
    pub fn new<S: Into<String>>(text: S, start_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
        }
    }

    pub fn is_space(&self) -> bool {
        self.text == SPACE
    }
}

/// A run of non-space tokens.
///
/// `end_time` is the start of the terminating space token, or the start of
/// the stream's last token when the stream does not end on a space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

impl Word {
    pub fn new<S: Into<String>>(start_time: f64, end_time: f64, text: S) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
        }
    }
}

/// One subtitle display block. `text` holds at most one `\n` line break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

impl Cue {
    pub fn new<S: Into<String>>(start_time: f64, end_time: f64, text: S) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
        }
    }
}
