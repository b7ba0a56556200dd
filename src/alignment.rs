use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SubcueError;

/// On-screen position of a cue, rendered as an ASS-style override tag
/// placed in front of the cue text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Alignment {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl Alignment {
    pub const ALL: [Alignment; 9] = [
        Alignment::TopLeft,
        Alignment::TopCenter,
        Alignment::TopRight,
        Alignment::MiddleLeft,
        Alignment::MiddleCenter,
        Alignment::MiddleRight,
        Alignment::BottomLeft,
        Alignment::BottomCenter,
        Alignment::BottomRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Alignment::TopLeft => "TopLeft",
            Alignment::TopCenter => "TopCenter",
            Alignment::TopRight => "TopRight",
            Alignment::MiddleLeft => "MiddleLeft",
            Alignment::MiddleCenter => "MiddleCenter",
            Alignment::MiddleRight => "MiddleRight",
            Alignment::BottomLeft => "BottomLeft",
            Alignment::BottomCenter => "BottomCenter",
            Alignment::BottomRight => "BottomRight",
        }
    }

    /// Literal prefix written before the cue text. Bottom center is the
    /// player default and needs no tag.
    pub fn prefix(self) -> &'static str {
        match self {
            Alignment::TopLeft => r"{\an7}",
            Alignment::TopCenter => r"{\an8}",
            Alignment::TopRight => r"{\an9}",
            Alignment::MiddleLeft => r"{\an4}",
            Alignment::MiddleCenter => r"{\an5}",
            Alignment::MiddleRight => r"{\an6}",
            Alignment::BottomLeft => r"{\an1}",
            Alignment::BottomCenter => "",
            Alignment::BottomRight => r"{\an3}",
        }
    }

    /// Comma-separated list of valid names, for help and error output
    pub fn names() -> String {
        Self::ALL.iter().map(|a| a.name()).collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Alignment {
    type Err = SubcueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SubcueError::UnknownAlignment(s.to_string(), Self::names()))
    }
}

impl TryFrom<String> for Alignment {
    type Error = SubcueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("topleft".parse::<Alignment>().unwrap(), Alignment::TopLeft);
        assert_eq!("MIDDLECENTER".parse::<Alignment>().unwrap(), Alignment::MiddleCenter);
        assert_eq!(" BottomRight ".parse::<Alignment>().unwrap(), Alignment::BottomRight);
    }

    #[test]
    fn test_unknown_alignment() {
        let err = "Centre".parse::<Alignment>().unwrap_err();
        assert!(matches!(err, SubcueError::UnknownAlignment(ref name, _) if name == "Centre"));
        assert_eq!(
            err.to_string(),
            "Unknown alignment 'Centre' (valid: TopLeft,TopCenter,TopRight,MiddleLeft,\
             MiddleCenter,MiddleRight,BottomLeft,BottomCenter,BottomRight)"
        );
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(Alignment::TopLeft.prefix(), "{\\an7}");
        assert_eq!(Alignment::MiddleRight.prefix(), "{\\an6}");
        assert_eq!(Alignment::BottomCenter.prefix(), "");
        assert_eq!(Alignment::default(), Alignment::BottomCenter);

        let empty: Vec<_> = Alignment::ALL.iter().filter(|a| a.prefix().is_empty()).collect();
        assert_eq!(empty, vec![&Alignment::BottomCenter]);
    }

    #[test]
    fn test_names_round_trip_through_display() {
        for alignment in Alignment::ALL {
            assert_eq!(alignment.to_string().parse::<Alignment>().unwrap(), alignment);
        }
        assert!(Alignment::names().starts_with("TopLeft,TopCenter"));
    }
}
