//! Quantization tags and their quality ranking.
//!
//! GGUF repositories publish one file per quantization variant, named by
//! convention (`model.Q4_K_M.gguf`). The tag determines the precision/size
//! trade-off, and the selector ranks candidates by a fixed quality score.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quantization tag of a GGUF model file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuantTag {
    /// 8-bit, highest quality of the common set.
    Q8_0,
    /// 6-bit K-quant.
    Q6K,
    /// 5-bit K-quant, medium.
    Q5KM,
    /// 5-bit K-quant, small.
    Q5KS,
    /// 4-bit K-quant, medium.
    Q4KM,
    /// 4-bit K-quant, small.
    Q4KS,
    /// 3-bit K-quant, medium.
    Q3KM,
    /// 3-bit K-quant, small.
    Q3KS,
    /// Anything we don't recognize. Scores zero and sorts last.
    #[default]
    Unknown,
}

/// Pattern table for tag extraction, ordered by specificity.
const QUANT_PATTERNS: &[(&str, QuantTag)] = &[
    ("Q8_0", QuantTag::Q8_0),
    ("Q6_K", QuantTag::Q6K),
    ("Q5_K_M", QuantTag::Q5KM),
    ("Q5_K_S", QuantTag::Q5KS),
    ("Q4_K_M", QuantTag::Q4KM),
    ("Q4_K_S", QuantTag::Q4KS),
    ("Q3_K_M", QuantTag::Q3KM),
    ("Q3_K_S", QuantTag::Q3KS),
];

impl QuantTag {
    /// Extract a quantization tag from a filename.
    #[must_use]
    pub fn from_filename(filename: &str) -> Self {
        let upper = filename.to_uppercase();
        QUANT_PATTERNS
            .iter()
            .find(|(pattern, _)| upper.contains(pattern))
            .map_or(Self::Unknown, |(_, tag)| *tag)
    }

    /// Returns true if this tag is unrecognized.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Fixed quality score used to rank variants. Higher is better.
    #[must_use]
    pub const fn quality_score(&self) -> u32 {
        match self {
            Self::Q8_0 => 100,
            Self::Q6K => 85,
            Self::Q5KM => 75,
            Self::Q5KS => 70,
            Self::Q4KM => 65,
            Self::Q4KS => 60,
            Self::Q3KM => 50,
            Self::Q3KS => 45,
            Self::Unknown => 0,
        }
    }

    /// Canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Q8_0 => "Q8_0",
            Self::Q6K => "Q6_K",
            Self::Q5KM => "Q5_K_M",
            Self::Q5KS => "Q5_K_S",
            Self::Q4KM => "Q4_K_M",
            Self::Q4KS => "Q4_K_S",
            Self::Q3KM => "Q3_K_M",
            Self::Q3KS => "Q3_K_S",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for QuantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuantTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        QUANT_PATTERNS
            .iter()
            .find(|(pattern, _)| *pattern == upper)
            .map(|(_, tag)| *tag)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_filename() {
        assert_eq!(
            QuantTag::from_filename("llama-2-7b.Q4_K_M.gguf"),
            QuantTag::Q4KM
        );
        assert_eq!(
            QuantTag::from_filename("model-q8_0.gguf"),
            QuantTag::Q8_0,
            "tag matching is case-insensitive"
        );
        assert_eq!(QuantTag::from_filename("model.gguf"), QuantTag::Unknown);
    }

    #[test]
    fn test_score_ordering() {
        // Q8_0 is the top of the ladder; each step down scores strictly lower.
        let ladder = [
            QuantTag::Q8_0,
            QuantTag::Q6K,
            QuantTag::Q5KM,
            QuantTag::Q5KS,
            QuantTag::Q4KM,
            QuantTag::Q4KS,
            QuantTag::Q3KM,
            QuantTag::Q3KS,
            QuantTag::Unknown,
        ];
        for pair in ladder.windows(2) {
            assert!(pair[0].quality_score() > pair[1].quality_score());
        }
        assert_eq!(QuantTag::Unknown.quality_score(), 0);
    }

    #[test]
    fn test_round_trip() {
        let tag: QuantTag = "q5_k_m".parse().unwrap();
        assert_eq!(tag, QuantTag::Q5KM);
        assert_eq!(tag.as_str(), "Q5_K_M");
        assert!("Q99_Z".parse::<QuantTag>().is_err());
    }
}
