use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

use crate::aligner::scoring::Score;
use crate::aligner::traceback::GAP_SYMBOL;

/// Classification of a single alignment column
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AlignmentClass {
    /// Exactly one of the tracks holds a gap
    Indel,

    /// Both tracks hold the same character
    Equal,

    /// Both tracks hold a character, but they differ
    Unequal,
}

impl AlignmentClass {
    pub fn as_char(&self) -> char {
        match self {
            Self::Indel => 'I',
            Self::Equal => 'E',
            Self::Unequal => 'U',
        }
    }
}

fn serialize_classes<S>(classes: &[AlignmentClass], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let as_str: String = classes.iter().map(AlignmentClass::as_char).collect();
    serializer.serialize_str(&as_str)
}

/// Result of a banded global alignment, with tracks in the order the sequences were given.
#[derive(Clone, Debug, Serialize)]
pub struct BandedAlignment {
    pub score: Score,

    /// Aligned track of the first input sequence
    pub first: String,

    /// Aligned track of the second input sequence
    pub second: String,

    #[serde(rename = "classification", serialize_with = "serialize_classes")]
    pub classes: Vec<AlignmentClass>,

    /// Half-width of the band the accepted alignment was computed in
    pub band: usize,

    /// Number of DP fills performed
    pub iterations: usize,

    /// Whether the sequences were swapped internally because the first was the longer one
    pub swapped: bool,

    /// Whether the score is guaranteed to be the unbanded optimum. Holds when the final band
    /// spans the matrix, or when the stop rule fired and the score table satisfies the rule's
    /// preconditions for the symbols in the input.
    pub proven_optimal: bool,
}

impl BandedAlignment {
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classification_string(&self) -> String {
        self.classes.iter().map(AlignmentClass::as_char).collect()
    }

    pub fn count(&self, class: AlignmentClass) -> usize {
        self.classes.iter().filter(|c| **c == class).count()
    }

    /// Fraction of alignment columns with identical characters
    pub fn identity(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }

        self.count(AlignmentClass::Equal) as f64 / self.len() as f64
    }

    /// Three-line view with a match ruler between the two tracks
    pub fn print_alignment(&self) -> String {
        let ruler: String = self.classes.iter()
            .map(|class| match class {
                AlignmentClass::Equal => '|',
                AlignmentClass::Unequal => '*',
                AlignmentClass::Indel => ' ',
            })
            .collect();

        format!("{}\n{}\n{}", self.first, ruler, self.second)
    }

    /// Check that every column's class agrees with the characters in the tracks.
    pub fn is_consistent(&self) -> bool {
        let first = self.first.as_bytes();
        let second = self.second.as_bytes();
        if first.len() != self.len() || second.len() != self.len() {
            return false;
        }

        itertools::izip!(first, second, &self.classes)
            .all(|(&a, &b, class)| {
                let expected = match (a == GAP_SYMBOL, b == GAP_SYMBOL) {
                    (true, true) => return false,
                    (true, false) | (false, true) => AlignmentClass::Indel,
                    (false, false) if a == b => AlignmentClass::Equal,
                    (false, false) => AlignmentClass::Unequal,
                };

                expected == *class
            })
    }
}

impl Display for BandedAlignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Global alignment score: {}", self.score)?;
        writeln!(f, "First string:\n{}", self.first)?;
        writeln!(f, "Second string:\n{}", self.second)?;
        write!(f, "Alignment string (I = Indel, E = Equal, U = Unequal):\n{}", self.classification_string())
    }
}
