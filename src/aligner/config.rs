use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::aligner::scoring::{ScoreTable, ScoreTableSpec};
use crate::errors::BandAlignError;

/// Settings of the band widening driver
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    /// Stop widening once the band reaches this half-width, even if the result is not yet
    /// proven optimal
    pub max_band: Option<usize>,
}

impl AlignerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_band(mut self, max_band: usize) -> Self {
        self.max_band = Some(max_band);
        self
    }
}

/// Where substitution scores come from
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ScoringScheme {
    /// NCBI BLOSUM62 with `*` as indel
    #[default]
    Blosum62,

    /// Uniform match, mismatch and indel scores over an alphabet
    Linear {
        alphabet: String,
        indel_symbol: char,
        match_score: i32,
        mismatch: i32,
        indel: i32,
    },

    /// A full substitution matrix
    Table(ScoreTableSpec),
}

impl ScoringScheme {
    pub fn build(&self) -> Result<ScoreTable, BandAlignError> {
        match self {
            Self::Blosum62 => Ok(ScoreTable::blosum62()),
            Self::Linear { alphabet, indel_symbol, match_score, mismatch, indel } => {
                if !indel_symbol.is_ascii() {
                    return Err(BandAlignError::InvalidScoreTable("indel symbol must be ASCII".to_string()));
                }

                ScoreTable::linear(alphabet.as_bytes(), *indel_symbol as u8, *match_score, *mismatch, *indel)
            },
            Self::Table(spec) => ScoreTable::from_spec(spec),
        }
    }
}

/// Complete configuration, as read from a JSON file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandAlignConfig {
    pub scoring: ScoringScheme,
    pub aligner: AlignerConfig,
}

impl BandAlignConfig {
    pub fn from_json_reader(reader: impl Read) -> Result<Self, BandAlignError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
