pub mod blosum62;

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aligner::traceback::GAP_SYMBOL;
use crate::errors::BandAlignError;
pub use blosum62::{BLOSUM62, BLOSUM62_ALPHABET, BLOSUM62_INDEL};

/// Cumulative alignment score
pub type Score = i64;

const NOT_IN_ALPHABET: u8 = u8::MAX;

/// Serializable description of a score table, e.g. loaded from a JSON file.
///
/// `scores[i][j]` is the score of aligning `alphabet[i]` with `alphabet[j]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTableSpec {
    pub alphabet: String,
    pub indel: char,
    pub scores: Vec<Vec<i32>>,
}

/// Symmetric substitution scores over a fixed, ordered alphabet that includes an indel symbol.
///
/// Sequences are translated to alphabet indices once through [`ScoreTable::encode`], after
/// which all lookups are plain array accesses.
#[derive(Clone, Debug)]
pub struct ScoreTable {
    alphabet: Vec<u8>,
    indel: u8,
    indel_ix: u8,
    lookup: [u8; 256],
    scores: Vec<i32>,
}

impl ScoreTable {
    pub fn new<R>(alphabet: &[u8], indel: u8, rows: &[R]) -> Result<Self, BandAlignError>
    where
        R: AsRef<[i32]>,
    {
        let n = alphabet.len();
        if n == 0 || n >= NOT_IN_ALPHABET as usize {
            return Err(BandAlignError::InvalidScoreTable(
                format!("alphabet must contain between 1 and {} symbols, got {n}", NOT_IN_ALPHABET - 1)));
        }

        if !alphabet.is_ascii() || alphabet.contains(&GAP_SYMBOL) {
            return Err(BandAlignError::InvalidScoreTable(format!(
                "alphabet must be ASCII and can't contain the gap symbol '{}'", GAP_SYMBOL as char)));
        }

        let mut lookup = [NOT_IN_ALPHABET; 256];
        for (ix, &symbol) in alphabet.iter().enumerate() {
            if lookup[symbol as usize] != NOT_IN_ALPHABET {
                return Err(BandAlignError::InvalidScoreTable(
                    format!("symbol '{}' occurs more than once in the alphabet", symbol.escape_ascii())));
            }

            lookup[symbol as usize] = ix as u8;
        }

        let indel_ix = lookup[indel as usize];
        if indel_ix == NOT_IN_ALPHABET {
            return Err(BandAlignError::InvalidScoreTable(
                format!("indel symbol '{}' is not part of the alphabet", indel.escape_ascii())));
        }

        if n < 2 {
            return Err(BandAlignError::InvalidScoreTable(
                "alphabet must contain at least one symbol besides the indel".to_string()));
        }

        if rows.len() != n || rows.iter().any(|row| row.as_ref().len() != n) {
            return Err(BandAlignError::InvalidScoreTable(
                format!("score matrix must be {n}x{n} to match the alphabet")));
        }

        let scores: Vec<i32> = rows.iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();

        for i in 0..n {
            for j in (i + 1)..n {
                if scores[i * n + j] != scores[j * n + i] {
                    return Err(BandAlignError::InvalidScoreTable(format!(
                        "score matrix is not symmetric: score({}, {}) = {} but score({}, {}) = {}",
                        alphabet[i].escape_ascii(), alphabet[j].escape_ascii(), scores[i * n + j],
                        alphabet[j].escape_ascii(), alphabet[i].escape_ascii(), scores[j * n + i])));
                }
            }
        }

        let table = Self {
            alphabet: alphabet.to_vec(),
            indel,
            indel_ix,
            lookup,
            scores,
        };

        table.check_gap_pair_dominated();

        Ok(table)
    }

    /// The NCBI BLOSUM62 table with `*` as indel symbol.
    pub fn blosum62() -> Self {
        let mut lookup = [NOT_IN_ALPHABET; 256];
        for (ix, &symbol) in BLOSUM62_ALPHABET.iter().enumerate() {
            lookup[symbol as usize] = ix as u8;
        }

        Self {
            alphabet: BLOSUM62_ALPHABET.to_vec(),
            indel: BLOSUM62_INDEL,
            indel_ix: lookup[BLOSUM62_INDEL as usize],
            lookup,
            scores: BLOSUM62.iter().flatten().copied().collect(),
        }
    }

    /// Uniform scores: `match_score` on identity, `mismatch` otherwise, and `indel` for any
    /// symbol against the indel symbol. The indel symbol is appended to the alphabet if missing.
    pub fn linear(
        alphabet: &[u8],
        indel_symbol: u8,
        match_score: i32,
        mismatch: i32,
        indel: i32,
    ) -> Result<Self, BandAlignError> {
        let mut symbols = alphabet.to_vec();
        if !symbols.contains(&indel_symbol) {
            symbols.push(indel_symbol);
        }

        let rows: Vec<Vec<i32>> = symbols.iter()
            .map(|&a| symbols.iter()
                .map(|&b| match (a == indel_symbol, b == indel_symbol) {
                    (true, true) => match_score,
                    (true, false) | (false, true) => indel,
                    (false, false) if a == b => match_score,
                    (false, false) => mismatch,
                })
                .collect())
            .collect();

        Self::new(&symbols, indel_symbol, &rows)
    }

    pub fn from_spec(spec: &ScoreTableSpec) -> Result<Self, BandAlignError> {
        if !spec.indel.is_ascii() {
            return Err(BandAlignError::InvalidScoreTable("indel symbol must be ASCII".to_string()));
        }

        Self::new(spec.alphabet.as_bytes(), spec.indel as u8, &spec.scores)
    }

    pub fn from_json_reader(reader: impl Read) -> Result<Self, BandAlignError> {
        let spec: ScoreTableSpec = serde_json::from_reader(reader)?;

        Self::from_spec(&spec)
    }

    pub fn to_spec(&self) -> ScoreTableSpec {
        let n = self.alphabet.len();

        ScoreTableSpec {
            alphabet: String::from_utf8_lossy(&self.alphabet).into_owned(),
            indel: self.indel as char,
            scores: self.scores.chunks(n).map(|row| row.to_vec()).collect(),
        }
    }

    #[inline]
    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    #[inline]
    pub fn indel_symbol(&self) -> u8 {
        self.indel
    }

    #[inline]
    pub fn indel_ix(&self) -> u8 {
        self.indel_ix
    }

    #[inline]
    pub fn index_of(&self, symbol: u8) -> Option<u8> {
        match self.lookup[symbol as usize] {
            NOT_IN_ALPHABET => None,
            ix => Some(ix),
        }
    }

    /// Score of aligning symbol `a` against symbol `b`.
    pub fn score(&self, a: u8, b: u8) -> Result<Score, BandAlignError> {
        let ix_a = self.index_of(a)
            .ok_or(BandAlignError::UnknownSymbol(a))?;
        let ix_b = self.index_of(b)
            .ok_or(BandAlignError::UnknownSymbol(b))?;

        Ok(self.score_ix(ix_a, ix_b))
    }

    #[inline(always)]
    pub fn score_ix(&self, a: u8, b: u8) -> Score {
        self.scores[a as usize * self.alphabet.len() + b as usize] as Score
    }

    /// Translate a sequence to alphabet indices, failing on the first unsupported symbol.
    pub fn encode(&self, seq: &[u8]) -> Result<Vec<u8>, BandAlignError> {
        seq.iter()
            .enumerate()
            .map(|(position, &symbol)| self.index_of(symbol)
                .ok_or(BandAlignError::UnsupportedSymbol { symbol, position }))
            .collect()
    }

    /// Score of an indel against the first regular letter of the alphabet.
    pub fn indel_vs_letter(&self) -> Score {
        let letter = self.first_letter_ix();

        self.score_ix(self.indel_ix, letter)
    }

    /// Best score any alignment of `encoded` can reach: the sum of its self-alignment scores.
    pub fn self_score(&self, encoded: &[u8]) -> Score {
        encoded.iter()
            .map(|&c| self.score_ix(c, c))
            .sum()
    }

    fn first_letter_ix(&self) -> u8 {
        // Construction guarantees at least one symbol besides the indel.
        if self.indel_ix == 0 { 1 } else { 0 }
    }

    /// Alphabet indices that occur in `encoded`, each listed once, in alphabet order.
    pub fn symbols_in(&self, encoded: &[u8]) -> Vec<u8> {
        let mut present = vec![false; self.alphabet.len()];
        for &c in encoded {
            present[c as usize] = true;
        }

        (0..self.alphabet.len() as u8)
            .filter(|&ix| present[ix as usize])
            .collect()
    }

    /// First pair `(a, b)`, `a` from `first` and `b` from `second` (both encoded), where an indel
    /// against `a` followed by an indel against `b` scores higher than substituting `a` with `b`.
    ///
    /// Accepting a band once it spans all but the corner cells of the DP matrix relies on no such
    /// pair existing.
    pub fn gap_pair_violation(&self, first: &[u8], second: &[u8]) -> Option<(u8, u8)> {
        let second_symbols = self.symbols_in(second);

        self.symbols_in(first).into_iter()
            .flat_map(|a| second_symbols.iter().map(move |&b| (a, b)))
            .find(|&(a, b)| {
                self.score_ix(a, self.indel_ix) + self.score_ix(self.indel_ix, b) > self.score_ix(a, b)
            })
    }

    fn check_gap_pair_dominated(&self) {
        let letters: Vec<u8> = (0..self.alphabet.len() as u8)
            .filter(|&ix| ix != self.indel_ix)
            .collect();

        if let Some((a, b)) = self.gap_pair_violation(&letters, &letters) {
            warn!(
                first = %(self.alphabet[a as usize] as char),
                second = %(self.alphabet[b as usize] as char),
                gap_pair = self.score_ix(a, self.indel_ix) + self.score_ix(self.indel_ix, b),
                substitution = self.score_ix(a, b),
                "Two indels score higher than a substitution, alignments accepted by the band stop rule are not proven optimal"
            );
        }
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::blosum62()
    }
}
