pub mod alignment;
pub mod band;
pub mod bound;
pub mod config;
pub mod matrix;
pub mod scoring;
pub mod traceback;

use tracing::{debug, debug_span, info, warn};

use crate::aligner::bound::{edge_bound_holds, BandEdgeBound};
use crate::aligner::matrix::BandMatrix;
use crate::aligner::scoring::ScoreTable;
use crate::aligner::traceback::reconstruct;
use crate::errors::BandAlignError;

pub use alignment::{AlignmentClass, BandedAlignment};
pub use config::AlignerConfig;

/// A validated pair of sequences, ordered such that the first is never the longer one.
struct SequencePair<'a> {
    shorter: &'a [u8],
    longer: &'a [u8],
    shorter_encoded: Vec<u8>,
    longer_encoded: Vec<u8>,
    swapped: bool,
}

/// States of the band widening loop
enum BandState {
    /// Fill the DP band of the given half-width
    Fill { band: usize },

    /// Decide whether the filled band is provably wide enough
    Evaluate { band: usize, matrix: BandMatrix },

    /// Accept the given matrix's alignment
    Done { matrix: BandMatrix, proven_optimal: bool },
}

/// Global aligner that restricts the DP to a diagonal band, and doubles the band until an
/// upper bound shows that no wider band can improve the score.
pub struct BandedAligner {
    table: ScoreTable,
    config: AlignerConfig,
}

impl BandedAligner {
    pub fn new(table: ScoreTable) -> Self {
        Self {
            table,
            config: AlignerConfig::default(),
        }
    }

    pub fn with_config(table: ScoreTable, config: AlignerConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Optimal global alignment of `first` and `second`.
    ///
    /// The first band is the smallest one that reaches the end cell, `len(longer) - len(shorter)`.
    /// After each fill, the alignment is accepted if the band spans the matrix, or if the upper
    /// bound on what a wider band could achieve does not beat the current score. Otherwise the
    /// band is doubled.
    pub fn align(&self, first: &[u8], second: &[u8]) -> Result<BandedAlignment, BandAlignError> {
        let pair = self.prepare(first, second)?;
        let l1 = pair.shorter.len();
        let l2 = pair.longer.len();

        let bound = BandEdgeBound::new(&pair.shorter_encoded, &self.table);
        let bound_holds = edge_bound_holds(&pair.shorter_encoded, &pair.longer_encoded, &self.table);
        let corner_holds = self.table
            .gap_pair_violation(&pair.shorter_encoded, &pair.longer_encoded)
            .is_none();
        debug!(bound_holds, corner_holds, "Checked stop rule preconditions");

        let mut iterations = 0;
        let mut state = BandState::Fill { band: l2 - l1 };

        let (matrix, proven_optimal) = loop {
            state = match state {
                BandState::Fill { band } => {
                    let _span = debug_span!("band_fill", band).entered();
                    iterations += 1;

                    let matrix = BandMatrix::fill(&pair.shorter_encoded, &pair.longer_encoded, band, &self.table);
                    BandState::Evaluate { band, matrix }
                },
                BandState::Evaluate { band, matrix } => {
                    let best_score = matrix.final_cell().score;
                    let next_bound = bound.upper_bound(band, l2);
                    debug!(band, best_score, next_bound, "Band filled");

                    // Only the corner cells (l2, 0) and (0, l2) lie outside
                    let spans_matrix = band + 1 > l2 - 1;
                    let bound_met = next_bound <= best_score;

                    if spans_matrix || bound_met {
                        let proven_optimal = band >= l2
                            || (spans_matrix && corner_holds)
                            || (bound_met && bound_holds);

                        if !proven_optimal {
                            warn!(band, next_bound, best_score, "Accepted alignment is not proven optimal for this score table");
                        }

                        BandState::Done { matrix, proven_optimal }
                    } else {
                        match self.config.max_band {
                            Some(max_band) if band >= max_band => {
                                warn!(band, next_bound, best_score, "Reached maximum band before proving optimality");
                                BandState::Done { matrix, proven_optimal: false }
                            },
                            max_band => {
                                let next_band = (band * 2).max(1);
                                BandState::Fill { band: max_band.map_or(next_band, |max_band| next_band.min(max_band)) }
                            },
                        }
                    }
                },
                BandState::Done { matrix, proven_optimal } => break (matrix, proven_optimal),
            };
        };

        let result = self.finish(&pair, &matrix, iterations, proven_optimal);
        info!(score = result.score, band = result.band, iterations, proven_optimal, "Alignment done");

        Ok(result)
    }

    /// Global alignment restricted to a fixed band of half-width `band`, without widening.
    ///
    /// The result is only marked as proven optimal if the band spans the whole DP matrix.
    pub fn align_with_band(&self, first: &[u8], second: &[u8], band: usize) -> Result<BandedAlignment, BandAlignError> {
        let pair = self.prepare(first, second)?;
        let required = pair.longer.len() - pair.shorter.len();
        if band < required {
            return Err(BandAlignError::BandTooNarrow { band, required });
        }

        let matrix = BandMatrix::fill(&pair.shorter_encoded, &pair.longer_encoded, band, &self.table);
        let spans_matrix = band >= pair.longer.len();

        Ok(self.finish(&pair, &matrix, 1, spans_matrix))
    }

    fn prepare<'a>(&self, first: &'a [u8], second: &'a [u8]) -> Result<SequencePair<'a>, BandAlignError> {
        if first.is_empty() {
            return Err(BandAlignError::EmptySequence { which: "first" });
        }

        if second.is_empty() {
            return Err(BandAlignError::EmptySequence { which: "second" });
        }

        let first_encoded = self.table.encode(first)?;
        let second_encoded = self.table.encode(second)?;

        Ok(if second.len() < first.len() {
            SequencePair {
                shorter: second,
                longer: first,
                shorter_encoded: second_encoded,
                longer_encoded: first_encoded,
                swapped: true,
            }
        } else {
            SequencePair {
                shorter: first,
                longer: second,
                shorter_encoded: first_encoded,
                longer_encoded: second_encoded,
                swapped: false,
            }
        })
    }

    fn finish(&self, pair: &SequencePair, matrix: &BandMatrix, iterations: usize, proven_optimal: bool) -> BandedAlignment {
        let traceback = reconstruct(matrix, pair.shorter, pair.longer);

        // Tracks only hold alphabet symbols and the gap symbol, which are all ASCII
        let shorter_track = String::from_utf8_lossy(&traceback.shorter_track).into_owned();
        let longer_track = String::from_utf8_lossy(&traceback.longer_track).into_owned();

        let (first, second) = if pair.swapped {
            (longer_track, shorter_track)
        } else {
            (shorter_track, longer_track)
        };

        BandedAlignment {
            score: matrix.final_cell().score,
            first,
            second,
            classes: traceback.classes,
            band: matrix.band(),
            iterations,
            swapped: pair.swapped,
            proven_optimal,
        }
    }
}

impl Default for BandedAligner {
    fn default() -> Self {
        Self::new(ScoreTable::blosum62())
    }
}
