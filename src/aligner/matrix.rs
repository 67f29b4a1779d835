use crate::aligner::band::BandIndex;
use crate::aligner::scoring::{Score, ScoreTable};

/// Which neighbouring cell a DP cell took its best score from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Predecessor {
    /// Never written by the fill
    #[default]
    Unreached,

    /// The DP origin `(0, 0)`
    Origin,

    /// `(x - 1, y - 1)`: both sequences advance
    Diagonal,

    /// `(x, y - 1)`: the shorter sequence advances, the longer one gets a gap
    Left,

    /// `(x - 1, y)`: the longer sequence advances, the shorter one gets a gap
    Up,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub score: Score,
    pub pred: Predecessor,

    /// Number of gap characters inserted in the longer sequence's track on the path to this cell
    pub indels_in_longer: usize,
}

impl Cell {
    /// Full-matrix coordinate of this cell's predecessor, given the cell's own coordinate.
    /// Returns `None` at the origin.
    #[inline]
    pub fn predecessor(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        match self.pred {
            Predecessor::Diagonal => Some((x - 1, y - 1)),
            Predecessor::Left => Some((x, y - 1)),
            Predecessor::Up => Some((x - 1, y)),
            Predecessor::Origin => None,
            Predecessor::Unreached => panic!("Cell ({x}, {y}) was never reached by the DP fill!"),
        }
    }
}

/// DP cells of a single band, stored compactly as addressed by [`BandIndex`].
///
/// Rows follow the longer sequence, columns the shorter one.
pub struct BandMatrix {
    index: BandIndex,
    len_shorter: usize,
    len_longer: usize,
    cells: Vec<Cell>,
}

impl BandMatrix {
    /// Fill the band of half-width `band` for the alphabet-encoded sequences `shorter` and `longer`.
    ///
    /// Ties between the three predecessors resolve as diagonal, then left, then up: a later
    /// candidate only replaces the current best if it is strictly better.
    ///
    /// Panics if `shorter` is longer than `longer`, or if the band is too narrow to reach the
    /// far corner.
    pub fn fill(shorter: &[u8], longer: &[u8], band: usize, table: &ScoreTable) -> Self {
        let l1 = shorter.len();
        let l2 = longer.len();
        assert!(l1 <= l2, "First sequence must be the shorter one!");
        assert!(band >= l2 - l1, "Band {band} can't reach the end cell ({l2}, {l1})!");

        let index = BandIndex::new(band);
        let indel = table.indel_ix();

        let mut matrix = Self {
            index,
            len_shorter: l1,
            len_longer: l2,
            cells: vec![Cell::default(); index.storage_len(l2)],
        };

        *matrix.cell_mut(0, 0) = Cell {
            score: 0,
            pred: Predecessor::Origin,
            indels_in_longer: 0,
        };

        // First column, only the longer sequence advances
        for x in (1..=l2).take_while(|&x| index.contains(x, 0)) {
            let prev = *matrix.cell(x - 1, 0);
            *matrix.cell_mut(x, 0) = Cell {
                score: prev.score + table.score_ix(indel, longer[x - 1]),
                pred: Predecessor::Up,
                indels_in_longer: prev.indels_in_longer,
            };
        }

        // First row, only the shorter sequence advances
        for y in (1..=l1).take_while(|&y| index.contains(0, y)) {
            let prev = *matrix.cell(0, y - 1);
            *matrix.cell_mut(0, y) = Cell {
                score: prev.score + table.score_ix(shorter[y - 1], indel),
                pred: Predecessor::Left,
                indels_in_longer: prev.indels_in_longer + 1,
            };
        }

        for x in 1..=l2 {
            let y_start = x.saturating_sub(band).max(1);
            let y_end = (x + band).min(l1);

            for y in y_start..=y_end {
                // The diagonal predecessor shares the diagonal offset, so it is always in the band
                let diag = *matrix.cell(x - 1, y - 1);
                let mut best = Cell {
                    score: diag.score + table.score_ix(shorter[y - 1], longer[x - 1]),
                    pred: Predecessor::Diagonal,
                    indels_in_longer: diag.indels_in_longer,
                };

                if let Some(left) = matrix.get(x, y - 1) {
                    let score = left.score + table.score_ix(shorter[y - 1], indel);
                    if score > best.score {
                        best = Cell {
                            score,
                            pred: Predecessor::Left,
                            indels_in_longer: left.indels_in_longer + 1,
                        };
                    }
                }

                if let Some(up) = matrix.get(x - 1, y) {
                    let score = up.score + table.score_ix(indel, longer[x - 1]);
                    if score > best.score {
                        best = Cell {
                            score,
                            pred: Predecessor::Up,
                            indels_in_longer: up.indels_in_longer,
                        };
                    }
                }

                *matrix.cell_mut(x, y) = best;
            }
        }

        matrix
    }

    #[inline]
    pub fn band(&self) -> usize {
        self.index.band()
    }

    #[inline]
    pub fn index(&self) -> BandIndex {
        self.index
    }

    #[inline]
    pub fn len_shorter(&self) -> usize {
        self.len_shorter
    }

    #[inline]
    pub fn len_longer(&self) -> usize {
        self.len_longer
    }

    /// Cell at full-matrix coordinate `(x, y)`, or `None` if outside the matrix or the band.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x > self.len_longer || y > self.len_shorter {
            return None;
        }

        self.index.offset(x, y).map(|offset| &self.cells[offset])
    }

    /// The cell at `(len(longer), len(shorter))`, holding the best score within this band.
    pub fn final_cell(&self) -> &Cell {
        self.cell(self.len_longer, self.len_shorter)
    }

    #[inline]
    fn cell(&self, x: usize, y: usize) -> &Cell {
        self.get(x, y)
            .unwrap_or_else(|| panic!("Cell ({x}, {y}) is outside band {}!", self.index.band()))
    }

    #[inline]
    fn cell_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        match self.index.offset(x, y) {
            Some(offset) => &mut self.cells[offset],
            None => panic!("Cell ({x}, {y}) is outside band {}!", self.index.band()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::{BandMatrix, Predecessor};
    use crate::aligner::scoring::ScoreTable;

    fn linear_table() -> ScoreTable {
        ScoreTable::linear(b"ACGT", b'-', 5, -1, -2).unwrap()
    }

    #[test]
    fn test_fill_small() {
        let table = linear_table();
        let s1 = table.encode(b"AC").unwrap();
        let s2 = table.encode(b"AGC").unwrap();

        let matrix = BandMatrix::fill(&s1, &s2, 1, &table);

        let end = matrix.final_cell();
        assert_eq!(end.score, 8);
        assert_eq!(end.pred, Predecessor::Diagonal);
        assert_eq!(end.indels_in_longer, 0);

        assert_eq!(matrix.get(1, 0).unwrap().score, -2);
        assert_eq!(matrix.get(0, 1).unwrap().indels_in_longer, 1);
        assert_eq!(matrix.get(2, 1).unwrap().pred, Predecessor::Up);
        assert_eq!(matrix.get(1, 2).unwrap().pred, Predecessor::Left);
        assert_eq!(matrix.get(1, 2).unwrap().indels_in_longer, 1);

        // Outside band
        assert!(matrix.get(3, 1).is_none());
        assert!(matrix.get(2, 0).is_none());
        // Outside matrix
        assert!(matrix.get(1, 3).is_none());
    }

    #[test]
    fn test_fill_zero_band_is_diagonal() {
        let table = ScoreTable::blosum62();
        let seq = table.encode(b"AAAA").unwrap();

        let matrix = BandMatrix::fill(&seq, &seq, 0, &table);
        assert_eq!(matrix.final_cell().score, 16);

        for i in 1..=4 {
            assert_eq!(matrix.get(i, i).unwrap().pred, Predecessor::Diagonal);
            assert_eq!(matrix.get(i, i).unwrap().predecessor(i, i), Some((i - 1, i - 1)));
        }
        assert_eq!(matrix.get(0, 0).unwrap().predecessor(0, 0), None);
    }

    #[test]
    fn test_ties_prefer_diagonal_then_left() {
        // Match and indel pairs tie: aligning A-vs-A costs the same as two gaps
        let table = ScoreTable::linear(b"AC", b'-', -2, -2, -1).unwrap();
        let s1 = table.encode(b"A").unwrap();
        let s2 = table.encode(b"C").unwrap();

        let matrix = BandMatrix::fill(&s1, &s2, 1, &table);
        let end = matrix.final_cell();

        // diagonal: -2, left: (1, 0) -1 + -1 = -2, up: (0, 1) -1 + -1 = -2
        assert_eq!(end.score, -2);
        assert_eq!(end.pred, Predecessor::Diagonal);

        let table = ScoreTable::linear(b"AC", b'-', -3, -3, -1).unwrap();
        let matrix = BandMatrix::fill(&s1, &s2, 1, &table);
        let end = matrix.final_cell();

        // left and up tie at -2, both beat the diagonal
        assert_eq!(end.score, -2);
        assert_eq!(end.pred, Predecessor::Left);
        assert_eq!(end.indels_in_longer, 1);
    }

    #[test]
    fn test_wider_band_never_worse() {
        let table = ScoreTable::blosum62();
        let s1 = table.encode(b"HEAGAWGHEE").unwrap();
        let s2 = table.encode(b"PAWHEAEWHEAGA").unwrap();

        let mut prev = None;
        for band in 3..=13 {
            let score = BandMatrix::fill(&s1, &s2, band, &table).final_cell().score;
            if let Some(prev) = prev {
                assert!(score >= prev, "band {band} scored {score} < {prev}");
            }
            prev = Some(score);
        }
    }

    #[test]
    #[should_panic]
    fn test_band_too_narrow() {
        let table = ScoreTable::blosum62();
        let s1 = table.encode(b"A").unwrap();
        let s2 = table.encode(b"AAA").unwrap();

        BandMatrix::fill(&s1, &s2, 1, &table);
    }
}
