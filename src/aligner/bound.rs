use crate::aligner::scoring::{Score, ScoreTable};

/// Upper bound on the score of any alignment that leaves a band, i.e., one that a wider band
/// could find but the current band could not.
///
/// The bound charges the minimum number of indels needed to reach the band's edge at the
/// indel-vs-letter score, and credits the shorter sequence's self-alignment score, which no
/// alignment of it can exceed. It ignores the content of the longer sequence, which keeps it
/// cheap to evaluate but loose.
pub struct BandEdgeBound {
    len_shorter: usize,
    indel_score: Score,
    self_score: Score,
}

impl BandEdgeBound {
    /// `shorter` is the alphabet-encoded shorter sequence
    pub fn new(shorter: &[u8], table: &ScoreTable) -> Self {
        Self {
            len_shorter: shorter.len(),
            indel_score: table.indel_vs_letter(),
            self_score: table.self_score(shorter),
        }
    }

    pub fn upper_bound(&self, band: usize, len_longer: usize) -> Score {
        let num_indels = min_edge_indels(band, self.len_shorter, len_longer);

        num_indels * self.indel_score + self.self_score
    }
}

/// Minimum number of indels of an alignment that touches the diagonal just outside a band of
/// half-width `band`.
pub fn min_edge_indels(band: usize, len_shorter: usize, len_longer: usize) -> Score {
    let band = band as Score;
    let l1 = len_shorter as Score;
    let l2 = len_longer as Score;

    let mut num_indels = (l1 - 1) + (l2 - 1);
    if band + 1 <= l2 - 1 {
        num_indels = num_indels.min(band + 1 + l1 - (l2 - band - 1));
    }

    num_indels
}

/// Whether [`BandEdgeBound`] bounds every alignment of `shorter` with `longer` (both encoded).
///
/// No substitution may score more than the shorter sequence's symbol against itself, and no
/// symbol of the shorter sequence may have a negative self score. Every indel must score at most
/// the indel-vs-letter score it is charged, and that score can't be positive.
pub fn edge_bound_holds(shorter: &[u8], longer: &[u8], table: &ScoreTable) -> bool {
    let indel_score = table.indel_vs_letter();
    if indel_score > 0 {
        return false;
    }

    let indel = table.indel_ix();
    let shorter_symbols = table.symbols_in(shorter);
    let longer_symbols = table.symbols_in(longer);

    let indels_dominated = shorter_symbols.iter()
        .chain(&longer_symbols)
        .all(|&c| table.score_ix(indel, c) <= indel_score);

    let substitutions_dominated = shorter_symbols.iter().all(|&a| {
        let self_score = table.score_ix(a, a);
        self_score >= 0 && longer_symbols.iter().all(|&b| table.score_ix(a, b) <= self_score)
    });

    indels_dominated && substitutions_dominated
}

/// Upper bound on the score reachable by widening a band of half-width `band`.
pub fn upper_bound(band: usize, len_longer: usize, shorter: &[u8], table: &ScoreTable) -> Score {
    BandEdgeBound::new(shorter, table).upper_bound(band, len_longer)
}


#[cfg(test)]
mod tests {
    use super::{edge_bound_holds, min_edge_indels, upper_bound, BandEdgeBound};
    use crate::aligner::scoring::ScoreTable;

    #[test]
    fn test_min_edge_indels() {
        // Equal lengths, zero band: leave the diagonal and come back
        assert_eq!(min_edge_indels(0, 4, 4), 2);
        assert_eq!(min_edge_indels(1, 4, 4), 4);

        assert_eq!(min_edge_indels(1, 2, 3), 3);
        assert_eq!(min_edge_indels(2, 5, 8), 3 + 5 - 5);

        // Band already spans the matrix, fall back to the total of both lengths
        assert_eq!(min_edge_indels(3, 4, 4), 6);
        assert_eq!(min_edge_indels(10, 4, 6), 8);
    }

    #[test]
    fn test_upper_bound_blosum62() {
        let table = ScoreTable::blosum62();
        let s1 = table.encode(b"AC").unwrap();

        // 3 indels at -4, self score 4 + 9
        assert_eq!(upper_bound(1, 3, &s1, &table), 1);

        let s1 = table.encode(b"AAAA").unwrap();
        let bound = BandEdgeBound::new(&s1, &table);
        assert_eq!(bound.upper_bound(0, 4), 16 - 8);
        assert_eq!(bound.upper_bound(1, 4), 16 - 16);
    }

    #[test]
    fn test_bound_decreases_with_band() {
        let table = ScoreTable::blosum62();
        let s1 = table.encode(b"HEAGAWGHEE").unwrap();
        let bound = BandEdgeBound::new(&s1, &table);

        let mut prev = bound.upper_bound(3, 13);
        for band in 4..12 {
            let next = bound.upper_bound(band, 13);
            assert!(next <= prev);
            prev = next;
        }
    }

    #[test]
    fn test_edge_bound_holds_blosum62() {
        let table = ScoreTable::blosum62();
        let standard = table.encode(b"ARNDCQEGHILKMFPSTWYVBZ").unwrap();
        assert!(edge_bound_holds(&standard, &standard, &table));

        // X scores -1 against itself, which the self score bound can't credit
        let with_x = table.encode(b"WWXXX").unwrap();
        let without_x = table.encode(b"AW").unwrap();
        assert!(!edge_bound_holds(&with_x, &without_x, &table));
        assert!(edge_bound_holds(&without_x, &with_x, &table));

        // An indel against a `*` residue scores 1, more than the -4 charged
        let with_stop = table.encode(b"A*").unwrap();
        assert!(!edge_bound_holds(&without_x, &with_stop, &table));
        assert!(!edge_bound_holds(&with_stop, &without_x, &table));
    }

    #[test]
    fn test_edge_bound_holds_custom_tables() {
        // A against C beats A against itself
        let rows = [
            [1, 10, -1, -3],
            [10, 2, -1, -3],
            [-1, -1, 3, -3],
            [-3, -3, -3, 0],
        ];
        let table = ScoreTable::new(b"ACG-", b'-', &rows).unwrap();
        let ca = table.encode(b"CA").unwrap();
        let gg = table.encode(b"GG").unwrap();
        assert!(!edge_bound_holds(&ca, &ca, &table));
        assert!(edge_bound_holds(&gg, &gg, &table));

        let rewarding_indels = ScoreTable::linear(b"AC", b'-', 1, -1, 2).unwrap();
        let ac = rewarding_indels.encode(b"AC").unwrap();
        assert!(!edge_bound_holds(&ac, &ac, &rewarding_indels));
    }
}
