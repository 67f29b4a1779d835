use crate::aligner::alignment::AlignmentClass;
use crate::aligner::matrix::BandMatrix;

/// Symbol written in a track where the other sequence has a character aligned to nothing
pub const GAP_SYMBOL: u8 = b'_';

/// The aligned tracks of a traceback, in the internal (shorter, longer) order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Traceback {
    pub shorter_track: Vec<u8>,
    pub longer_track: Vec<u8>,
    pub classes: Vec<AlignmentClass>,
}

/// Walk the predecessor links from the end cell back to the origin.
///
/// The output length is known up front from the end cell: the length of the longer sequence
/// plus the number of gaps inserted in its track. The buffers are allocated at that size and
/// filled right to left.
pub fn reconstruct(matrix: &BandMatrix, shorter: &[u8], longer: &[u8]) -> Traceback {
    assert_eq!(shorter.len(), matrix.len_shorter());
    assert_eq!(longer.len(), matrix.len_longer());

    let aln_length = longer.len() + matrix.final_cell().indels_in_longer;
    let mut shorter_track = vec![GAP_SYMBOL; aln_length];
    let mut longer_track = vec![GAP_SYMBOL; aln_length];
    let mut classes = vec![AlignmentClass::Indel; aln_length];

    let mut x = longer.len();
    let mut y = shorter.len();
    let mut aln_ix = aln_length;

    while let Some((prev_x, prev_y)) = matrix.get(x, y)
        .unwrap_or_else(|| panic!("Traceback left the band at ({x}, {y})!"))
        .predecessor(x, y)
    {
        assert!(aln_ix > 0, "Traceback overran the alignment buffer of length {aln_length}!");
        aln_ix -= 1;

        if prev_y == y {
            longer_track[aln_ix] = longer[x - 1];
        } else if prev_x == x {
            shorter_track[aln_ix] = shorter[y - 1];
        } else {
            shorter_track[aln_ix] = shorter[y - 1];
            longer_track[aln_ix] = longer[x - 1];
            classes[aln_ix] = if shorter[y - 1] == longer[x - 1] {
                AlignmentClass::Equal
            } else {
                AlignmentClass::Unequal
            };
        }

        x = prev_x;
        y = prev_y;
    }

    assert_eq!(aln_ix, 0, "Traceback reached the origin with {aln_ix} unfilled alignment positions!");

    Traceback {
        shorter_track,
        longer_track,
        classes,
    }
}


#[cfg(test)]
mod tests {
    use super::{reconstruct, GAP_SYMBOL};
    use crate::aligner::alignment::AlignmentClass;
    use crate::aligner::matrix::BandMatrix;
    use crate::aligner::scoring::ScoreTable;

    fn run(shorter: &[u8], longer: &[u8], band: usize, table: &ScoreTable) -> super::Traceback {
        let s1 = table.encode(shorter).unwrap();
        let s2 = table.encode(longer).unwrap();
        let matrix = BandMatrix::fill(&s1, &s2, band, table);

        reconstruct(&matrix, shorter, longer)
    }

    #[test]
    fn test_single_gap() {
        let table = ScoreTable::linear(b"ACGT", b'-', 5, -1, -2).unwrap();
        let tb = run(b"AC", b"AGC", 1, &table);

        assert_eq!(tb.shorter_track, b"A_C");
        assert_eq!(tb.longer_track, b"AGC");
        assert_eq!(tb.classes, vec![AlignmentClass::Equal, AlignmentClass::Indel, AlignmentClass::Equal]);
    }

    #[test]
    fn test_gap_in_longer_track() {
        // Aligning C-vs-G costs more than gapping both, so the longer track gets a gap too
        let table = ScoreTable::linear(b"ACGT", b'-', 5, -10, -1).unwrap();
        let tb = run(b"AC", b"AG", 1, &table);

        assert_eq!(tb.shorter_track.len(), 3);
        assert_eq!(tb.longer_track.len(), 3);
        assert_eq!(tb.shorter_track[0], b'A');
        assert_eq!(tb.longer_track[0], b'A');
        assert_eq!(tb.classes.iter().filter(|c| **c == AlignmentClass::Indel).count(), 2);
        assert_eq!(tb.longer_track.iter().filter(|c| **c == GAP_SYMBOL).count(), 1);
        assert_eq!(tb.shorter_track.iter().filter(|c| **c == GAP_SYMBOL).count(), 1);
    }

    #[test]
    fn test_mismatch() {
        let table = ScoreTable::blosum62();
        let tb = run(b"ARN", b"AKN", 0, &table);

        assert_eq!(tb.shorter_track, b"ARN");
        assert_eq!(tb.longer_track, b"AKN");
        assert_eq!(tb.classes, vec![AlignmentClass::Equal, AlignmentClass::Unequal, AlignmentClass::Equal]);
    }
}
