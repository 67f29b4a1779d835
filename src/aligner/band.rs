//! Addressing of a diagonal band within the full DP matrix
//!
//! The full matrix has one row per position `x` of the longer sequence and one column per
//! position `y` of the shorter sequence. Only cells whose diagonal offset `y - x` lies within
//! `[-b, b]` are stored. Each row occupies `2b + 1` consecutive slots, with the main diagonal
//! at slot `b`.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BandIndex {
    band: usize,
}

impl BandIndex {
    pub fn new(band: usize) -> Self {
        Self { band }
    }

    #[inline]
    pub fn band(&self) -> usize {
        self.band
    }

    #[inline]
    pub fn row_len(&self) -> usize {
        2 * self.band + 1
    }

    /// Number of slots needed to store the band for a longer sequence of length `len_longer`
    #[inline]
    pub fn storage_len(&self, len_longer: usize) -> usize {
        (len_longer + 1) * self.row_len()
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x.abs_diff(y) <= self.band
    }

    /// Flat storage offset of full-matrix cell `(x, y)`, or `None` if the cell lies outside the band.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> Option<usize> {
        let row_start = x * self.row_len();

        if y >= x {
            let d = y - x;
            (d <= self.band).then(|| row_start + self.band + d)
        } else {
            let d = x - y;
            (d <= self.band).then(|| row_start + self.band - d)
        }
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::BandIndex;

    #[test]
    fn test_offsets_match_dense_reference() {
        for band in 0..5 {
            let index = BandIndex::new(band);
            let len_longer = 9;
            let len_shorter = 7;

            let mut seen = HashSet::new();
            for x in 0..=len_longer {
                for y in 0..=len_shorter {
                    let dense_in_band = (x as isize - y as isize).abs() <= band as isize;
                    assert_eq!(index.contains(x, y), dense_in_band);

                    match index.offset(x, y) {
                        Some(offset) => {
                            assert!(dense_in_band, "({x}, {y}) stored outside band {band}");
                            assert!(offset < index.storage_len(len_longer));
                            assert!(offset / index.row_len() == x, "cell ({x}, {y}) not stored in its own row");
                            assert!(seen.insert(offset), "offset {offset} used twice");
                        },
                        None => assert!(!dense_in_band),
                    }
                }
            }
        }
    }

    #[test]
    fn test_diagonal_at_center() {
        let index = BandIndex::new(3);

        assert_eq!(index.row_len(), 7);
        assert_eq!(index.offset(0, 0), Some(3));
        assert_eq!(index.offset(2, 2), Some(2 * 7 + 3));
        assert_eq!(index.offset(2, 5), Some(2 * 7 + 6));
        assert_eq!(index.offset(5, 2), Some(5 * 7));
        assert_eq!(index.offset(2, 6), None);
        assert_eq!(index.offset(6, 2), None);
    }

    #[test]
    fn test_zero_band() {
        let index = BandIndex::new(0);

        assert_eq!(index.row_len(), 1);
        assert_eq!(index.storage_len(4), 5);
        assert_eq!(index.offset(3, 3), Some(3));
        assert_eq!(index.offset(3, 2), None);
        assert_eq!(index.offset(0, 1), None);
    }
}
