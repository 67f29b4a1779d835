use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;

use crate::errors::BandAlignError;

/// A sequence read from an input file, with its record name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedSequence {
    pub name: String,
    pub sequence: Vec<u8>,
}

impl NamedSequence {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }
}

/// Read the first two records of a FASTA file. Files ending in `.gz` are decompressed.
pub fn load_sequence_pair(path: impl AsRef<Path>) -> Result<(NamedSequence, NamedSequence), BandAlignError> {
    let p = path.as_ref();
    let is_gzipped = p
        .file_name()
        .map(|v| v.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false);

    let reader_inner: Box<dyn BufRead> = if is_gzipped {
        Box::new(File::open(p).map(MultiGzDecoder::new).map(BufReader::new)?)
    } else {
        Box::new(File::open(p).map(BufReader::new)?)
    };

    read_sequence_pair(reader_inner)
}

/// Read the first two records from FASTA formatted input. Further records are ignored.
pub fn read_sequence_pair<R: BufRead>(reader: R) -> Result<(NamedSequence, NamedSequence), BandAlignError> {
    let mut reader = fasta::io::Reader::new(reader);

    let mut sequences = Vec::with_capacity(2);
    for result in reader.records().take(2) {
        let record = result?;
        let name = std::str::from_utf8(record.name())?;
        let sequence: &[u8] = record.sequence().as_ref();

        sequences.push(NamedSequence::new(name, sequence));
    }

    let found = sequences.len();
    let mut sequences = sequences.into_iter();
    match (sequences.next(), sequences.next()) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(BandAlignError::MissingSequences { found }),
    }
}


#[cfg(test)]
mod tests {
    use super::read_sequence_pair;
    use crate::errors::BandAlignError;

    #[test]
    fn test_read_pair() {
        let data = b">seq1 some description\nHEAG\nAWGHEE\n>seq2\nPAWHEAE\n>seq3\nAAA\n";
        let (first, second) = read_sequence_pair(&data[..]).unwrap();

        assert_eq!(first.name, "seq1");
        assert_eq!(first.sequence, b"HEAGAWGHEE");
        assert_eq!(second.name, "seq2");
        assert_eq!(second.sequence, b"PAWHEAE");
    }

    #[test]
    fn test_missing_second() {
        let data = b">seq1\nHEAG\n";
        let err = read_sequence_pair(&data[..]).unwrap_err();

        assert!(matches!(err, BandAlignError::MissingSequences { found: 1 }));
    }
}
