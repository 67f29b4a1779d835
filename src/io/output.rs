use std::io::Write;

use noodles::fasta::{self as fasta, record::{Definition, Sequence}, Record};
use serde::Serialize;

use crate::aligner::BandedAlignment;
use crate::errors::BandAlignError;

/// Supported ways of writing an alignment
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Score, both tracks and the classification string, as plain text
    Text,

    /// The two aligned tracks as FASTA records
    Fasta,

    /// A JSON object with the tracks, classification and band statistics
    Json,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    first_name: &'a str,
    second_name: &'a str,
    #[serde(flatten)]
    alignment: &'a BandedAlignment,
    identity: f64,
}

pub fn write_alignment<W: Write>(
    alignment: &BandedAlignment,
    names: (&str, &str),
    format: OutputFormat,
    mut output: W,
) -> Result<(), BandAlignError> {
    match format {
        OutputFormat::Text => {
            writeln!(output, "{alignment}")?;
        },
        OutputFormat::Fasta => {
            let mut writer = fasta::io::Writer::new(output);

            for (name, track) in [(names.0, &alignment.first), (names.1, &alignment.second)] {
                let record = Record::new(
                    Definition::new(name, None),
                    Sequence::from_iter(track.bytes()),
                );

                writer.write_record(&record)?;
            }
        },
        OutputFormat::Json => {
            let record = JsonRecord {
                first_name: names.0,
                second_name: names.1,
                alignment,
                identity: alignment.identity(),
            };

            serde_json::to_writer_pretty(&mut output, &record)?;
            writeln!(output)?;
        },
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::{write_alignment, OutputFormat};
    use crate::aligner::BandedAligner;
    use crate::aligner::scoring::ScoreTable;

    fn alignment() -> crate::aligner::BandedAlignment {
        let aligner = BandedAligner::new(ScoreTable::linear(b"ACGT", b'-', 5, -1, -2).unwrap());
        aligner.align(b"AC", b"AGC").unwrap()
    }

    #[test]
    fn test_text() {
        let mut out = Vec::new();
        write_alignment(&alignment(), ("a", "b"), OutputFormat::Text, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Global alignment score: 8\nFirst string:\nA_C\nSecond string:\nAGC\n\
             Alignment string (I = Indel, E = Equal, U = Unequal):\nEIE\n"
        );
    }

    #[test]
    fn test_fasta() {
        let mut out = Vec::new();
        write_alignment(&alignment(), ("a", "b"), OutputFormat::Fasta, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, ">a\nA_C\n>b\nAGC\n");
    }

    #[test]
    fn test_json() {
        let mut out = Vec::new();
        write_alignment(&alignment(), ("a", "b"), OutputFormat::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["first_name"], "a");
        assert_eq!(value["score"], 8);
        assert_eq!(value["first"], "A_C");
        assert_eq!(value["classification"], "EIE");
        assert_eq!(value["proven_optimal"], true);
    }
}
