//! Interactive console protocol: for each of the two sequences, first its length, then its
//! symbols, each prompted for on the given writer.

use std::io::{BufRead, Write};

use crate::errors::BandAlignError;

/// Whitespace separated tokens from a line based reader
struct Tokens<R> {
    reader: R,
    pending: Vec<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self { reader, pending: Vec::new() }
    }

    fn next_token(&mut self) -> Result<Option<String>, BandAlignError> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            self.pending = line.split_whitespace()
                .rev()
                .map(str::to_string)
                .collect();
        }

        Ok(self.pending.pop())
    }
}

fn read_one<R, W>(tokens: &mut Tokens<R>, prompts: &mut W, which: &str, found: usize) -> Result<Vec<u8>, BandAlignError>
where
    R: BufRead,
    W: Write,
{
    writeln!(prompts, "Insert the length of the {which} string: ")?;
    prompts.flush()?;

    let length_token = tokens.next_token()?
        .ok_or(BandAlignError::MissingSequences { found })?;
    let declared = match length_token.parse::<usize>() {
        Ok(len) if len > 0 => len,
        _ => return Err(BandAlignError::InvalidLength(length_token)),
    };

    writeln!(prompts, "Insert the {which} string: ")?;
    prompts.flush()?;

    let sequence = tokens.next_token()?
        .ok_or(BandAlignError::MissingSequences { found })?;
    if sequence.len() != declared {
        return Err(BandAlignError::LengthMismatch { declared, actual: sequence.len() });
    }

    Ok(sequence.into_bytes())
}

/// Read two sequences using the interactive console protocol.
pub fn read_pair_interactive<R, W>(input: R, mut prompts: W) -> Result<(Vec<u8>, Vec<u8>), BandAlignError>
where
    R: BufRead,
    W: Write,
{
    let mut tokens = Tokens::new(input);

    let first = read_one(&mut tokens, &mut prompts, "first", 0)?;
    let second = read_one(&mut tokens, &mut prompts, "second", 1)?;

    Ok((first, second))
}


#[cfg(test)]
mod tests {
    use super::read_pair_interactive;
    use crate::errors::BandAlignError;

    #[test]
    fn test_read_pair() {
        let input = b"3\nHEA\n4 GAWG\n";
        let mut prompts = Vec::new();

        let (first, second) = read_pair_interactive(&input[..], &mut prompts).unwrap();
        assert_eq!(first, b"HEA");
        assert_eq!(second, b"GAWG");

        let prompts = String::from_utf8(prompts).unwrap();
        assert!(prompts.contains("Insert the length of the first string"));
        assert!(prompts.contains("Insert the second string"));
    }

    #[test]
    fn test_invalid_length() {
        let err = read_pair_interactive(&b"0\nA\n"[..], std::io::sink()).unwrap_err();
        assert!(matches!(err, BandAlignError::InvalidLength(ref s) if s == "0"));

        let err = read_pair_interactive(&b"abc\nA\n"[..], std::io::sink()).unwrap_err();
        assert!(matches!(err, BandAlignError::InvalidLength(_)));

        let err = read_pair_interactive(&b"2\nA\n"[..], std::io::sink()).unwrap_err();
        assert!(matches!(err, BandAlignError::LengthMismatch { declared: 2, actual: 1 }));
    }

    #[test]
    fn test_truncated_input() {
        let err = read_pair_interactive(&b"1\nA\n1\n"[..], std::io::sink()).unwrap_err();
        assert!(matches!(err, BandAlignError::MissingSequences { found: 1 }));
    }
}
