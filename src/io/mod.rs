pub mod console;
pub mod fasta;
pub mod output;

pub use console::read_pair_interactive;
pub use fasta::{load_sequence_pair, read_sequence_pair, NamedSequence};
pub use output::{write_alignment, OutputFormat};
