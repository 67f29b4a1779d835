pub mod errors;
pub mod aligner;
pub mod io;

pub use aligner::{BandedAligner, BandedAlignment, AlignmentClass};
pub use aligner::scoring::ScoreTable;
