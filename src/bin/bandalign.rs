use std::fs::{self, File};
use std::io::{self, stdout, BufReader, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

use bandalign::aligner::config::{AlignerConfig, BandAlignConfig, ScoringScheme};
use bandalign::aligner::scoring::ScoreTable;
use bandalign::aligner::BandedAligner;
use bandalign::io::{load_sequence_pair, read_pair_interactive, write_alignment, OutputFormat};

/// The various output formats supported by bandalign
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputType {
    /// Score, aligned sequences and classification string
    Text,

    /// Aligned sequences as FASTA records
    Fasta,

    /// JSON object with the alignment and band statistics
    Json,
}

impl From<OutputType> for OutputFormat {
    fn from(value: OutputType) -> Self {
        match value {
            OutputType::Text => OutputFormat::Text,
            OutputType::Fasta => OutputFormat::Fasta,
            OutputType::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
/// Built-in substitution scoring schemes
enum ScoringType {
    /// NCBI BLOSUM62 protein scores, `*` is the indel symbol
    Blosum62,

    /// Uniform match, mismatch and indel scores over a custom alphabet
    Linear,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct CliArgs {
    /// Set verbosity level. Use multiple times to increase the verbosity level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<BandAlignSubcommand>,
}

#[derive(Subcommand, Debug)]
enum BandAlignSubcommand {
    /// Globally align the first two sequences of a FASTA file
    Align(AlignArgs),

    /// Globally align two sequences given on the command line
    Pair(PairArgs),

    /// Prompt for two sequences and their lengths on the console, then align them
    Interactive(InteractiveArgs),
}

#[derive(Args, Debug)]
struct AlignArgs {
    /// Sequences to align in FASTA format, optionally gzipped.
    #[clap(help_heading = "Inputs")]
    sequences: PathBuf,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    scoring: ScoringArgs,
}

#[derive(Args, Debug)]
struct PairArgs {
    /// First sequence
    #[clap(help_heading = "Inputs")]
    first: String,

    /// Second sequence
    #[clap(help_heading = "Inputs")]
    second: String,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    scoring: ScoringArgs,
}

#[derive(Args, Debug)]
struct InteractiveArgs {
    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    scoring: ScoringArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output filename. If not given, defaults to stdout
    #[arg(short, long)]
    #[clap(help_heading = "Outputs")]
    output: Option<PathBuf>,

    /// Output file type.
    #[arg(value_enum, short = 'O', long, default_value = "text")]
    #[clap(help_heading = "Outputs")]
    output_type: OutputType,

    /// Also print a three-line view of the alignment to stderr
    #[arg(short = 'p', long)]
    #[clap(help_heading = "Outputs")]
    pretty: bool,
}

#[derive(Args, Debug)]
struct ScoringArgs {
    /// JSON configuration file with the scoring scheme and band settings. Command line options
    /// override its values.
    #[arg(short = 'c', long)]
    #[clap(help_heading = "Alignment configuration")]
    config: Option<PathBuf>,

    /// Built-in scoring scheme
    #[arg(value_enum, short = 's', long)]
    #[clap(help_heading = "Alignment configuration")]
    scoring: Option<ScoringType>,

    /// JSON file with a full substitution table (alphabet, indel symbol and scores)
    #[arg(short = 't', long, conflicts_with = "scoring")]
    #[clap(help_heading = "Alignment configuration")]
    score_table: Option<PathBuf>,

    /// Alphabet of the linear scoring scheme
    #[arg(long, default_value = "ACGT")]
    #[clap(help_heading = "Alignment configuration")]
    alphabet: String,

    /// Indel symbol of the linear scoring scheme
    #[arg(long, default_value = "-")]
    #[clap(help_heading = "Alignment configuration")]
    indel_symbol: char,

    /// Score for identical symbols in the linear scoring scheme
    #[arg(short = 'M', long = "match", default_value = "1", allow_negative_numbers = true)]
    #[clap(help_heading = "Alignment configuration")]
    match_score: i32,

    /// Score for different symbols in the linear scoring scheme
    #[arg(short = 'X', long, default_value = "-1", allow_negative_numbers = true)]
    #[clap(help_heading = "Alignment configuration")]
    mismatch: i32,

    /// Score for a symbol against an indel in the linear scoring scheme
    #[arg(short = 'G', long, default_value = "-2", allow_negative_numbers = true)]
    #[clap(help_heading = "Alignment configuration")]
    indel: i32,

    /// Stop widening the band at this half-width, even if the result is not proven optimal
    #[arg(short = 'b', long)]
    #[clap(help_heading = "Alignment configuration")]
    max_band: Option<usize>,
}

impl ScoringArgs {
    fn build_aligner(&self) -> Result<BandedAligner> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Could not open configuration file {path:?}"))?;
                BandAlignConfig::from_json_reader(BufReader::new(file))
                    .with_context(|| format!("Could not read configuration file {path:?}"))?
            },
            None => BandAlignConfig::default(),
        };

        match self.scoring {
            Some(ScoringType::Blosum62) => config.scoring = ScoringScheme::Blosum62,
            Some(ScoringType::Linear) => {
                config.scoring = ScoringScheme::Linear {
                    alphabet: self.alphabet.clone(),
                    indel_symbol: self.indel_symbol,
                    match_score: self.match_score,
                    mismatch: self.mismatch,
                    indel: self.indel,
                }
            },
            None => (),
        }

        let table = if let Some(path) = &self.score_table {
            let file = File::open(path)
                .with_context(|| format!("Could not open score table {path:?}"))?;
            ScoreTable::from_json_reader(BufReader::new(file))
                .with_context(|| format!("Could not read score table {path:?}"))?
        } else {
            config.scoring.build()?
        };

        if let Some(max_band) = self.max_band {
            config.aligner = AlignerConfig::new().with_max_band(max_band);
        }

        Ok(BandedAligner::with_config(table, config.aligner))
    }
}

/// Build our base tracing subscriber with stderr logging.
fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(filter_layer);

    Registry::default().with(stderr_log).try_init()?;

    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(if let Some(path) = path {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?
        }

        let file = File::create(path)
            .with_context(|| format!("Could not create output file {path:?}"))?;
        Box::new(io::BufWriter::new(file)) as Box<dyn Write>
    } else {
        Box::new(stdout()) as Box<dyn Write>
    })
}

fn run_alignment(
    aligner: &BandedAligner,
    names: (&str, &str),
    first: &[u8],
    second: &[u8],
    output_args: &OutputArgs,
) -> Result<()> {
    info!(first = names.0, first_len = first.len(), second = names.1, second_len = second.len(), "Aligning");

    let alignment = aligner.align(first, second)
        .with_context(|| format!("Could not align {} to {}", names.0, names.1))?;

    if output_args.pretty {
        eprintln!("{}", alignment.print_alignment());
    }

    let mut writer = open_output(output_args.output.as_deref())?;
    write_alignment(&alignment, names, output_args.output_type.into(), &mut writer)?;
    writer.flush()?;

    Ok(())
}

fn align_subcommand(args: &AlignArgs) -> Result<()> {
    let aligner = args.scoring.build_aligner()?;

    let (first, second) = load_sequence_pair(&args.sequences)
        .with_context(|| format!("Could not read sequences from {:?}", args.sequences))?;

    run_alignment(&aligner, (first.name.as_str(), second.name.as_str()), &first.sequence, &second.sequence, &args.output)
}

fn pair_subcommand(args: &PairArgs) -> Result<()> {
    let aligner = args.scoring.build_aligner()?;

    run_alignment(&aligner, ("first", "second"), args.first.as_bytes(), args.second.as_bytes(), &args.output)
}

fn interactive_subcommand(args: &InteractiveArgs) -> Result<()> {
    let aligner = args.scoring.build_aligner()?;

    let (first, second) = read_pair_interactive(io::stdin().lock(), io::stderr())?;

    run_alignment(&aligner, ("first", "second"), &first, &second, &args.output)
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose)?;

    match &args.command {
        Some(BandAlignSubcommand::Align(v)) => align_subcommand(v)?,
        Some(BandAlignSubcommand::Pair(v)) => pair_subcommand(v)?,
        Some(BandAlignSubcommand::Interactive(v)) => interactive_subcommand(v)?,
        None => anyhow::bail!("No subcommand given."),
    };

    Ok(())
}
