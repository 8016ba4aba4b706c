use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a predicted spectral library.
    Build(BuildArgs),
    /// Summarize an existing spectral library.
    Inspect(InspectArgs),
    /// Write a template configuration file.
    WriteTemplate(WriteTemplateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Path to the fasta file (will over-write the config file)
    #[arg(short, long)]
    pub fasta: Option<PathBuf>,

    /// Path to the output library (will over-write the config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the speclib file (.ndjson or .ndjson.zst)
    #[arg(short, long)]
    pub speclib_file: PathBuf,

    /// Number of entries to print
    #[arg(short, long, default_value_t = 2)]
    pub num_entries: usize,
}

#[derive(Parser, Debug)]
pub struct WriteTemplateArgs {
    /// The path to the output file.
    #[arg(short, long)]
    pub output_path: PathBuf,
}
