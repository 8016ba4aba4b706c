use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use std::collections::{
    BTreeMap,
    HashSet,
};
use std::path::Path;
use std::time::Instant;
use timsseek_speclib::models::DecoyMarking;
use timsseek_speclib::protein::ProteinDatabase;
use timsseek_speclib::{
    BuildPhase,
    BuildStats,
    SpeclibBuilder,
    SpeclibReader,
    SpeclibWriter,
    TheoreticalFragmentPredictor,
};
use tracing::{
    debug,
    info,
    warn,
};

use crate::config::{
    Config,
    DigestionConfig,
    InputConfig,
};
use crate::errors::CliError;

/// Reads a peptide list, one sequence per line.
///
/// Blank lines and lines starting with `#` are skipped, repeated
/// peptides are kept once in first-seen order.
pub fn parse_peptide_list(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(|x| x.trim())
        .filter(|x| !x.is_empty() && !x.starts_with('#'))
        .filter(|x| seen.insert(x.to_string()))
        .map(|x| x.to_string())
        .collect()
}

pub fn load_peptides(
    input: &InputConfig,
    digestion: &DigestionConfig,
) -> Result<Vec<String>, CliError> {
    match input {
        InputConfig::Fasta { path } => {
            info!("Digesting proteins from fasta file {:?}", path);
            let proteins = ProteinDatabase::from_fasta_file(path)?;
            Ok(digestion.as_digester().unique_peptides(&proteins))
        }
        InputConfig::Peptides { path } => {
            info!("Reading peptides from {:?}", path);
            let content = std::fs::read_to_string(path).map_err(|e| CliError::Io {
                source: e.to_string(),
                path: Some(path.display().to_string()),
            })?;
            let peptides = parse_peptide_list(&content);
            info!("Read {} unique peptides", peptides.len());
            Ok(digestion.as_digester().filter_peptides(peptides))
        }
    }
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} {msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .expect("Static progress template is valid")
}

pub fn build_library(config: &Config) -> Result<BuildStats, CliError> {
    let (input, output) = match (&config.input, &config.output) {
        (Some(input), Some(output)) => (input, output),
        _ => {
            return Err(CliError::Config {
                source: "Both input and output need to be set".to_string(),
            });
        }
    };
    let start = Instant::now();
    let peptides = load_peptides(input, &config.digestion)?;
    if peptides.is_empty() {
        return Err(CliError::Config {
            source: "No peptides to build a library from".to_string(),
        });
    }

    let predictor = TheoreticalFragmentPredictor::new(config.prediction.max_fragment_charge);
    let builder = SpeclibBuilder::new(&predictor)
        .with_options(config.prediction.options())
        .with_charges(config.charges.min_charge, config.charges.max_charge)
        .with_chunk_size(config.prediction.chunk_size);

    let total = builder.num_candidates(peptides.len()) * 2;
    let pb = ProgressBar::new(total as u64);
    pb.set_style(progress_style());

    let mut writer = SpeclibWriter::create(&output.path, output.preview_n)?;
    let stats = builder.build(
        &peptides,
        |entry| writer.write_entry(&entry),
        |phase, num_done| {
            let msg = match phase {
                BuildPhase::Targets => "Targets",
                BuildPhase::Decoys => "Decoys",
            };
            pb.set_message(msg);
            pb.inc(num_done as u64);
        },
    );
    pb.finish();
    let stats = match stats {
        Ok(stats) => stats,
        Err(e) => {
            if let Err(abort_err) = writer.abort() {
                warn!("Could not clean up the incomplete library: {}", abort_err);
            }
            return Err(e.into());
        }
    };
    let num_written = writer.finish()?;

    info!("Build stats: {:#?}", stats);
    println!(
        "Wrote {} entries ({} targets, {} decoys) to {} in {:?}",
        num_written,
        stats.targets.accepted,
        stats.decoys.accepted,
        output.path.display(),
        start.elapsed()
    );
    Ok(stats)
}

#[derive(Debug, Default)]
pub struct SpeclibSummary {
    pub num_entries: usize,
    pub num_decoys: usize,
    /// Entry counts per (target/decoy, charge).
    pub counts: BTreeMap<(DecoyMarking, u8), usize>,
    pub min_id: Option<u64>,
    pub max_id: Option<u64>,
}

pub fn inspect_library(path: &Path, num_entries: usize) -> Result<SpeclibSummary, CliError> {
    let mut summary = SpeclibSummary::default();
    for (i, entry) in SpeclibReader::from_file(path)?.enumerate() {
        let entry = entry?;
        if i < num_entries {
            let pretty = serde_json::to_string_pretty(&entry).map_err(|e| CliError::DataReading {
                source: e.to_string(),
            })?;
            println!("{}", pretty);
        }
        summary.num_entries += 1;
        if entry.is_decoy() {
            summary.num_decoys += 1;
        }
        let precursor = entry.precursor();
        *summary
            .counts
            .entry((precursor.decoy_marking(), precursor.charge()))
            .or_insert(0) += 1;
        let id = entry.id();
        summary.min_id = Some(summary.min_id.map_or(id, |x| x.min(id)));
        summary.max_id = Some(summary.max_id.map_or(id, |x| x.max(id)));
    }
    debug!("Library summary: {:?}", summary);

    println!("Library: {}", path.display());
    println!(
        "Entries: {} ({} targets, {} decoys)",
        summary.num_entries,
        summary.num_entries - summary.num_decoys,
        summary.num_decoys
    );
    for ((marking, charge), count) in summary.counts.iter() {
        println!("{} charge {}: {}", marking.as_str(), charge, count);
    }
    if let (Some(min_id), Some(max_id)) = (summary.min_id, summary.max_id) {
        println!("Ids: {}..={}", min_id, max_id);
    }
    Ok(summary)
}
