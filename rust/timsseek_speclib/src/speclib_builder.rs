use crate::errors::{
    Result,
    SpeclibBuildError,
};
use crate::fragment_mass::{
    EntryOutcome,
    PredictionOptions,
    RejectionReason,
    as_entry,
};
use crate::models::{
    PeptideCharge,
    SpeclibEntry,
    as_decoy_string,
    expand_charges,
};
use crate::traits::FragmentPredictor;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::time::Instant;
use tracing::{
    info,
    trace,
    warn,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildPhase {
    Targets,
    Decoys,
}

impl BuildPhase {
    fn is_decoy(&self) -> bool {
        matches!(self, BuildPhase::Decoys)
    }
}

/// Counters for a single pass over the peptides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseStats {
    pub candidates: usize,
    pub accepted: usize,
    pub rejected_mz: usize,
    pub rejected_fragments: usize,
    pub formula_errors: usize,
    pub prediction_errors: usize,
}

impl PhaseStats {
    pub fn num_skipped(&self) -> usize {
        self.rejected_mz + self.rejected_fragments + self.formula_errors + self.prediction_errors
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub targets: PhaseStats,
    pub decoys: PhaseStats,
}

impl BuildStats {
    pub fn num_accepted(&self) -> usize {
        self.targets.accepted + self.decoys.accepted
    }
}

/// Drives the fragment predictor over a peptide list and assembles the library.
///
/// All targets are processed first, then the decoys derived from the same
/// peptides. Ids start at 1 and only advance when an entry is accepted.
pub struct SpeclibBuilder<'a, P: FragmentPredictor> {
    pub predictor: &'a P,
    pub options: PredictionOptions,
    pub min_charge: u8,
    pub max_charge: u8,
    pub chunk_size: usize,
}

impl<'a, P: FragmentPredictor> SpeclibBuilder<'a, P> {
    pub fn new(predictor: &'a P) -> Self {
        Self {
            predictor,
            options: PredictionOptions::default(),
            min_charge: 2,
            max_charge: 3,
            chunk_size: 20_000,
        }
    }

    pub fn with_options(mut self, options: PredictionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_charges(mut self, min_charge: u8, max_charge: u8) -> Self {
        self.min_charge = min_charge;
        self.max_charge = max_charge;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    fn charge_range(&self) -> Result<RangeInclusive<u8>> {
        if self.min_charge == 0 || self.min_charge > self.max_charge {
            return Err(SpeclibBuildError::InvalidParameters {
                msg: format!(
                    "Invalid charge range {}..={}, charges must be positive and min <= max",
                    self.min_charge, self.max_charge
                ),
            });
        }
        if self.chunk_size == 0 {
            return Err(SpeclibBuildError::InvalidParameters {
                msg: "chunk_size must be larger than 0".to_string(),
            });
        }
        Ok(self.min_charge..=self.max_charge)
    }

    /// Number of (peptide, charge) pairs a run will go through, per phase.
    pub fn num_candidates(&self, num_peptides: usize) -> usize {
        let num_charges = (self.min_charge..=self.max_charge).count();
        num_peptides * num_charges
    }

    /// Builds the library, handing every accepted entry to `sink` in id order.
    ///
    /// `progress` is called after each chunk with the phase and the number
    /// of pairs in that chunk.
    pub fn build<S, F>(
        &self,
        peptides: &[String],
        mut sink: S,
        mut progress: F,
    ) -> Result<BuildStats>
    where
        S: FnMut(SpeclibEntry) -> Result<()>,
        F: FnMut(BuildPhase, usize),
    {
        let charges = self.charge_range()?;
        let mut next_id: u64 = 1;

        let start = Instant::now();
        let targets = self.run_phase(
            BuildPhase::Targets,
            peptides,
            charges.clone(),
            &mut next_id,
            &mut sink,
            &mut progress,
        )?;
        info!(
            "Targets: {} accepted out of {} candidates in {:?}",
            targets.accepted,
            targets.candidates,
            start.elapsed()
        );

        let start = Instant::now();
        let decoy_peptides: Vec<String> = peptides.iter().map(|x| as_decoy_string(x)).collect();
        let decoys = self.run_phase(
            BuildPhase::Decoys,
            &decoy_peptides,
            charges,
            &mut next_id,
            &mut sink,
            &mut progress,
        )?;
        info!(
            "Decoys: {} accepted out of {} candidates in {:?}",
            decoys.accepted,
            decoys.candidates,
            start.elapsed()
        );

        Ok(BuildStats { targets, decoys })
    }

    fn run_phase<S, F>(
        &self,
        phase: BuildPhase,
        peptides: &[String],
        charges: RangeInclusive<u8>,
        next_id: &mut u64,
        sink: &mut S,
        progress: &mut F,
    ) -> Result<PhaseStats>
    where
        S: FnMut(SpeclibEntry) -> Result<()>,
        F: FnMut(BuildPhase, usize),
    {
        let decoy = phase.is_decoy();
        let mut stats = PhaseStats::default();
        let pairs: Vec<PeptideCharge> = expand_charges(peptides, charges).collect();

        for chunk in pairs.chunks(self.chunk_size) {
            let predictions = self.predictor.predict_batch(chunk, &self.options);
            if predictions.len() != chunk.len() {
                return Err(SpeclibBuildError::InvalidParameters {
                    msg: format!(
                        "Predictor returned {} results for a batch of {}",
                        predictions.len(),
                        chunk.len()
                    ),
                });
            }

            for (pair, prediction) in chunk.iter().zip(predictions) {
                stats.candidates += 1;
                let predicted = match prediction {
                    Ok(x) => x,
                    Err(e) => {
                        warn!(
                            "Prediction failed for {}/{}: {}",
                            pair.sequence, pair.charge, e
                        );
                        stats.prediction_errors += 1;
                        continue;
                    }
                };

                match as_entry(&predicted.peptide, &predicted.ions, decoy, *next_id) {
                    Ok(EntryOutcome::Accepted(entry)) => {
                        *next_id += 1;
                        stats.accepted += 1;
                        sink(entry)?;
                    }
                    Ok(EntryOutcome::Rejected(reason)) => {
                        trace!(
                            "Skipping {}/{}: {:?}",
                            pair.sequence, pair.charge, reason
                        );
                        match reason {
                            RejectionReason::PrecursorMzOutOfRange { .. } => {
                                stats.rejected_mz += 1
                            }
                            RejectionReason::TooFewFragments { .. } => {
                                stats.rejected_fragments += 1
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Error processing {}/{}: {}", pair.sequence, pair.charge, e);
                        stats.formula_errors += 1;
                    }
                }
            }
            progress(phase, chunk.len());
        }

        Ok(stats)
    }
}
