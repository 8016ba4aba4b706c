//! Trait definitions for the collaborators of the library builder.

use crate::errors::PredictionError;
use crate::fragment_mass::{
    PredictedIons,
    PredictionOptions,
};
use crate::models::PeptideCharge;

/// Batch oracle that predicts fragment ions for (peptide, charge) pairs.
///
/// The builder treats implementations as opaque: it hands over a batch,
/// gets back exactly one result per input pair (in the same order), skips
/// the failed ones and never retries them.
///
/// Implementations own whatever heavy state they need (a loaded model, lookup
/// tables ...), the builder only borrows them for the duration of a run.
///
/// # Example
///
/// ```
/// use timsseek_speclib::fragment_mass::{PredictionOptions, TheoreticalFragmentPredictor};
/// use timsseek_speclib::models::PeptideCharge;
/// use timsseek_speclib::traits::FragmentPredictor;
///
/// let predictor = TheoreticalFragmentPredictor::default();
/// let batch = vec![PeptideCharge::new("PEPTIDEPINK", 2)];
/// let out = predictor.predict_batch(&batch, &PredictionOptions::default());
/// assert_eq!(out.len(), 1);
/// assert!(out[0].is_ok());
/// ```
pub trait FragmentPredictor: Sync {
    fn predict_batch(
        &self,
        batch: &[PeptideCharge],
        options: &PredictionOptions,
    ) -> Vec<Result<PredictedIons, PredictionError>>;
}
