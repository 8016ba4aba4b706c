use super::predicted_ions::{
    FragmentIonMap,
    PredictedPeptide,
};
use crate::errors::FormulaError;
use crate::isotopes::peptide_formula_dist;
use crate::models::{
    ElutionGroup,
    FragmentValues,
    PrecursorEntry,
    SpeclibEntry,
};
use crate::utils::constants::{
    NEUTRON_MASS,
    PROTON_MASS,
};

/// Precursors outside of this m/z range (inclusive) are not acquired.
pub const PRECURSOR_MZ_RANGE: (f64, f64) = (400.0, 1000.0);
/// Fragments must fall strictly inside this m/z range.
pub const FRAGMENT_MZ_RANGE: (f64, f64) = (250.0, 2000.0);
/// Fragments need to be above this fraction of the most intense fragment.
pub const RELATIVE_FRAGMENT_INTENSITY_CUTOFF: f64 = 0.02;
pub const MIN_FRAGMENTS: usize = 3;
/// Pseudo-intensity assigned to the -1 isotopologue.
pub const MINUS_ONE_ISOTOPE_INTENSITY: f64 = 0.001;
pub const PRECURSOR_ISOTOPE_OFFSETS: [i8; 4] = [-1, 0, 1, 2];

/// Super simple 1/k0 prediction.
///
/// This is a simple prediction of the mobility based on the m/z and charge.
/// On my data it gets MAPE 1.82802 so, this prediction + 10% error is a pretty solid way
/// to set an extraction window for mobility if you dont know anything for the peptide.
///
/// Example:
/// ```
/// use timsseek_speclib::fragment_mass::elution_group_converter::supersimpleprediction;
/// let mass = 1810.917339999999;
/// let charge = 2;
/// let out = supersimpleprediction(mass / charge as f64, charge);
/// assert!((out - 1.105151).abs() < 0.001 );
/// ```
pub fn supersimpleprediction(mz: f64, charge: u8) -> f64 {
    let intercept_ = -1.660e+00;
    let charge = charge as f64;
    let log1p_mz = mz.ln_1p();
    let sq_mz_over_charge = mz.powi(2) / charge;
    let log1p_sq_mz_over_charge = sq_mz_over_charge.ln_1p();

    intercept_
        + (-3.798e-01 * log1p_mz)
        + (-2.389e-04 * mz)
        + (3.957e-01 * log1p_sq_mz_over_charge)
        + (4.157e-07 * sq_mz_over_charge)
        + (1.417e-01 * charge)
}

pub fn precursor_mz(monoisotopic_mass: f64, charge: u8) -> f64 {
    (monoisotopic_mass + (PROTON_MASS * charge as f64)) / charge as f64
}

pub fn in_precursor_window(mz: f64) -> bool {
    (PRECURSOR_MZ_RANGE.0..=PRECURSOR_MZ_RANGE.1).contains(&mz)
}

/// m/z of the [-1, 0, +1, +2] isotopologues of a precursor.
pub fn precursor_isotope_mzs(mono_mz: f64, charge: u8) -> [f64; 4] {
    let neutron_fraction = NEUTRON_MASS / charge as f64;
    PRECURSOR_ISOTOPE_OFFSETS.map(|isotope| mono_mz + (neutron_fraction * isotope as f64))
}

/// Keeps the fragments that are in range and intense enough.
///
/// The intensity cutoff is relative to the most intense fragment in the map,
/// including fragments that are out of the m/z range.
pub fn filter_fragments(ions: &FragmentIonMap) -> FragmentIonMap {
    let max_intensity = ions
        .values()
        .map(|(_mz, intensity)| *intensity)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_keep = max_intensity * RELATIVE_FRAGMENT_INTENSITY_CUTOFF;

    ions.iter()
        .filter(|(_k, (mz, intensity))| {
            (*mz > FRAGMENT_MZ_RANGE.0) && (*intensity > max_keep) && (*mz < FRAGMENT_MZ_RANGE.1)
        })
        .map(|(k, v)| (k.clone(), *v))
        .collect()
}

/// Why an otherwise valid peptide did not make it into the library.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectionReason {
    PrecursorMzOutOfRange { mz: f64 },
    TooFewFragments { num_fragments: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Accepted(SpeclibEntry),
    Rejected(RejectionReason),
}

impl EntryOutcome {
    pub fn accepted(self) -> Option<SpeclibEntry> {
        match self {
            EntryOutcome::Accepted(x) => Some(x),
            EntryOutcome::Rejected(_) => None,
        }
    }
}

/// Builds the library entry for a predicted peptide.
///
/// Rejections are normal outcomes, the only error is a formula that
/// cannot produce an isotope envelope.
pub fn as_entry(
    peptide: &PredictedPeptide,
    ions: &FragmentIonMap,
    decoy: bool,
    id: u64,
) -> Result<EntryOutcome, FormulaError> {
    let charge = peptide.charge;
    let mono_mz = precursor_mz(peptide.formula.monoisotopic_mass(), charge);
    if !in_precursor_window(mono_mz) {
        return Ok(EntryOutcome::Rejected(
            RejectionReason::PrecursorMzOutOfRange { mz: mono_mz },
        ));
    }

    let isotope_dist = peptide_formula_dist(&peptide.formula)?;
    let ims = supersimpleprediction(mono_mz, charge);
    let precursor_mzs = precursor_isotope_mzs(mono_mz, charge);

    let kept = filter_fragments(ions);
    if kept.len() < MIN_FRAGMENTS {
        return Ok(EntryOutcome::Rejected(RejectionReason::TooFewFragments {
            num_fragments: kept.len(),
        }));
    }

    let ion_mzs: FragmentValues = kept.iter().map(|(k, v)| (k.clone(), v.0)).collect();
    let ion_intensities: FragmentValues = kept.into_iter().map(|(k, v)| (k, v.1)).collect();

    let precursor = PrecursorEntry::new(peptide.sequence.clone(), charge, decoy);
    let elution_group = ElutionGroup {
        id,
        precursor_mzs,
        fragment_mzs: ion_mzs,
        precursor_charge: charge,
        mobility: ims,
        rt_seconds: 0.0,
        decoy,
        expected_precursor_intensity: [
            MINUS_ONE_ISOTOPE_INTENSITY,
            isotope_dist[0],
            isotope_dist[1],
            isotope_dist[2],
        ],
        expected_fragment_intensity: ion_intensities,
    };
    Ok(EntryOutcome::Accepted(SpeclibEntry::new(
        precursor,
        elution_group,
    )))
}
