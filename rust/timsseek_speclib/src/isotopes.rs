//! Approximate isotope envelopes for peptide precursors.
//!
//! Every distribution here is truncated to 4 terms, index `k` being the
//! abundance of the isotopologue `k` neutrons heavier than the monoisotopic
//! one. Only carbon and sulfur are modeled, the rest of the elements
//! in a peptide contribute very little to the envelope.
use crate::errors::FormulaError;
use crate::formula::ElementalFormula;
use crate::utils::constants::{
    C13_ABUNDANCE,
    S33_ABUNDANCE,
    S34_ABUNDANCE,
};

pub type ElementIsotopeVector = [f64; 4];
pub type IsotopeEnvelope = [f64; 3];

const FACTORIALS: [f64; 4] = [1.0, 1.0, 2.0, 6.0];

/// Truncated product of two 4-term polynomials.
///
/// Terms above the 4th are dropped, not folded back in.
///
/// ```
/// use timsseek_speclib::isotopes::convolve;
/// let out = convolve(&[0.5, 0.5, 0.0, 0.0], &[0.5, 0.5, 0.0, 0.0]);
/// assert_eq!(out, [0.25, 0.5, 0.25, 0.0]);
/// ```
pub fn convolve(a: &ElementIsotopeVector, b: &ElementIsotopeVector) -> ElementIsotopeVector {
    [
        a[0] * b[0],
        a[0] * b[1] + a[1] * b[0],
        a[0] * b[2] + a[1] * b[1] + a[2] * b[0],
        a[0] * b[3] + a[1] * b[2] + a[2] * b[1] + a[3] * b[0],
    ]
}

fn poisson_terms(lambda: f64) -> ElementIsotopeVector {
    let exp_neg = (-lambda).exp();
    let mut out = [0.0; 4];
    for (k, val) in out.iter_mut().enumerate() {
        *val = lambda.powi(k as i32) * exp_neg / FACTORIALS[k];
    }
    out
}

/// 13C incorporation modeled as a poisson process.
pub fn carbon_isotopes(count: u16) -> ElementIsotopeVector {
    poisson_terms(count as f64 * C13_ABUNDANCE)
}

/// Sulfur contributes a +1 channel (33S) and a +2 channel (34S).
///
/// The +2 channel only populates even offsets.
pub fn sulfur_isotopes(count: u16) -> ElementIsotopeVector {
    let lambda33 = count as f64 * S33_ABUNDANCE;
    let lambda34 = count as f64 * S34_ABUNDANCE;
    let exp_neg34 = (-lambda34).exp();

    let s33 = poisson_terms(lambda33);
    let s34 = [exp_neg34, 0.0, lambda34 * exp_neg34, 0.0];

    convolve(&s33, &s34)
}

/// Normalized [M, M+1, M+2] intensities for a peptide.
///
/// The max of the returned terms is always exactly 1.0.
pub fn peptide_isotopes(carbons: u16, sulfurs: u16) -> IsotopeEnvelope {
    let c = carbon_isotopes(carbons);
    let s = sulfur_isotopes(sulfurs);
    let result = convolve(&c, &s);
    let max_val = result[..3].iter().copied().fold(f64::MIN, f64::max);

    [result[0] / max_val, result[1] / max_val, result[2] / max_val]
}

/// Isotope envelope from the carbon and sulfur content of a formula.
pub fn peptide_formula_dist(formula: &ElementalFormula) -> Result<IsotopeEnvelope, FormulaError> {
    let (ncarbon, nsulphur) = formula.count_carbon_sulphur();
    if ncarbon == 0 {
        return Err(FormulaError::NoCarbons);
    }

    Ok(peptide_isotopes(ncarbon, nsulphur))
}
