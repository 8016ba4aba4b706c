use serde::{
    Deserialize,
    Serialize,
};
use std::ops::RangeInclusive;

/// A peptide sequence paired with a precursor charge state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeptideCharge {
    pub sequence: String,
    pub charge: u8,
}

impl PeptideCharge {
    pub fn new(sequence: impl Into<String>, charge: u8) -> Self {
        Self {
            sequence: sequence.into(),
            charge,
        }
    }
}

/// Every (peptide, charge) pair over an inclusive charge range.
///
/// Pairs are yielded peptide-major, in the order the peptides are given.
///
/// ```
/// use timsseek_speclib::models::expand_charges;
/// let peps = vec!["PEPTIDEK".to_string(), "LESLIEK".to_string()];
/// let out: Vec<_> = expand_charges(&peps, 2..=3).collect();
/// assert_eq!(out.len(), 4);
/// assert_eq!(out[1].sequence, "PEPTIDEK");
/// assert_eq!(out[1].charge, 3);
/// ```
pub fn expand_charges<'a, S: AsRef<str>>(
    peptides: &'a [S],
    charges: RangeInclusive<u8>,
) -> impl Iterator<Item = PeptideCharge> + 'a {
    peptides.iter().flat_map(move |peptide| {
        charges
            .clone()
            .map(move |charge| PeptideCharge::new(peptide.as_ref(), charge))
    })
}
