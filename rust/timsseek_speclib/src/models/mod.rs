mod decoy;
mod digest;
mod peptide_charge;
mod speclib_entry;

pub use decoy::{
    DecoyMarking,
    as_decoy_string,
};
pub use digest::{
    DigestSlice,
    unique_sequences,
};
pub use peptide_charge::{
    PeptideCharge,
    expand_charges,
};
pub use speclib_entry::{
    ElutionGroup,
    FragmentValues,
    PrecursorEntry,
    SpeclibEntry,
};
