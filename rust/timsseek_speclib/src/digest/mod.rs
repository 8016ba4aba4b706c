pub mod digestion;

pub use digestion::{
    CleaveSide,
    Digester,
    Enzyme,
    MIN_PEPTIDE_LENGTH,
};
