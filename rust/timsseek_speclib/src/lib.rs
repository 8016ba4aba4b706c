pub mod data_sources;
pub mod digest;
pub mod errors;
pub mod formula;
pub mod fragment_mass;
pub mod isotopes;
pub mod models;
pub mod protein;
pub mod speclib_builder;
pub mod traits;
pub mod utils;

pub use data_sources::{
    SpeclibReader,
    SpeclibWriter,
    read_speclib,
};
pub use errors::{
    FormulaError,
    PredictionError,
    SpeclibBuildError,
};
pub use formula::ElementalFormula;
pub use fragment_mass::{
    PredictionOptions,
    TheoreticalFragmentPredictor,
};
pub use models::{
    ElutionGroup,
    PeptideCharge,
    PrecursorEntry,
    SpeclibEntry,
};
pub use speclib_builder::{
    BuildPhase,
    BuildStats,
    PhaseStats,
    SpeclibBuilder,
};
pub use traits::FragmentPredictor;
