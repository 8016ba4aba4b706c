pub mod elution_group_converter;
pub mod fragment_mass_builder;
mod predicted_ions;

pub use elution_group_converter::{
    EntryOutcome,
    RejectionReason,
    as_entry,
};
pub use fragment_mass_builder::TheoreticalFragmentPredictor;
pub use predicted_ions::{
    FragmentIonMap,
    PredictedIons,
    PredictedPeptide,
    PredictionOptions,
};
