use crate::formula::ElementalFormula;
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;

/// Fragment label ("b3", "y4^2" ...) to (m/z, intensity).
pub type FragmentIonMap = BTreeMap<String, (f64, f64)>;

/// The peptide as understood by the predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedPeptide {
    pub sequence: String,
    pub charge: u8,
    pub formula: ElementalFormula,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictedIons {
    pub peptide: PredictedPeptide,
    pub ions: FragmentIonMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionOptions {
    pub min_intensity: f64,
    pub min_ordinal: u16,
    pub max_ordinal: u16,
}

impl Default for PredictionOptions {
    fn default() -> Self {
        Self {
            min_intensity: 0.001,
            min_ordinal: 3,
            max_ordinal: 1000,
        }
    }
}
