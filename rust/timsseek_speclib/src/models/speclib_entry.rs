use super::decoy::DecoyMarking;
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;

/// Label to value mapping for the fragments of an elution group.
///
/// Ordered by label so that the serialized library is stable across runs.
pub type FragmentValues = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecursorEntry {
    sequence: String,
    charge: u8,
    decoy: bool,
}

impl PrecursorEntry {
    pub fn new(sequence: String, charge: u8, decoy: bool) -> Self {
        Self {
            sequence,
            charge,
            decoy,
        }
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn charge(&self) -> u8 {
        self.charge
    }

    pub fn is_decoy(&self) -> bool {
        self.decoy
    }

    pub fn decoy_marking(&self) -> DecoyMarking {
        DecoyMarking::from(self.decoy)
    }
}

/// A single precursor ion and the fragments expected from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElutionGroup {
    pub id: u64,
    /// Isotopologue m/z values for the [-1, 0, +1, +2] neutron offsets.
    pub precursor_mzs: [f64; 4],
    pub fragment_mzs: FragmentValues,
    pub precursor_charge: u8,
    pub mobility: f64,
    pub rt_seconds: f32,
    pub decoy: bool,
    pub expected_precursor_intensity: [f64; 4],
    pub expected_fragment_intensity: FragmentValues,
}

/// One record of the spectral library.
///
/// Built once by [`crate::fragment_mass::elution_group_converter::as_entry`]
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeclibEntry {
    precursor: PrecursorEntry,
    elution_group: ElutionGroup,
}

impl SpeclibEntry {
    pub(crate) fn new(precursor: PrecursorEntry, elution_group: ElutionGroup) -> Self {
        Self {
            precursor,
            elution_group,
        }
    }

    pub fn precursor(&self) -> &PrecursorEntry {
        &self.precursor
    }

    pub fn elution_group(&self) -> &ElutionGroup {
        &self.elution_group
    }

    pub fn id(&self) -> u64 {
        self.elution_group.id
    }

    pub fn is_decoy(&self) -> bool {
        self.precursor.decoy
    }

    pub fn num_fragments(&self) -> usize {
        self.elution_group.fragment_mzs.len()
    }

    pub fn sample() -> Self {
        let fragment_mzs = BTreeMap::from([
            ("y3".to_string(), 375.2238),
            ("y4".to_string(), 488.3079),
            ("y5".to_string(), 585.3606),
        ]);
        let expected_fragment_intensity = BTreeMap::from([
            ("y3".to_string(), 1.0),
            ("y4".to_string(), 0.8),
            ("y5".to_string(), 0.6),
        ]);
        Self {
            precursor: PrecursorEntry::new("PEPTIDEPINK".to_string(), 2, false),
            elution_group: ElutionGroup {
                id: 1,
                precursor_mzs: [627.3136, 627.8179, 628.3223, 628.8266],
                fragment_mzs,
                precursor_charge: 2,
                mobility: 0.95,
                rt_seconds: 0.0,
                decoy: false,
                expected_precursor_intensity: [0.001, 1.0, 0.65, 0.25],
                expected_fragment_intensity,
            },
        }
    }
}
