use serde::Serialize;

/// The different labels that denote if a sequence is a decoy or not.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub enum DecoyMarking {
    Target,
    Decoy,
}

impl DecoyMarking {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecoyMarking::Target => "Target",
            DecoyMarking::Decoy => "Decoy",
        }
    }

    pub fn is_decoy(&self) -> bool {
        match self {
            DecoyMarking::Target => false,
            DecoyMarking::Decoy => true,
        }
    }

    pub fn is_target(&self) -> bool {
        !self.is_decoy()
    }
}

impl From<bool> for DecoyMarking {
    fn from(decoy: bool) -> Self {
        if decoy {
            DecoyMarking::Decoy
        } else {
            DecoyMarking::Target
        }
    }
}

/// Converts a sequence into its decoy form.
///
/// The first and last residues stay in place and everything in between is
/// reversed, so tryptic termini are preserved.
/// Sequences shorter than 3 residues have no interior and are returned as-is.
///
/// ```
/// use timsseek_speclib::models::as_decoy_string;
/// assert_eq!(as_decoy_string("PEPTIDEPINK"), "PNIPEDITPEK");
/// ```
pub fn as_decoy_string(sequence: &str) -> String {
    let residues: Vec<char> = sequence.chars().collect();
    if residues.len() < 3 {
        return sequence.to_string();
    }
    let last = residues.len() - 1;

    let mut out = String::with_capacity(sequence.len());
    out.push(residues[0]);
    out.extend(residues[1..last].iter().rev());
    out.push(residues[last]);
    out
}
