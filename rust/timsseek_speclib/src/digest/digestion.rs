use crate::models::{
    DigestSlice,
    unique_sequences,
};
use crate::protein::ProteinDatabase;
use rayon::prelude::*;
use regex::Regex;
use std::sync::Arc;
use tracing::{
    info,
    warn,
};

/// Shortest peptide a library can hold, decoys need at least this much to be distinct.
pub const MIN_PEPTIDE_LENGTH: usize = 6;

const STANDARD_RESIDUES: &str = "ACDEFGHIKLMNPQRSTVWY";

fn is_standard_residue(residue: char) -> bool {
    STANDARD_RESIDUES.contains(residue)
}

/// Which side of a matched site the cut goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaveSide {
    /// C-terminal to the matched residue (trypsin).
    After,
    /// N-terminal to the matched residue (Lys-N like).
    Before,
}

#[derive(Debug, Clone)]
pub struct Enzyme {
    pub site: Regex,
    pub side: CleaveSide,
    /// No cut when the residue right after the cut is this one.
    pub blocked_by_next: Option<char>,
    /// No cut when the residue right before the cut is this one.
    pub blocked_by_previous: Option<char>,
}

impl Enzyme {
    pub fn trypsin() -> Self {
        Self {
            blocked_by_next: Some('P'),
            ..Self::trypsin_no_proline_rule()
        }
    }

    pub fn trypsin_no_proline_rule() -> Self {
        Self {
            site: Regex::new("[KR]").expect("Static regex is valid"),
            side: CleaveSide::After,
            blocked_by_next: None,
            blocked_by_previous: None,
        }
    }

    fn allows_cut(&self, sequence: &str, pos: usize) -> bool {
        // The regex crate has no lookarounds, neighbours are checked by hand.
        let blocked_next = self
            .blocked_by_next
            .is_some_and(|c| sequence[pos..].starts_with(c));
        let blocked_previous = self
            .blocked_by_previous
            .is_some_and(|c| sequence[..pos].ends_with(c));
        !(blocked_next || blocked_previous)
    }

    /// Sorted cut positions of a sequence, both termini included.
    pub fn boundaries(&self, sequence: &str) -> Vec<usize> {
        let mut out = vec![0];
        out.extend(
            self.site
                .find_iter(sequence)
                .map(|m| match self.side {
                    CleaveSide::After => m.end(),
                    CleaveSide::Before => m.start(),
                })
                .filter(|&pos| pos > 0 && pos < sequence.len())
                .filter(|&pos| self.allows_cut(sequence, pos)),
        );
        out.push(sequence.len());
        out.dedup();
        out
    }
}

/// In-silico digestion settings.
#[derive(Debug, Clone)]
pub struct Digester {
    pub enzyme: Enzyme,
    pub min_length: usize,
    pub max_length: usize,
    pub missed_cleavages: usize,
}

impl Default for Digester {
    fn default() -> Self {
        Self {
            enzyme: Enzyme::trypsin(),
            min_length: 6,
            max_length: 20,
            missed_cleavages: 0,
        }
    }
}

impl Digester {
    /// All peptides of a protein within the length limits, by start position.
    pub fn digest(&self, protein: &Arc<str>) -> Vec<DigestSlice> {
        let bounds = self.enzyme.boundaries(protein);
        let lengths = self.min_length..=self.max_length;

        let mut out = Vec::new();
        for (i, &start) in bounds.iter().enumerate() {
            let ends = bounds[i + 1..].iter().take(self.missed_cleavages + 1);
            for (missed, &end) in ends.enumerate() {
                if lengths.contains(&(end - start)) {
                    out.push(DigestSlice::new(protein.clone(), start..end, missed));
                }
            }
        }
        out
    }

    pub fn digest_all(&self, proteins: &ProteinDatabase) -> Vec<DigestSlice> {
        proteins
            .proteins
            .par_iter()
            .flat_map_iter(|protein| self.digest(&protein.sequence))
            .collect()
    }

    /// Whether a peptide passes the same length and residue checks as digestion products.
    pub fn accepts(&self, peptide: &str) -> bool {
        let length = peptide.chars().count();
        (self.min_length..=self.max_length).contains(&length)
            && peptide.chars().all(is_standard_residue)
    }

    /// Drops the peptides a digestion would not have produced.
    pub fn filter_peptides(&self, peptides: Vec<String>) -> Vec<String> {
        let num_in = peptides.len();
        let out: Vec<String> = peptides.into_iter().filter(|x| self.accepts(x)).collect();
        if out.len() < num_in {
            warn!(
                "Dropped {} of {} peptides (length outside {}..={} or non-standard residues)",
                num_in - out.len(),
                num_in,
                self.min_length,
                self.max_length
            );
        }
        out
    }

    /// Distinct peptides of a database, in first-seen order.
    ///
    /// Peptides with residues outside of the 20 standard amino acids are dropped.
    pub fn unique_peptides(&self, proteins: &ProteinDatabase) -> Vec<String> {
        let slices = self.digest_all(proteins);
        let out = unique_sequences(
            slices
                .iter()
                .filter(|x| self.accepts(x.sequence())),
        );
        info!(
            "Digested {} proteins into {} peptides ({} unique)",
            proteins.len(),
            slices.len(),
            out.len()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequences(slices: &[DigestSlice]) -> Vec<&str> {
        slices.iter().map(|x| x.sequence()).collect()
    }

    #[test]
    fn test_boundaries() {
        let trypsin = Enzyme::trypsin();
        assert_eq!(trypsin.boundaries("PEPTIKDEPINK"), vec![0, 6, 12]);
        // K before P is not a site, terminal K adds nothing
        assert_eq!(trypsin.boundaries("PEPTIKPDEPINK"), vec![0, 13]);
        assert_eq!(
            Enzyme::trypsin_no_proline_rule().boundaries("PEPTIKPDEPINK"),
            vec![0, 6, 13]
        );
        assert_eq!(trypsin.boundaries("KKR"), vec![0, 1, 2, 3]);
        assert_eq!(trypsin.boundaries(""), vec![0]);
    }

    #[test]
    fn test_digest() {
        let digester = Digester {
            min_length: 3,
            max_length: 7,
            ..Default::default()
        };
        let protein: Arc<str> = "PEPTIKDEPINK".into();
        let out = digester.digest(&protein);
        assert_eq!(sequences(&out), vec!["PEPTIK", "DEPINK"]);
        assert!(out.iter().all(|x| x.missed_cleavages() == 0));
    }

    #[test]
    fn test_digest_missed_cleavages() {
        let digester = Digester {
            min_length: 3,
            max_length: 20,
            missed_cleavages: 1,
            ..Default::default()
        };
        let protein: Arc<str> = "PEPTIKDEPINKLESLIEK".into();
        let out = digester.digest(&protein);
        assert_eq!(
            sequences(&out),
            vec![
                "PEPTIK",
                "PEPTIKDEPINK",
                "DEPINK",
                "DEPINKLESLIEK",
                "LESLIEK"
            ]
        );
        assert_eq!(out[1].missed_cleavages(), 1);
    }

    #[test]
    fn test_digest_before_site() {
        let digester = Digester {
            enzyme: Enzyme {
                side: CleaveSide::Before,
                ..Enzyme::trypsin_no_proline_rule()
            },
            min_length: 3,
            max_length: 7,
            missed_cleavages: 1,
        };
        let protein: Arc<str> = "PEPTIKDEPINK".into();
        let out = digester.digest(&protein);
        assert_eq!(sequences(&out), vec!["PEPTI", "KDEPIN", "KDEPINK"]);
    }

    #[test]
    fn test_unique_peptides() {
        let db = ProteinDatabase::from_fasta_str(
            ">p1\nPEPTIDEKLESLIEKAAXAAAKR\n>p2\nLESLIEKPEPTIDEK\n",
        );
        let peptides = Digester::default().unique_peptides(&db);
        // AAXAAAK has a non-standard residue, p2 has no cut before its P
        assert_eq!(peptides, vec!["PEPTIDEK", "LESLIEK", "LESLIEKPEPTIDEK"]);
    }

    #[test]
    fn test_filter_peptides() {
        let digester = Digester::default();
        let peptides = ["PEPTIDEK", "PEPK", "PEPTIDEXK", "LESLIEK", "A"]
            .iter()
            .map(|x| x.to_string())
            .collect();
        assert_eq!(
            digester.filter_peptides(peptides),
            vec!["PEPTIDEK", "LESLIEK"]
        );
        assert!(!digester.accepts(&"A".repeat(21)));
        assert!(digester.accepts(&"A".repeat(20)));
    }
}
