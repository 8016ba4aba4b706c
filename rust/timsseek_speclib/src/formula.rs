use crate::errors::FormulaError;
use rustyms::prelude::{
    MolecularFormula,
    Peptidoform,
};
use rustyms::sequence::Linear;
use std::collections::HashMap;
use std::fmt::Display;

/// Elemental composition of a neutral peptide.
///
/// Atom counts are keyed by element symbol ("C", "S", "Se", ...). Only
/// natural-abundance atoms are counted, isotopically labeled atoms
/// in the source formula are left out of the counts (but not the mass).
#[derive(Debug, Clone, PartialEq)]
pub struct ElementalFormula {
    counts: HashMap<String, u16>,
    monoisotopic_mass: f64,
}

impl ElementalFormula {
    pub fn new(counts: HashMap<String, u16>, monoisotopic_mass: f64) -> Self {
        Self {
            counts,
            monoisotopic_mass,
        }
    }

    /// Parses a ProForma sequence and extracts its (single) formula.
    ///
    /// Example:
    /// ```
    /// use timsseek_speclib::formula::ElementalFormula;
    /// let form = ElementalFormula::from_proforma("PEPTIDE").unwrap();
    /// assert_eq!(form.count("C"), 34);
    /// assert!((form.monoisotopic_mass() - 799.35997).abs() < 0.001);
    /// ```
    pub fn from_proforma(sequence: &str) -> Result<Self, FormulaError> {
        let peptide = parse_linear_peptide(sequence)?;
        Self::from_peptide(sequence, &peptide)
    }

    /// Formula of an already parsed peptide, `sequence` is only used for errors.
    pub fn from_peptide(
        sequence: &str,
        peptide: &Peptidoform<Linear>,
    ) -> Result<Self, FormulaError> {
        let pep_formulas = peptide.formulas();
        if pep_formulas.len() != 1 {
            return Err(FormulaError::AmbiguousFormula {
                sequence: sequence.to_string(),
                num_formulas: pep_formulas.len(),
            });
        }
        Ok(Self::from_molecular_formula(&pep_formulas[0]))
    }

    fn from_molecular_formula(form: &MolecularFormula) -> Self {
        let mut counts: HashMap<String, u16> = HashMap::new();
        for (elem, isotope, count) in form.elements() {
            if isotope.is_some() || *count <= 0 {
                continue;
            }
            // Counts past u16::MAX only matter for the envelope, which is flat by then.
            let count = u16::try_from(*count).unwrap_or(u16::MAX);
            let entry = counts.entry(elem.to_string()).or_insert(0);
            *entry = entry.saturating_add(count);
        }

        Self {
            counts,
            monoisotopic_mass: form.monoisotopic_mass().value,
        }
    }

    pub fn count(&self, symbol: &str) -> u16 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    pub fn count_carbon_sulphur(&self) -> (u16, u16) {
        (self.count("C"), self.count("S"))
    }

    pub fn monoisotopic_mass(&self) -> f64 {
        self.monoisotopic_mass
    }
}

/// Parses a ProForma sequence that has to describe a single linear peptide.
pub fn parse_linear_peptide(sequence: &str) -> Result<Peptidoform<Linear>, FormulaError> {
    let peptide = Peptidoform::pro_forma(sequence, None).map_err(|e| FormulaError::Unparseable {
        sequence: sequence.to_string(),
        msg: format!("{:?}", e),
    })?;
    peptide
        .into_linear()
        .ok_or_else(|| FormulaError::NotLinear {
            sequence: sequence.to_string(),
        })
}

impl Display for ElementalFormula {
    /// Hill notation: carbon, hydrogen, then the rest alphabetically.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut symbols: Vec<&String> = self
            .counts
            .keys()
            .filter(|k| self.counts[*k] > 0)
            .collect();
        symbols.sort_by_key(|s| match s.as_str() {
            "C" => (0, String::new()),
            "H" => (1, String::new()),
            other => (2, other.to_string()),
        });
        for symbol in symbols {
            match self.counts[symbol] {
                1 => write!(f, "{}", symbol)?,
                n => write!(f, "{}{}", symbol, n)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_lookup() {
        let form = ElementalFormula::new(
            HashMap::from([
                ("C".to_string(), 34),
                ("H".to_string(), 53),
                ("N".to_string(), 7),
                ("O".to_string(), 15),
            ]),
            799.35997,
        );
        assert_eq!(form.count_carbon_sulphur(), (34, 0));
        assert_eq!(form.count("Se"), 0);
        assert_eq!(form.to_string(), "C34H53N7O15");
    }

    #[test]
    fn test_from_proforma() {
        let form = ElementalFormula::from_proforma("PEPTIDE").unwrap();
        assert_eq!(form.count_carbon_sulphur(), (34, 0));
        assert_eq!(form.count("N"), 7);
        assert!((form.monoisotopic_mass() - 799.35997).abs() < 0.001);

        let with_met = ElementalFormula::from_proforma("PEPTMIDEK").unwrap();
        assert_eq!(with_met.count("S"), 1);
    }

    #[test]
    fn test_from_proforma_modified() {
        let plain = ElementalFormula::from_proforma("PEPTMIDEK").unwrap();
        let oxidized = ElementalFormula::from_proforma("PEPTM[Oxidation]IDEK").unwrap();
        assert_eq!(oxidized.count("O"), plain.count("O") + 1);
        let delta = oxidized.monoisotopic_mass() - plain.monoisotopic_mass();
        assert!((delta - 15.9949).abs() < 1e-3, "delta: {}", delta);
    }

    #[test]
    fn test_counts_saturate() {
        // 11 carbons per tryptophan, more than u16 can hold
        let sequence = "W".repeat(6000);
        let form = ElementalFormula::from_proforma(&sequence).unwrap();
        assert_eq!(form.count("C"), u16::MAX);
        assert!(form.count("N") < u16::MAX);
    }

    #[test]
    fn test_from_proforma_garbage() {
        let out = ElementalFormula::from_proforma("PEP[TIDE");
        assert!(matches!(out, Err(FormulaError::Unparseable { .. })));
    }
}
