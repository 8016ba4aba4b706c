use super::predicted_ions::{
    FragmentIonMap,
    PredictedIons,
    PredictedPeptide,
    PredictionOptions,
};
use crate::errors::PredictionError;
use crate::formula::{
    ElementalFormula,
    parse_linear_peptide,
};
use crate::models::PeptideCharge;
use crate::traits::FragmentPredictor;
use rayon::prelude::*;
use rustyms::annotation::model::PrimaryIonSeries;
use rustyms::fragment::FragmentKind;
use rustyms::prelude::{
    Fragment,
    FragmentationModel,
    MassMode,
};
use rustyms::system::{
    e,
    isize::Charge,
};

fn by_ion_model() -> FragmentationModel {
    FragmentationModel::none()
        .clone()
        .b(PrimaryIonSeries::default())
        .y(PrimaryIonSeries::default())
}

/// Rule based stand-in for a learned fragment intensity model.
///
/// Generates the b and y series with rustyms, so anything ProForma can
/// express (fixed or variable modifications included) gets fragmented.
/// Intensities are flat per series (y ions over b ions) and get split over
/// the fragment charge, which is enough to get a usable library when no
/// model is around.
#[derive(Debug, Clone)]
pub struct TheoreticalFragmentPredictor {
    pub model: FragmentationModel,
    pub max_fragment_charge: u8,
}

impl Default for TheoreticalFragmentPredictor {
    fn default() -> Self {
        Self::new(2)
    }
}

impl TheoreticalFragmentPredictor {
    pub fn new(max_fragment_charge: u8) -> Self {
        Self {
            model: by_ion_model(),
            max_fragment_charge,
        }
    }

    pub fn predict_one(
        &self,
        item: &PeptideCharge,
        options: &PredictionOptions,
    ) -> Result<PredictedIons, PredictionError> {
        if item.charge == 0 {
            return Err(PredictionError::InvalidCharge {
                sequence: item.sequence.clone(),
                charge: item.charge,
            });
        }

        let peptide = parse_linear_peptide(&item.sequence)?;
        let formula = ElementalFormula::from_peptide(&item.sequence, &peptide)?;

        let max_charge = self.max_fragment_charge.min(item.charge).max(1);
        let fragments = peptide
            .generate_theoretical_fragments(Charge::new::<e>(max_charge as isize), &self.model);
        let ions = fragment_ion_map(&fragments, max_charge, peptide.len(), options);

        Ok(PredictedIons {
            peptide: PredictedPeptide {
                sequence: item.sequence.clone(),
                charge: item.charge,
                formula,
            },
            ions,
        })
    }
}

fn fragment_label(series: char, ordinal: usize, charge: u8) -> String {
    if charge == 1 {
        format!("{}{}", series, ordinal)
    } else {
        format!("{}{}^{}", series, ordinal, charge)
    }
}

/// Keeps the plain b/y ions within the ordinal limits.
fn fragment_ion_map(
    fragments: &[Fragment],
    max_charge: u8,
    num_residues: usize,
    options: &PredictionOptions,
) -> FragmentIonMap {
    let min_ordinal = (options.min_ordinal as usize).max(1);
    let max_ordinal = (options.max_ordinal as usize).min(num_residues.saturating_sub(1));

    let mut out = FragmentIonMap::new();
    for fragment in fragments {
        let (series, base_intensity) = match fragment.ion.kind() {
            FragmentKind::y => ('y', 1.0),
            FragmentKind::b => ('b', 0.5),
            _ => continue,
        };
        if !fragment.neutral_loss.is_empty() {
            continue;
        }
        let Some(ordinal) = fragment.ion.position().map(|x| x.series_number) else {
            continue;
        };
        if ordinal < min_ordinal || ordinal > max_ordinal {
            continue;
        }
        let charge = fragment.charge.value as i64;
        if charge < 1 || charge > max_charge as i64 {
            continue;
        }
        let intensity = base_intensity / charge as f64;
        if intensity < options.min_intensity {
            continue;
        }
        let Some(mz) = fragment.mz(MassMode::Monoisotopic) else {
            continue;
        };
        out.insert(
            fragment_label(series, ordinal, charge as u8),
            (mz.value, intensity),
        );
    }
    out
}

impl FragmentPredictor for TheoreticalFragmentPredictor {
    fn predict_batch(
        &self,
        batch: &[PeptideCharge],
        options: &PredictionOptions,
    ) -> Vec<Result<PredictedIons, PredictionError>> {
        batch
            .par_iter()
            .map(|item| self.predict_one(item, options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FormulaError;
    use crate::utils::constants::PROTON_MASS;

    #[test]
    fn test_fragment_mzs() {
        let predictor = TheoreticalFragmentPredictor::default();
        let out = predictor
            .predict_one(
                &PeptideCharge::new("PEPTIDEPINK", 2),
                &PredictionOptions::default(),
            )
            .unwrap();

        // Ordinals 3..=10, b and y, charges 1 and 2
        assert_eq!(out.ions.len(), 32);
        assert!(!out.ions.contains_key("b2"));
        assert!(!out.ions.contains_key("y11"));

        let (y3_mz, y3_int) = out.ions["y3"];
        assert!((y3_mz - 374.2398).abs() < 1e-3, "y3 m/z: {}", y3_mz);
        assert_eq!(y3_int, 1.0);

        let (b3_mz, b3_int) = out.ions["b3"];
        assert!((b3_mz - 324.1554).abs() < 1e-3, "b3 m/z: {}", b3_mz);
        assert_eq!(b3_int, 0.5);

        let (y3_2_mz, y3_2_int) = out.ions["y3^2"];
        assert!((y3_2_mz - (y3_mz + PROTON_MASS) / 2.0).abs() < 1e-6);
        assert_eq!(y3_2_int, 0.5);

        assert_eq!(out.peptide.charge, 2);
        assert_eq!(out.peptide.formula.count("C"), 55);
    }

    #[test]
    fn test_fragment_charge_limited_by_precursor() {
        let predictor = TheoreticalFragmentPredictor::new(3);
        let out = predictor
            .predict_one(&PeptideCharge::new("PEPTIDEK", 1), &PredictionOptions::default())
            .unwrap();
        assert!(out.ions.keys().all(|k| !k.contains('^')));
    }

    #[test]
    fn test_ordinal_and_intensity_options() {
        let predictor = TheoreticalFragmentPredictor::default();
        let options = PredictionOptions {
            min_intensity: 0.6,
            min_ordinal: 2,
            max_ordinal: 4,
        };
        let out = predictor
            .predict_one(&PeptideCharge::new("PEPTIDEPINK", 2), &options)
            .unwrap();
        let mut keys: Vec<&String> = out.ions.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["y2", "y3", "y4"]);
    }

    #[test]
    fn test_bad_inputs() {
        let predictor = TheoreticalFragmentPredictor::default();
        let opts = PredictionOptions::default();
        let res = predictor.predict_one(&PeptideCharge::new("PEP[TIDEK", 2), &opts);
        assert!(matches!(
            res,
            Err(PredictionError::Formula(FormulaError::Unparseable { .. }))
        ));
        let res = predictor.predict_one(&PeptideCharge::new("PEPTIDEK", 0), &opts);
        assert!(matches!(res, Err(PredictionError::InvalidCharge { .. })));
    }

    #[test]
    fn test_modified_peptide() {
        let predictor = TheoreticalFragmentPredictor::default();
        let opts = PredictionOptions::default();
        let plain = predictor
            .predict_one(&PeptideCharge::new("PEPTMIDEK", 2), &opts)
            .unwrap();
        let oxidized = predictor
            .predict_one(&PeptideCharge::new("PEPTM[Oxidation]IDEK", 2), &opts)
            .unwrap();
        assert_eq!(
            plain.ions.keys().collect::<Vec<_>>(),
            oxidized.ions.keys().collect::<Vec<_>>()
        );

        // b4 is PEPT, y5 is MIDEK
        assert!((plain.ions["b4"].0 - oxidized.ions["b4"].0).abs() < 1e-9);
        let delta = oxidized.ions["y5"].0 - plain.ions["y5"].0;
        assert!((delta - 15.9949).abs() < 1e-3, "y5 delta: {}", delta);
        assert_eq!(
            oxidized.peptide.formula.count("O"),
            plain.peptide.formula.count("O") + 1
        );
    }

    #[test]
    fn test_batch_keeps_order() {
        let predictor = TheoreticalFragmentPredictor::default();
        let batch: Vec<PeptideCharge> = ["PEPTIDEK", "LESLIEK", "PEP[TIDEK", "AAAAAAAK"]
            .iter()
            .flat_map(|s| [PeptideCharge::new(*s, 2), PeptideCharge::new(*s, 3)])
            .collect();
        let out = predictor.predict_batch(&batch, &PredictionOptions::default());
        assert_eq!(out.len(), batch.len());
        for (res, item) in out.iter().zip(batch.iter()) {
            match res {
                Ok(x) => {
                    assert_eq!(x.peptide.sequence, item.sequence);
                    assert_eq!(x.peptide.charge, item.charge);
                }
                Err(_) => assert_eq!(item.sequence, "PEP[TIDEK"),
            }
        }
    }
}
