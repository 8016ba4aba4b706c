use std::collections::HashMap;
use timsseek_speclib::digest::Digester;
use timsseek_speclib::fragment_mass::{
    FragmentIonMap,
    PredictedIons,
    PredictedPeptide,
};
use timsseek_speclib::protein::ProteinDatabase;
use timsseek_speclib::utils::constants::PROTON_MASS;
use timsseek_speclib::{
    ElementalFormula,
    FormulaError,
    FragmentPredictor,
    PeptideCharge,
    PredictionError,
    PredictionOptions,
    SpeclibBuilder,
    SpeclibEntry,
    SpeclibWriter,
    TheoreticalFragmentPredictor,
    read_speclib,
};

/// Predictor whose behavior depends on the last residue, which decoys keep.
///
/// K: good entry at m/z 500, X: prediction failure, C: no carbons,
/// M: precursor out of range, F: too few fragments.
struct MockPredictor;

impl MockPredictor {
    fn predict_one(&self, pair: &PeptideCharge) -> Result<PredictedIons, PredictionError> {
        let last = pair.sequence.chars().last().unwrap_or('K');
        if last == 'X' {
            return Err(PredictionError::Formula(FormulaError::Unparseable {
                sequence: pair.sequence.clone(),
                msg: "unknown residue X".to_string(),
            }));
        }
        let mz = if last == 'M' { 1500.0 } else { 500.0 };
        let charge = pair.charge as f64;
        let mass = (mz * charge) - (PROTON_MASS * charge);
        let carbons = if last == 'C' { 0 } else { 25 };
        let formula = ElementalFormula::new(
            HashMap::from([
                ("C".to_string(), carbons),
                ("H".to_string(), 40),
                ("N".to_string(), 7),
                ("O".to_string(), 9),
            ]),
            mass,
        );

        let mut ions: FragmentIonMap = FragmentIonMap::new();
        ions.insert("y3".to_string(), (400.0, 1.0));
        ions.insert("y4".to_string(), (500.0, 0.8));
        if last != 'F' {
            ions.insert("y5".to_string(), (600.0, 0.5));
        }
        // Too faint to survive.
        ions.insert("b3".to_string(), (350.0, 0.01));

        Ok(PredictedIons {
            peptide: PredictedPeptide {
                sequence: pair.sequence.clone(),
                charge: pair.charge,
                formula,
            },
            ions,
        })
    }
}

impl FragmentPredictor for MockPredictor {
    fn predict_batch(
        &self,
        batch: &[PeptideCharge],
        _options: &PredictionOptions,
    ) -> Vec<Result<PredictedIons, PredictionError>> {
        batch.iter().map(|x| self.predict_one(x)).collect()
    }
}

fn to_strings(x: &[&str]) -> Vec<String> {
    x.iter().map(|x| x.to_string()).collect()
}

fn collect_entries<P: FragmentPredictor>(
    builder: &SpeclibBuilder<'_, P>,
    peptides: &[String],
) -> (Vec<SpeclibEntry>, timsseek_speclib::BuildStats) {
    let mut out = Vec::new();
    let stats = builder
        .build(
            peptides,
            |entry| {
                out.push(entry);
                Ok(())
            },
            |_, _| {},
        )
        .unwrap();
    (out, stats)
}

#[test]
fn test_ids_are_gapless_across_failures() {
    let peptides = to_strings(&["AAAK", "AAAX", "ABCK", "AAAC", "AAAM", "AAAF", "AAGK"]);
    let predictor = MockPredictor;
    let builder = SpeclibBuilder::new(&predictor)
        .with_charges(2, 2)
        .with_chunk_size(3);
    let (entries, stats) = collect_entries(&builder, &peptides);

    assert_eq!(stats.targets.candidates, 7);
    assert_eq!(stats.targets.accepted, 3);
    assert_eq!(stats.targets.prediction_errors, 1);
    assert_eq!(stats.targets.formula_errors, 1);
    assert_eq!(stats.targets.rejected_mz, 1);
    assert_eq!(stats.targets.rejected_fragments, 1);
    assert_eq!(stats.targets.num_skipped(), 4);
    assert_eq!(stats.decoys, stats.targets);

    let ids: Vec<u64> = entries.iter().map(|x| x.id()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

    let seqs: Vec<&str> = entries.iter().map(|x| x.precursor().sequence()).collect();
    assert_eq!(
        seqs,
        vec!["AAAK", "ABCK", "AAGK", "AAAK", "ACBK", "AGAK"]
    );
    assert!(entries[..3].iter().all(|x| !x.is_decoy()));
    assert!(entries[3..].iter().all(|x| x.is_decoy()));
    assert!(
        entries
            .iter()
            .all(|x| x.is_decoy() == x.elution_group().decoy)
    );
}

#[test]
fn test_entry_contents() {
    let peptides = to_strings(&["AAAK"]);
    let predictor = MockPredictor;
    let builder = SpeclibBuilder::new(&predictor).with_charges(2, 3);
    let (entries, _stats) = collect_entries(&builder, &peptides);
    assert_eq!(entries.len(), 4);

    let charges: Vec<u8> = entries.iter().map(|x| x.precursor().charge()).collect();
    assert_eq!(charges, vec![2, 3, 2, 3]);

    let eg = entries[0].elution_group();
    assert!((eg.precursor_mzs[1] - 500.0).abs() < 1e-9);
    assert!((eg.precursor_mzs[0] - (500.0 - 1.008664916 / 2.0)).abs() < 1e-9);
    assert_eq!(eg.expected_precursor_intensity[0], 0.001);
    assert_eq!(eg.rt_seconds, 0.0);
    assert_eq!(
        eg.fragment_mzs.keys().collect::<Vec<_>>(),
        vec!["y3", "y4", "y5"]
    );
    let max_env = eg.expected_precursor_intensity[1..]
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(max_env, 1.0);
}

#[test]
fn test_fasta_to_library_file() {
    let proteins = ProteinDatabase::from_fasta_str(
        ">sp|P1|TEST\nPEPTIDEPINKELVISLIVESKLESLIEKQQQR\n",
    );
    let peptides = Digester::default().unique_peptides(&proteins);
    assert!(peptides.contains(&"PEPTIDEPINK".to_string()));

    let predictor = TheoreticalFragmentPredictor::default();
    let builder = SpeclibBuilder::new(&predictor);

    let path = std::env::temp_dir().join(format!(
        "timsseek_speclib_it_{}.ndjson.zst",
        std::process::id()
    ));
    let mut writer = SpeclibWriter::create(&path, 2).unwrap();
    let stats = builder
        .build(&peptides, |entry| writer.write_entry(&entry), |_, _| {})
        .unwrap();
    let num_written = writer.finish().unwrap();
    assert_eq!(num_written, stats.num_accepted());
    assert!(stats.targets.accepted > 0);

    let back = read_speclib(&path).unwrap();
    assert_eq!(back.len(), num_written);
    let ids: Vec<u64> = back.iter().map(|x| x.id()).collect();
    let expect: Vec<u64> = (1..=num_written as u64).collect();
    assert_eq!(ids, expect);

    let pretty_path = timsseek_speclib::data_sources::pretty_path(&path);
    let pretty = std::fs::read_to_string(&pretty_path).unwrap();
    let preview: Vec<SpeclibEntry> = serde_json::from_str(&pretty).unwrap();
    assert!(preview.len() <= 4);
    assert_eq!(preview[0], back[0]);

    std::fs::remove_file(&path).unwrap();
    std::fs::remove_file(&pretty_path).unwrap();
}
