use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};
use timsseek_speclib::PredictionOptions;
use timsseek_speclib::digest::{
    Digester,
    Enzyme,
    MIN_PEPTIDE_LENGTH,
};

use crate::cli::BuildArgs;
use crate::errors::CliError;

pub const CONFIG_TEMPLATE: &str = include_str!("../templates/build_config.json");

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub digestion: DigestionConfig,
    #[serde(default)]
    pub charges: ChargeConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum InputConfig {
    #[serde(rename = "fasta")]
    Fasta { path: PathBuf },
    /// Plain text file, one peptide per line.
    #[serde(rename = "peptides")]
    Peptides { path: PathBuf },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnzymeName {
    Trypsin,
    TrypsinNoProlineRule,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DigestionConfig {
    pub min_length: usize,
    pub max_length: usize,
    pub max_missed_cleavages: usize,
    pub enzyme: EnzymeName,
}

impl Default for DigestionConfig {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 20,
            max_missed_cleavages: 0,
            enzyme: EnzymeName::Trypsin,
        }
    }
}

impl DigestionConfig {
    pub fn as_digester(&self) -> Digester {
        let enzyme = match self.enzyme {
            EnzymeName::Trypsin => Enzyme::trypsin(),
            EnzymeName::TrypsinNoProlineRule => Enzyme::trypsin_no_proline_rule(),
        };
        Digester {
            enzyme,
            min_length: self.min_length,
            max_length: self.max_length,
            missed_cleavages: self.max_missed_cleavages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ChargeConfig {
    pub min_charge: u8,
    pub max_charge: u8,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            min_charge: 2,
            max_charge: 3,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PredictionConfig {
    pub min_intensity: f64,
    pub min_ordinal: u16,
    pub max_ordinal: u16,
    pub max_fragment_charge: u8,
    pub chunk_size: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        let options = PredictionOptions::default();
        Self {
            min_intensity: options.min_intensity,
            min_ordinal: options.min_ordinal,
            max_ordinal: options.max_ordinal,
            max_fragment_charge: 2,
            chunk_size: 20_000,
        }
    }
}

impl PredictionConfig {
    pub fn options(&self) -> PredictionOptions {
        PredictionOptions {
            min_intensity: self.min_intensity,
            min_ordinal: self.min_ordinal,
            max_ordinal: self.max_ordinal,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub path: PathBuf,
    /// Number of targets (and decoys) written to the pretty preview.
    #[serde(default = "default_preview_n")]
    pub preview_n: usize,
}

fn default_preview_n() -> usize {
    10
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let file = std::fs::File::open(path).map_err(|e| CliError::Io {
            source: e.to_string(),
            path: Some(path.display().to_string()),
        })?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| CliError::ParseError {
            msg: format!("{} ({})", e, path.display()),
        })
    }

    /// Applies the command line overrides and checks that the required
    /// sections are there.
    pub fn with_cli_args(mut self, args: &BuildArgs) -> Result<Self, CliError> {
        if let Some(fasta) = &args.fasta {
            self.input = Some(InputConfig::Fasta { path: fasta.clone() });
        }
        if let Some(output) = &args.output {
            self.output = Some(match self.output {
                Some(out) => OutputConfig {
                    path: output.clone(),
                    ..out
                },
                None => OutputConfig {
                    path: output.clone(),
                    preview_n: default_preview_n(),
                },
            });
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), CliError> {
        if self.input.is_none() {
            return Err(CliError::Config {
                source: "No input provided, set `input` in the config or pass --fasta".to_string(),
            });
        }
        if self.output.is_none() {
            return Err(CliError::Config {
                source: "No output provided, set `output` in the config or pass --output"
                    .to_string(),
            });
        }
        if self.digestion.min_length < MIN_PEPTIDE_LENGTH {
            return Err(CliError::Config {
                source: format!(
                    "digestion.min_length ({}) has to be at least {}",
                    self.digestion.min_length, MIN_PEPTIDE_LENGTH
                ),
            });
        }
        if self.digestion.min_length > self.digestion.max_length {
            return Err(CliError::Config {
                source: format!(
                    "digestion.min_length ({}) is larger than digestion.max_length ({})",
                    self.digestion.min_length, self.digestion.max_length
                ),
            });
        }
        Ok(())
    }
}
